//! Generation-checked handle table.
//!
//! A handle packs a slot index (upper 32 bits) and the slot's generation
//! (lower 32 bits). Removing a value bumps the generation, so handles to a
//! destroyed buffer resolve to nothing instead of to whatever reuses the
//! slot. A slot whose generation would wrap is retired for good.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Handle {
    slot: u32,
    generation: u32,
}

impl Handle {
    fn pack(self) -> u64 {
        (u64::from(self.slot) << 32) | u64::from(self.generation)
    }

    fn unpack(raw: u64) -> Self {
        Self {
            slot: (raw >> 32) as u32,
            generation: raw as u32,
        }
    }
}

enum Entry<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32 },
    Retired,
}

/// Maps `u64` handles to owned values.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
    slot_limit: u32,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self::with_slot_limit(u32::MAX)
    }

    pub(crate) const fn with_slot_limit(slot_limit: u32) -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
            slot_limit,
        }
    }

    /// Whether the next `insert` would be refused.
    pub fn is_full(&self) -> bool {
        self.vacant.is_empty() && self.entries.len() >= self.slot_limit as usize
    }

    /// Store `value`, reusing a vacant slot when one exists.
    ///
    /// Returns `None` and drops `value` when every slot is occupied or
    /// retired. Check [`is_full`](Self::is_full) first when dropping the
    /// value has side effects.
    pub fn insert(&mut self, value: T) -> Option<u64> {
        let handle = match self.vacant.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                let generation = match entry {
                    Entry::Vacant { generation } => *generation,
                    _ => unreachable!("vacant list points at an unavailable slot"),
                };
                *entry = Entry::Occupied { generation, value };
                Handle { slot, generation }
            }
            None => {
                let slot = u32::try_from(self.entries.len())
                    .ok()
                    .filter(|&slot| slot < self.slot_limit)?;
                self.entries.push(Entry::Occupied {
                    generation: 0,
                    value,
                });
                Handle {
                    slot,
                    generation: 0,
                }
            }
        };
        Some(handle.pack())
    }

    pub fn get(&self, raw: u64) -> Option<&T> {
        let handle = Handle::unpack(raw);
        match self.entries.get(handle.slot as usize)? {
            Entry::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Take the value out, invalidating `raw` and every copy of it.
    ///
    /// A stale or unknown handle returns `None`, so double-destroy is a no-op.
    pub fn remove(&mut self, raw: u64) -> Option<T> {
        let handle = Handle::unpack(raw);
        let entry = self.entries.get_mut(handle.slot as usize)?;
        match entry {
            Entry::Occupied { generation, .. } if *generation == handle.generation => {}
            _ => return None,
        }
        let next = match handle.generation.checked_add(1) {
            Some(generation) => {
                self.vacant.push(handle.slot);
                Entry::Vacant { generation }
            }
            None => Entry::Retired,
        };
        match std::mem::replace(entry, next) {
            Entry::Occupied { value, .. } => Some(value),
            _ => unreachable!("entry checked occupied above"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_packing_round_trips() {
        let h = Handle {
            slot: 7,
            generation: u32::MAX,
        };
        assert_eq!(Handle::unpack(h.pack()), h);
    }

    #[test]
    fn insert_then_get() {
        let mut table = HandleTable::new();
        let h = table.insert("a").unwrap();
        assert_eq!(table.get(h), Some(&"a"));
    }

    #[test]
    fn removed_handle_is_stale() {
        let mut table = HandleTable::new();
        let h = table.insert(5u8).unwrap();
        assert_eq!(table.remove(h), Some(5));
        assert_eq!(table.get(h), None);
        assert_eq!(table.remove(h), None);
    }

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut table = HandleTable::new();
        let first = table.insert(1u8).unwrap();
        table.remove(first);
        let second = table.insert(2u8).unwrap();
        assert_eq!(Handle::unpack(first).slot, Handle::unpack(second).slot);
        assert_ne!(first, second);
        assert_eq!(table.get(first), None);
        assert_eq!(table.get(second), Some(&2));
    }

    #[test]
    fn unknown_slot_resolves_to_nothing() {
        let table: HandleTable<u8> = HandleTable::new();
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(u64::MAX), None);
    }

    #[test]
    fn exhausted_generation_retires_slot() {
        let mut table = HandleTable::new();
        let h = table.insert(1u8).unwrap();
        table.remove(h);
        table.entries[0] = Entry::Vacant {
            generation: u32::MAX,
        };

        let last = table.insert(2u8).unwrap();
        assert_eq!(Handle::unpack(last).generation, u32::MAX);
        assert_eq!(table.remove(last), Some(2));
        assert!(matches!(table.entries[0], Entry::Retired));
        assert!(!table.vacant.contains(&0));

        // Neither the old nor a wrapped handle may reach slot 0 again.
        assert_eq!(table.get(last), None);
        assert_eq!(table.get(Handle { slot: 0, generation: 0 }.pack()), None);
        let fresh = table.insert(3u8).unwrap();
        assert_eq!(Handle::unpack(fresh).slot, 1);
    }

    #[test]
    fn full_table_refuses_insert() {
        let mut table = HandleTable::with_slot_limit(2);
        let a = table.insert(1u8).unwrap();
        table.insert(2u8).unwrap();
        assert!(table.is_full());
        assert_eq!(table.insert(3u8), None);

        // A freed slot makes room again.
        table.remove(a);
        assert!(!table.is_full());
        assert!(table.insert(4u8).is_some());
        assert!(table.is_full());
    }

    proptest::proptest! {
        #[test]
        fn only_live_handles_resolve(
            ops in proptest::collection::vec(proptest::prelude::any::<Option<u8>>(), 0..200),
        ) {
            // Some(v) inserts v; None removes the oldest live handle.
            let mut table = HandleTable::new();
            let mut live: Vec<(u64, u8)> = Vec::new();
            let mut dead: Vec<u64> = Vec::new();
            for op in ops {
                match op {
                    Some(v) => live.push((table.insert(v).unwrap(), v)),
                    None if !live.is_empty() => {
                        let (h, v) = live.remove(0);
                        proptest::prop_assert_eq!(table.remove(h), Some(v));
                        dead.push(h);
                    }
                    None => {}
                }
                for &(h, v) in &live {
                    proptest::prop_assert_eq!(table.get(h), Some(&v));
                }
                for &h in &dead {
                    proptest::prop_assert_eq!(table.get(h), None);
                }
            }
        }
    }
}

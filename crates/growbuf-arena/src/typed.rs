//! Typed growable buffer with explicit capacity management.
//!
//! [`GrowableBuffer<T>`] keeps a boxed slice of `capacity` slots, of which
//! the first `len` are populated. Unpopulated slots hold `None`, so reading
//! past the logical length yields "absent" rather than stale data. Element
//! destruction is ordinary `Drop`.

use std::fmt;
use std::mem;

use growbuf_core::{BufferError, CapacityManaged};

use crate::config::BufferConfig;
use crate::lifecycle::Lifecycle;
use crate::metrics::BufferMetrics;
use crate::policy::CapacityPolicy;

fn empty_slots<T>(capacity: usize) -> Box<[Option<T>]> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

/// A growable array of `T` with doubling growth and halving shrink.
///
/// Unlike `Vec`, capacity changes only through explicit [`grow`] and
/// [`shrink`] steps (triggered automatically by append/insert when full and
/// by [`pop_back`] when at most half full), and the buffer can be torn down
/// in place, after which every operation fails with
/// [`BufferError::InvalidHandle`].
///
/// [`grow`]: CapacityManaged::grow
/// [`shrink`]: CapacityManaged::shrink
/// [`pop_back`]: GrowableBuffer::pop_back
pub struct GrowableBuffer<T> {
    slots: Box<[Option<T>]>,
    len: usize,
    policy: CapacityPolicy,
    lifecycle: Lifecycle,
    metrics: BufferMetrics,
}

impl<T> GrowableBuffer<T> {
    /// Create a buffer holding `initial` in slot 0.
    ///
    /// Fails with `InvalidArgument` for zero-sized `T`, `InvalidConfig`
    /// if `config` does not validate, and `CapacityExceeded` if the initial
    /// slots would not fit in `isize::MAX` bytes.
    pub fn new(initial: T, config: BufferConfig) -> Result<Self, BufferError> {
        if mem::size_of::<T>() == 0 {
            return Err(BufferError::invalid_argument(
                "element type must not be zero-sized",
            ));
        }
        config.validate()?;
        let policy = CapacityPolicy::new(&config, Self::slot_bytes());
        let capacity = policy.check(config.initial_capacity)?;

        let mut slots = empty_slots(capacity);
        slots[0] = Some(initial);
        Ok(Self {
            slots,
            len: 1,
            policy,
            lifecycle: Lifecycle::Live,
            metrics: BufferMetrics::new(capacity, capacity * Self::slot_bytes()),
        })
    }

    /// Create a buffer with the default config and the given initial capacity.
    pub fn with_capacity(initial: T, initial_capacity: usize) -> Result<Self, BufferError> {
        Self::new(initial, BufferConfig::new(initial_capacity))
    }

    fn slot_bytes() -> usize {
        mem::size_of::<Option<T>>()
    }

    /// Size in bytes of one element.
    pub fn element_size(&self) -> usize {
        mem::size_of::<T>()
    }

    /// Counters collected since construction.
    pub fn metrics(&self) -> &BufferMetrics {
        &self.metrics
    }

    /// Read the slot at `index`.
    ///
    /// `Err(OutOfBounds)` when `index >= capacity`; `Ok(None)` for an
    /// allocated slot that is not populated.
    pub fn at(&self, index: usize) -> Result<Option<&T>, BufferError> {
        self.lifecycle.ensure_live()?;
        match self.slots.get(index) {
            Some(slot) => Ok(slot.as_ref()),
            None => Err(BufferError::OutOfBounds {
                index,
                bound: self.slots.len(),
            }),
        }
    }

    /// Mutable counterpart of [`at`](Self::at).
    pub fn at_mut(&mut self, index: usize) -> Result<Option<&mut T>, BufferError> {
        self.lifecycle.ensure_live()?;
        let bound = self.slots.len();
        match self.slots.get_mut(index) {
            Some(slot) => Ok(slot.as_mut()),
            None => Err(BufferError::OutOfBounds { index, bound }),
        }
    }

    /// First populated element, if any.
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Last populated element, if any.
    pub fn last(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|i| self.slots[i].as_ref())
    }

    /// Append `value` after the last populated slot, growing first if full.
    ///
    /// If growth fails, `value` is dropped and the buffer is unchanged.
    pub fn append(&mut self, value: T) -> Result<(), BufferError> {
        self.lifecycle.ensure_live()?;
        if self.policy.needs_grow(self.len, self.slots.len()) {
            self.grow()?;
        }
        self.slots[self.len] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Append every item of `iter` in order.
    ///
    /// Stops at the first failure; items appended before it stay.
    pub fn extend_from<I>(&mut self, iter: I) -> Result<(), BufferError>
    where
        I: IntoIterator<Item = T>,
    {
        for value in iter {
            self.append(value)?;
        }
        Ok(())
    }

    /// Remove and return the last element.
    ///
    /// Shrinks first when the length is at most half the capacity.
    /// Ownership of the element moves to the caller.
    pub fn pop_back(&mut self) -> Result<T, BufferError> {
        self.lifecycle.ensure_live()?;
        if self.len == 0 {
            return Err(BufferError::EmptyContainer);
        }
        if self.policy.should_shrink(self.len, self.slots.len()) {
            self.shrink()?;
        }
        self.len -= 1;
        Ok(self.slots[self.len]
            .take()
            .expect("slots below len are populated"))
    }

    /// Insert `value` at `index`, shifting `[index, len)` one slot toward
    /// the tail. `index == len` appends.
    pub fn insert_at(&mut self, value: T, index: usize) -> Result<(), BufferError> {
        self.lifecycle.ensure_live()?;
        if index > self.len {
            return Err(BufferError::OutOfBounds {
                index,
                bound: self.len + 1,
            });
        }
        if self.policy.needs_grow(self.len, self.slots.len()) {
            self.grow()?;
        }
        // slots[len] is None; rotating moves it down to `index`.
        self.slots[index..=self.len].rotate_right(1);
        self.slots[index] = Some(value);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting `(index, len)` one
    /// slot toward the head. Ownership of the element moves to the caller.
    pub fn remove_at(&mut self, index: usize) -> Result<T, BufferError> {
        self.lifecycle.ensure_live()?;
        if self.len == 0 {
            return Err(BufferError::EmptyContainer);
        }
        if index >= self.len {
            return Err(BufferError::OutOfBounds {
                index,
                bound: self.len,
            });
        }
        let value = self.slots[index]
            .take()
            .expect("slots below len are populated");
        self.slots[index..self.len].rotate_left(1);
        self.len -= 1;
        Ok(value)
    }

    /// Destroy every element, keeping the current capacity.
    pub fn clear(&mut self) -> Result<(), BufferError> {
        self.lifecycle.ensure_live()?;
        for slot in &mut self.slots[..self.len] {
            drop(slot.take());
        }
        self.metrics.record_destroyed(self.len);
        self.len = 0;
        Ok(())
    }

    /// Destroy exactly the populated elements, release the storage and
    /// move to the terminal state. Returns the number of elements destroyed.
    pub fn teardown(&mut self) -> Result<usize, BufferError> {
        self.lifecycle.ensure_live()?;
        let destroyed = self.len;
        self.slots = empty_slots(0);
        self.len = 0;
        self.lifecycle = Lifecycle::TornDown;
        self.metrics.record_destroyed(destroyed);
        self.metrics.memory_bytes = 0;
        Ok(destroyed)
    }

    /// Iterate over the populated elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots[..self.len].iter().flatten()
    }

    /// Move the buffer into a fresh allocation of `capacity` slots.
    ///
    /// Populated elements past the new boundary are destroyed before the
    /// move. Returns how many were destroyed.
    fn reallocate(&mut self, capacity: usize) -> usize {
        let kept = self.len.min(capacity);
        for slot in &mut self.slots[kept..self.len] {
            drop(slot.take());
        }
        let destroyed = self.len - kept;

        let mut fresh = empty_slots(capacity);
        for (dst, src) in fresh.iter_mut().zip(&mut self.slots[..kept]) {
            *dst = src.take();
        }
        self.slots = fresh;
        self.len = kept;
        destroyed
    }
}

impl<T> CapacityManaged for GrowableBuffer<T> {
    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_live(&self) -> bool {
        self.lifecycle.is_live()
    }

    fn grow(&mut self) -> Result<usize, BufferError> {
        self.lifecycle.ensure_live()?;
        let capacity = self.policy.grown(self.slots.len())?;
        self.reallocate(capacity);
        self.metrics.record_grow(capacity, capacity * Self::slot_bytes());
        Ok(capacity)
    }

    fn shrink(&mut self) -> Result<usize, BufferError> {
        self.lifecycle.ensure_live()?;
        let capacity = self.policy.shrunk(self.slots.len());
        if capacity >= self.slots.len() {
            return Ok(self.slots.len());
        }
        let destroyed = self.reallocate(capacity);
        self.metrics.record_shrink(destroyed, capacity * Self::slot_bytes());
        Ok(capacity)
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

//! Workload generators for growbuf benchmarks.
//!
//! - [`mixed_workload`]: seeded sequence of append/pop/insert/remove steps
//!   whose indices are always valid for the buffer they are replayed on
//! - [`apply_typed`] / [`apply_erased`]: replay a workload on either buffer
//!   flavour

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use growbuf_arena::{ErasedBuffer, GrowableBuffer};
use growbuf_core::BufferError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One buffer operation in a benchmark workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Append a value.
    Append(u64),
    /// Pop the last element.
    PopBack,
    /// Insert a value at an index in `[0, len]`.
    InsertAt(u64, usize),
    /// Remove the element at an index in `[0, len)`.
    RemoveAt(usize),
}

/// Generate `n` steps, deterministic per `seed`.
///
/// Starts from a buffer of length 1 (the construction element) and never
/// pops or removes from an empty buffer. Appends are weighted so the
/// length drifts upward.
pub fn mixed_workload(n: usize, seed: u64) -> Vec<Step> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut len = 1usize;
    let mut steps = Vec::with_capacity(n);

    for _ in 0..n {
        let step = match rng.random_range(0..10u32) {
            _ if len == 0 => Step::Append(rng.random()),
            0..=3 => Step::Append(rng.random()),
            4..=5 => Step::PopBack,
            6..=7 => Step::InsertAt(rng.random(), rng.random_range(0..=len)),
            _ => Step::RemoveAt(rng.random_range(0..len)),
        };
        match step {
            Step::Append(_) | Step::InsertAt(..) => len += 1,
            Step::PopBack | Step::RemoveAt(_) => len -= 1,
        }
        steps.push(step);
    }
    steps
}

/// Replay `steps` on a typed buffer.
pub fn apply_typed(buf: &mut GrowableBuffer<u64>, steps: &[Step]) -> Result<(), BufferError> {
    for &step in steps {
        match step {
            Step::Append(v) => buf.append(v)?,
            Step::PopBack => {
                buf.pop_back()?;
            }
            Step::InsertAt(v, i) => buf.insert_at(v, i)?,
            Step::RemoveAt(i) => {
                buf.remove_at(i)?;
            }
        }
    }
    Ok(())
}

/// Replay `steps` on an erased buffer of 8-byte little-endian elements.
pub fn apply_erased(buf: &mut ErasedBuffer, steps: &[Step]) -> Result<(), BufferError> {
    for &step in steps {
        match step {
            Step::Append(v) => buf.append(&v.to_le_bytes())?,
            Step::PopBack => drop(buf.pop_back()?),
            Step::InsertAt(v, i) => buf.insert_at(&v.to_le_bytes(), i)?,
            Step::RemoveAt(i) => drop(buf.remove_at(i)?),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use growbuf_arena::BufferConfig;
    use growbuf_core::{CapacityManaged, NoopDestructor};
    use std::sync::Arc;

    #[test]
    fn workload_is_deterministic() {
        assert_eq!(mixed_workload(500, 7), mixed_workload(500, 7));
        assert_ne!(mixed_workload(500, 7), mixed_workload(500, 8));
    }

    #[test]
    fn workload_replays_cleanly_on_both_flavours() {
        let steps = mixed_workload(2_000, 42);

        let mut typed = GrowableBuffer::with_capacity(0u64, 4).unwrap();
        apply_typed(&mut typed, &steps).unwrap();

        let mut erased = ErasedBuffer::new(
            &0u64.to_le_bytes(),
            BufferConfig::new(4),
            Arc::new(NoopDestructor),
        )
        .unwrap();
        apply_erased(&mut erased, &steps).unwrap();

        assert_eq!(typed.len(), erased.len());
        let typed_values: Vec<u64> = typed.iter().copied().collect();
        let erased_values: Vec<u64> = erased
            .iter()
            .map(|b| u64::from_le_bytes(b.try_into().unwrap()))
            .collect();
        assert_eq!(typed_values, erased_values);
    }
}

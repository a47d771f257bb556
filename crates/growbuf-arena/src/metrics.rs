//! Per-buffer capacity and ownership counters.
//!
//! [`BufferMetrics`] is updated in place by every resize and destruction,
//! so callers can profile growth behaviour and audit element ownership
//! without instrumenting their own code.

/// Counters collected over the lifetime of a single buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferMetrics {
    /// Number of growth (doubling) steps performed.
    pub grow_events: u64,
    /// Number of shrink (halving) steps that reduced capacity.
    pub shrink_events: u64,
    /// Number of elements the buffer itself destroyed (teardown, clear and
    /// shrink truncation). Elements handed to the caller are not counted.
    pub destroyed_elements: u64,
    /// Largest capacity reached, in slots.
    pub peak_capacity: usize,
    /// Current size of the backing storage, in bytes.
    pub memory_bytes: usize,
}

impl BufferMetrics {
    pub(crate) fn new(capacity: usize, memory_bytes: usize) -> Self {
        Self {
            peak_capacity: capacity,
            memory_bytes,
            ..Self::default()
        }
    }

    pub(crate) fn record_grow(&mut self, capacity: usize, memory_bytes: usize) {
        self.grow_events += 1;
        self.peak_capacity = self.peak_capacity.max(capacity);
        self.memory_bytes = memory_bytes;
    }

    pub(crate) fn record_shrink(&mut self, destroyed: usize, memory_bytes: usize) {
        self.shrink_events += 1;
        self.destroyed_elements += destroyed as u64;
        self.memory_bytes = memory_bytes;
    }

    pub(crate) fn record_destroyed(&mut self, destroyed: usize) {
        self.destroyed_elements += destroyed as u64;
    }
}

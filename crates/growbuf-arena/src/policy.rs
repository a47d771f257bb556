//! Doubling/halving capacity arithmetic shared by every buffer flavour.
//!
//! [`CapacityPolicy`] is pure: it never touches storage. Buffers ask it
//! whether to resize and to what, then perform the reallocation themselves.

use growbuf_core::BufferError;

use crate::config::BufferConfig;

/// Growth and shrink rules derived from a validated [`BufferConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapacityPolicy {
    min_capacity: usize,
    /// Hard ceiling in slots: the configured maximum, or the largest slot
    /// count whose byte size still fits in `isize::MAX`.
    limit: usize,
}

impl CapacityPolicy {
    /// Build the policy for elements of `element_size` bytes.
    ///
    /// `element_size` must be non-zero; callers reject zero-sized elements
    /// before reaching here.
    pub fn new(config: &BufferConfig, element_size: usize) -> Self {
        let addressable = isize::MAX as usize / element_size.max(1);
        let limit = config
            .max_capacity
            .map_or(addressable, |max| max.min(addressable));
        Self {
            min_capacity: config.min_capacity,
            limit,
        }
    }

    /// Largest capacity this policy permits.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Smallest capacity a shrink may produce.
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Reject a starting capacity above the ceiling.
    pub fn check(&self, capacity: usize) -> Result<usize, BufferError> {
        if capacity > self.limit {
            return Err(BufferError::CapacityExceeded {
                requested: capacity,
                limit: self.limit,
            });
        }
        Ok(capacity)
    }

    /// Capacity after one growth step: exactly double.
    pub fn grown(&self, capacity: usize) -> Result<usize, BufferError> {
        let doubled = capacity.max(1).checked_mul(2).unwrap_or(usize::MAX);
        self.check(doubled)
    }

    /// Capacity after one shrink step: half, floored at `min_capacity`.
    pub fn shrunk(&self, capacity: usize) -> usize {
        (capacity / 2).max(self.min_capacity)
    }

    /// Whether the next append or insert needs a growth step first.
    pub fn needs_grow(&self, len: usize, capacity: usize) -> bool {
        len >= capacity
    }

    /// Whether a pop at the current length should shrink first.
    ///
    /// True when the length has fallen to half the capacity or below and
    /// halving would actually reduce the capacity.
    pub fn should_shrink(&self, len: usize, capacity: usize) -> bool {
        len <= capacity / 2 && self.shrunk(capacity) < capacity
    }
}

//! Type-erased growable buffer.
//!
//! [`ErasedBuffer`] stores elements as opaque fixed-size byte blocks in one
//! contiguous, zero-initialised `Vec<u8>`, and destroys them through a
//! caller-supplied [`ElementDestructor`]. Slot `i` occupies bytes
//! `[i * element_size, (i + 1) * element_size)`. Slots at or past the
//! logical length are always zero-filled.
//!
//! Capacity management mirrors [`GrowableBuffer`](crate::GrowableBuffer):
//! double when an append or insert finds the buffer full, halve when a pop
//! finds it at most half full, never shrink past a live element without
//! destroying it first.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use growbuf_core::{BufferError, CapacityManaged, ElementDestructor};

use crate::config::BufferConfig;
use crate::element::ErasedElement;
use crate::lifecycle::Lifecycle;
use crate::metrics::BufferMetrics;
use crate::policy::CapacityPolicy;

/// A growable array of opaque `element_size`-byte elements.
pub struct ErasedBuffer {
    /// Backing storage: `capacity * element_size` bytes, zero-initialised.
    bytes: Vec<u8>,
    element_size: usize,
    capacity: usize,
    len: usize,
    policy: CapacityPolicy,
    lifecycle: Lifecycle,
    metrics: BufferMetrics,
    destructor: Arc<dyn ElementDestructor>,
}

impl ErasedBuffer {
    /// Create a buffer whose element size is `initial.len()`, holding a copy
    /// of `initial` in slot 0.
    ///
    /// Fails with `InvalidArgument` for an empty `initial` and
    /// `InvalidConfig` if `config` does not validate.
    pub fn new(
        initial: &[u8],
        config: BufferConfig,
        destructor: Arc<dyn ElementDestructor>,
    ) -> Result<Self, BufferError> {
        let element_size = initial.len();
        if element_size == 0 {
            return Err(BufferError::invalid_argument(
                "element size must be greater than zero",
            ));
        }
        config.validate()?;
        let policy = CapacityPolicy::new(&config, element_size);
        let capacity = policy.check(config.initial_capacity)?;

        let mut bytes = vec![0u8; capacity * element_size];
        bytes[..element_size].copy_from_slice(initial);
        Ok(Self {
            metrics: BufferMetrics::new(capacity, bytes.len()),
            bytes,
            element_size,
            capacity,
            len: 1,
            policy,
            lifecycle: Lifecycle::Live,
            destructor,
        })
    }

    /// Size in bytes of one element.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Counters collected since construction.
    pub fn metrics(&self) -> &BufferMetrics {
        &self.metrics
    }

    fn slot(&self, index: usize) -> Range<usize> {
        let start = index * self.element_size;
        start..start + self.element_size
    }

    fn check_element(&self, element: &[u8]) -> Result<(), BufferError> {
        if element.len() != self.element_size {
            return Err(BufferError::invalid_argument(format!(
                "element is {} bytes, buffer stores {}-byte elements",
                element.len(),
                self.element_size
            )));
        }
        Ok(())
    }

    /// Read the slot at `index`.
    ///
    /// `Err(OutOfBounds)` when `index >= capacity`; `Ok(None)` for an
    /// allocated slot that is not populated.
    pub fn at(&self, index: usize) -> Result<Option<&[u8]>, BufferError> {
        self.lifecycle.ensure_live()?;
        if index >= self.capacity {
            return Err(BufferError::OutOfBounds {
                index,
                bound: self.capacity,
            });
        }
        if index >= self.len {
            return Ok(None);
        }
        Ok(Some(&self.bytes[self.slot(index)]))
    }

    /// Mutable counterpart of [`at`](Self::at).
    pub fn at_mut(&mut self, index: usize) -> Result<Option<&mut [u8]>, BufferError> {
        self.lifecycle.ensure_live()?;
        if index >= self.capacity {
            return Err(BufferError::OutOfBounds {
                index,
                bound: self.capacity,
            });
        }
        if index >= self.len {
            return Ok(None);
        }
        let range = self.slot(index);
        Ok(Some(&mut self.bytes[range]))
    }

    /// Copy `element` into the slot after the last populated one, growing
    /// first if full.
    pub fn append(&mut self, element: &[u8]) -> Result<(), BufferError> {
        self.lifecycle.ensure_live()?;
        self.check_element(element)?;
        if self.policy.needs_grow(self.len, self.capacity) {
            self.grow()?;
        }
        let range = self.slot(self.len);
        self.bytes[range].copy_from_slice(element);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element.
    ///
    /// Shrinks first when the length is at most half the capacity.
    pub fn pop_back(&mut self) -> Result<ErasedElement, BufferError> {
        self.lifecycle.ensure_live()?;
        if self.len == 0 {
            return Err(BufferError::EmptyContainer);
        }
        if self.policy.should_shrink(self.len, self.capacity) {
            self.shrink()?;
        }
        self.len -= 1;
        Ok(self.take_slot(self.len))
    }

    /// Copy `element` into `index`, shifting `[index, len)` one slot toward
    /// the tail. `index == len` appends.
    pub fn insert_at(&mut self, element: &[u8], index: usize) -> Result<(), BufferError> {
        self.lifecycle.ensure_live()?;
        self.check_element(element)?;
        if index > self.len {
            return Err(BufferError::OutOfBounds {
                index,
                bound: self.len + 1,
            });
        }
        if self.policy.needs_grow(self.len, self.capacity) {
            self.grow()?;
        }
        let tail = self.slot(index).start..self.slot(self.len).start;
        let dest = self.slot(index + 1).start;
        self.bytes.copy_within(tail, dest);
        let range = self.slot(index);
        self.bytes[range].copy_from_slice(element);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting `(index, len)` one
    /// slot toward the head.
    pub fn remove_at(&mut self, index: usize) -> Result<ErasedElement, BufferError> {
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
        let removed = Box::<[u8]>::from(&self.bytes[self.slot(index)]);
        let tail = self.slot(index + 1).start..self.slot(self.len).start;
        let dest = self.slot(index).start;
        self.bytes.copy_within(tail, dest);
        self.len -= 1;
        let vacated = self.slot(self.len);
        self.bytes[vacated].fill(0);
        Ok(ErasedElement::new(removed, Arc::clone(&self.destructor)))
    }

    /// Destroy every element, keeping the current capacity.
    pub fn clear(&mut self) -> Result<(), BufferError> {
        self.lifecycle.ensure_live()?;
        let destroyed = self.destroy_range(0..self.len);
        self.len = 0;
        self.metrics.record_destroyed(destroyed);
        Ok(())
    }

    /// Destroy exactly the populated elements, release the storage and move
    /// to the terminal state. Returns the number of elements destroyed.
    pub fn teardown(&mut self) -> Result<usize, BufferError> {
        self.lifecycle.ensure_live()?;
        let destroyed = self.release();
        self.metrics.record_destroyed(destroyed);
        self.metrics.memory_bytes = 0;
        Ok(destroyed)
    }

    /// Iterate over the populated elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.bytes[..self.len * self.element_size].chunks_exact(self.element_size)
    }

    /// Copy slot `index` out, zero it and wrap it as an owned element.
    fn take_slot(&mut self, index: usize) -> ErasedElement {
        let range = self.slot(index);
        let bytes = Box::<[u8]>::from(&self.bytes[range.clone()]);
        self.bytes[range].fill(0);
        ErasedElement::new(bytes, Arc::clone(&self.destructor))
    }

    /// Run the destructor over slots in `indices` and zero them.
    fn destroy_range(&mut self, indices: Range<usize>) -> usize {
        let count = indices.len();
        for index in indices {
            let range = self.slot(index);
            let slot = &mut self.bytes[range];
            self.destructor.destroy(slot);
            slot.fill(0);
        }
        count
    }

    fn release(&mut self) -> usize {
        let destroyed = self.destroy_range(0..self.len);
        self.bytes = Vec::new();
        self.capacity = 0;
        self.len = 0;
        self.lifecycle = Lifecycle::TornDown;
        destroyed
    }
}

impl CapacityManaged for ErasedBuffer {
    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn is_live(&self) -> bool {
        self.lifecycle.is_live()
    }

    fn grow(&mut self) -> Result<usize, BufferError> {
        self.lifecycle.ensure_live()?;
        let capacity = self.policy.grown(self.capacity)?;
        self.bytes.resize(capacity * self.element_size, 0);
        self.capacity = capacity;
        self.metrics.record_grow(capacity, self.bytes.len());
        Ok(capacity)
    }

    fn shrink(&mut self) -> Result<usize, BufferError> {
        self.lifecycle.ensure_live()?;
        let capacity = self.policy.shrunk(self.capacity);
        if capacity >= self.capacity {
            return Ok(self.capacity);
        }
        // Destroy anything that would be cut off before truncating.
        let destroyed = self.destroy_range(capacity.min(self.len)..self.len);
        self.len = self.len.min(capacity);
        self.bytes.truncate(capacity * self.element_size);
        self.bytes.shrink_to_fit();
        self.capacity = capacity;
        self.metrics.record_shrink(destroyed, self.bytes.len());
        Ok(capacity)
    }
}

impl Drop for ErasedBuffer {
    fn drop(&mut self) {
        if self.lifecycle.is_live() {
            self.release();
        }
    }
}

impl fmt::Debug for ErasedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedBuffer")
            .field("element_size", &self.element_size)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("lifecycle", &self.lifecycle)
            .finish()
    }
}

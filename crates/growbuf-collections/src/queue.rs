//! FIFO queue.

use growbuf_arena::{BufferConfig, BufferMetrics, GrowableBuffer};
use growbuf_core::{BufferError, CapacityManaged};

/// First-in, first-out queue over a [`GrowableBuffer`].
///
/// Dequeue removes slot 0 and shifts the rest down, so it is O(n).
/// Removal never shrinks the backing buffer.
#[derive(Debug)]
pub struct Queue<T> {
    buf: Option<GrowableBuffer<T>>,
    config: BufferConfig,
}

impl<T> Queue<T> {
    /// Create an empty queue with the default buffer config.
    pub fn new() -> Self {
        Self {
            buf: None,
            config: BufferConfig::default(),
        }
    }

    /// Create an empty queue whose buffer will use `config`.
    pub fn with_config(config: BufferConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self { buf: None, config })
    }

    /// Add `value` at the back.
    pub fn enqueue(&mut self, value: T) -> Result<(), BufferError> {
        match &mut self.buf {
            Some(buf) => buf.append(value),
            None => {
                self.buf = Some(GrowableBuffer::new(value, self.config.clone())?);
                Ok(())
            }
        }
    }

    /// Remove and return the front element.
    pub fn dequeue(&mut self) -> Result<T, BufferError> {
        match &mut self.buf {
            Some(buf) => buf.remove_at(0),
            None => Err(BufferError::EmptyContainer),
        }
    }

    /// The front element, if any.
    pub fn front(&self) -> Option<&T> {
        self.buf.as_ref().and_then(GrowableBuffer::first)
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.buf.as_ref().map_or(0, CapacityManaged::len)
    }

    /// Whether the queue holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity of the backing buffer (0 before the first enqueue).
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, CapacityManaged::capacity)
    }

    /// Backing buffer metrics, once the buffer exists.
    pub fn metrics(&self) -> Option<&BufferMetrics> {
        self.buf.as_ref().map(GrowableBuffer::metrics)
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

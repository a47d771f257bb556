//! LIFO stack.

use growbuf_arena::{BufferConfig, BufferMetrics, GrowableBuffer};
use growbuf_core::{BufferError, CapacityManaged};

/// Last-in, first-out stack over a [`GrowableBuffer`].
///
/// Popping shrinks the backing buffer the same way
/// [`GrowableBuffer::pop_back`] does.
#[derive(Debug)]
pub struct Stack<T> {
    buf: Option<GrowableBuffer<T>>,
    config: BufferConfig,
}

impl<T> Stack<T> {
    /// Create an empty stack with the default buffer config.
    pub fn new() -> Self {
        Self {
            buf: None,
            config: BufferConfig::default(),
        }
    }

    /// Create an empty stack whose buffer will use `config`.
    ///
    /// The config is validated here, not on the first push.
    pub fn with_config(config: BufferConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Ok(Self { buf: None, config })
    }

    /// Push `value` on top.
    pub fn push(&mut self, value: T) -> Result<(), BufferError> {
        match &mut self.buf {
            Some(buf) => buf.append(value),
            None => {
                self.buf = Some(GrowableBuffer::new(value, self.config.clone())?);
                Ok(())
            }
        }
    }

    /// Remove and return the top element.
    pub fn pop(&mut self) -> Result<T, BufferError> {
        match &mut self.buf {
            Some(buf) => buf.pop_back(),
            None => Err(BufferError::EmptyContainer),
        }
    }

    /// The top element, if any.
    pub fn peek(&self) -> Option<&T> {
        self.buf.as_ref().and_then(GrowableBuffer::last)
    }

    /// Number of elements on the stack.
    pub fn len(&self) -> usize {
        self.buf.as_ref().map_or(0, CapacityManaged::len)
    }

    /// Whether the stack holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacity of the backing buffer (0 before the first push).
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, CapacityManaged::capacity)
    }

    /// Backing buffer metrics, once the buffer exists.
    pub fn metrics(&self) -> Option<&BufferMetrics> {
        self.buf.as_ref().map(GrowableBuffer::metrics)
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

//! Owned element handed out by a type-erased buffer.
//!
//! Pop and remove transfer ownership to the caller. For erased storage the
//! buffer cannot rely on `Drop` of the element type, so the returned
//! [`ErasedElement`] carries the buffer's destructor and runs it when
//! dropped. A caller that wants to take over the raw bytes (and with them
//! the duty of releasing whatever they own) calls
//! [`into_bytes`](ErasedElement::into_bytes).

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use growbuf_core::ElementDestructor;

/// Element bytes paired with the destructor that releases them.
pub struct ErasedElement {
    bytes: Box<[u8]>,
    destructor: Option<Arc<dyn ElementDestructor>>,
}

impl ErasedElement {
    pub(crate) fn new(bytes: Box<[u8]>, destructor: Arc<dyn ElementDestructor>) -> Self {
        Self {
            bytes,
            destructor: Some(destructor),
        }
    }

    /// The element's bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the raw bytes without running the destructor.
    ///
    /// The caller becomes responsible for anything the bytes own.
    pub fn into_bytes(mut self) -> Box<[u8]> {
        self.destructor = None;
        std::mem::take(&mut self.bytes)
    }
}

impl Deref for ErasedElement {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for ErasedElement {
    fn drop(&mut self) {
        if let Some(destructor) = self.destructor.take() {
            destructor.destroy(&mut self.bytes);
        }
    }
}

impl fmt::Debug for ErasedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedElement")
            .field("bytes", &self.bytes)
            .field("armed", &self.destructor.is_some())
            .finish()
    }
}

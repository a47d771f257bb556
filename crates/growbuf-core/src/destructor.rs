//! Element-destructor capability for type-erased storage.
//!
//! A type-erased buffer stores opaque fixed-size byte blocks and does not
//! know what they mean. Whoever erases a type into the buffer supplies an
//! [`ElementDestructor`] that knows how to release whatever the bytes own
//! (nothing for plain-old-data, a deep free for elements carrying their own
//! heap pointers).

/// Releases the resources owned by one stored element.
///
/// Invoked exactly once per element: on teardown, on shrink truncation, or
/// when a caller drops an element handed out by pop/remove without taking
/// its raw bytes. The slice is exactly `element_size` bytes long and is
/// discarded after the call.
///
/// Any `Fn(&mut [u8]) + Send + Sync` closure is a destructor.
pub trait ElementDestructor: Send + Sync {
    /// Destroy the element stored in `element`.
    fn destroy(&self, element: &mut [u8]);
}

impl<F> ElementDestructor for F
where
    F: Fn(&mut [u8]) + Send + Sync,
{
    fn destroy(&self, element: &mut [u8]) {
        self(element)
    }
}

/// Destructor for plain-old-data elements: does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDestructor;

impl ElementDestructor for NoopDestructor {
    fn destroy(&self, _element: &mut [u8]) {}
}

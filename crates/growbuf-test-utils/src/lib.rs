//! Test utilities and instrumented types for growbuf development.
//!
//! Provides an [`ElementDestructor`] that records every call
//! ([`CountingDestructor`]), a drop-tracking element type for typed buffers
//! ([`DropLog`] / [`Tracked`]), and shared invariant assertions for any
//! [`CapacityManaged`] container.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use growbuf_core::{CapacityManaged, ElementDestructor};

/// Decode a little-endian `u32` element.
///
/// # Panics
///
/// Panics if `bytes` is not exactly 4 bytes long.
pub fn decode_u32(bytes: &[u8]) -> u32 {
    let arr: [u8; 4] = bytes.try_into().expect("u32 element must be 4 bytes");
    u32::from_le_bytes(arr)
}

/// Assert the structural invariants every [`CapacityManaged`] container
/// must hold after any operation.
pub fn assert_capacity_invariants<B: CapacityManaged + ?Sized>(buf: &B) {
    assert!(
        buf.len() <= buf.capacity(),
        "len {} exceeds capacity {}",
        buf.len(),
        buf.capacity()
    );
    if buf.is_live() {
        assert!(buf.capacity() >= 1, "live buffer with zero capacity");
    } else {
        assert_eq!(buf.len(), 0, "torn-down buffer reports a length");
        assert_eq!(buf.capacity(), 0, "torn-down buffer reports a capacity");
    }
}

// ── CountingDestructor ─────────────────────────────────────────────

/// Destructor that records every element it destroys.
///
/// Clones share state: keep one clone in the test and hand
/// [`shared`](CountingDestructor::shared) to the buffer.
#[derive(Clone, Default)]
pub struct CountingDestructor {
    calls: Arc<AtomicUsize>,
    destroyed: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl CountingDestructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trait-object handle sharing this counter's state.
    pub fn shared(&self) -> Arc<dyn ElementDestructor> {
        Arc::new(self.clone())
    }

    /// Number of destroy calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Bytes of every destroyed element, in destruction order.
    pub fn destroyed(&self) -> Vec<Vec<u8>> {
        self.destroyed
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    /// Destroyed elements decoded as little-endian `u32`s.
    pub fn destroyed_u32s(&self) -> Vec<u32> {
        self.destroyed().iter().map(|b| decode_u32(b)).collect()
    }
}

impl ElementDestructor for CountingDestructor {
    fn destroy(&self, element: &mut [u8]) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut d) = self.destroyed.lock() {
            d.push(element.to_vec());
        }
    }
}

impl fmt::Debug for CountingDestructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountingDestructor")
            .field("calls", &self.calls())
            .finish()
    }
}

// ── DropLog / Tracked ──────────────────────────────────────────────

/// Shared ledger of [`Tracked`] drops, in drop order.
#[derive(Clone, Default)]
pub struct DropLog {
    dropped: Rc<RefCell<Vec<u32>>>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element that records `id` here when dropped.
    pub fn track(&self, id: u32) -> Tracked {
        Tracked {
            id,
            log: self.clone(),
        }
    }

    /// Ids dropped so far, in drop order.
    pub fn dropped(&self) -> Vec<u32> {
        self.dropped.borrow().clone()
    }

    /// Number of drops so far.
    pub fn count(&self) -> usize {
        self.dropped.borrow().len()
    }
}

/// Element that appends its id to a [`DropLog`] when dropped.
pub struct Tracked {
    id: u32,
    log: DropLog,
}

impl Tracked {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.dropped.borrow_mut().push(self.id);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.id)
    }
}

//! growbuf: growable buffers with explicit capacity management.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the growbuf sub-crates. The C ABI lives separately in `growbuf-ffi`.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use growbuf::prelude::*;
//!
//! // Typed: elements are dropped normally.
//! let mut buf = GrowableBuffer::with_capacity(5u32, 2).unwrap();
//! buf.append(7).unwrap();
//! buf.append(9).unwrap();
//! assert_eq!((buf.len(), buf.capacity()), (3, 4));
//! assert_eq!(buf.at(2).unwrap(), Some(&9));
//! assert_eq!(buf.at(3).unwrap(), None);
//!
//! // Erased: 4-byte elements, destroyed through a callback.
//! let destructor: Arc<dyn ElementDestructor> = Arc::new(|_bytes: &mut [u8]| {});
//! let mut erased =
//!     ErasedBuffer::new(&1u32.to_le_bytes(), BufferConfig::new(2), destructor).unwrap();
//! erased.append(&2u32.to_le_bytes()).unwrap();
//! let popped = erased.pop_back().unwrap();
//! assert_eq!(popped.as_bytes(), &2u32.to_le_bytes());
//! assert_eq!(erased.teardown().unwrap(), 1);
//! assert_eq!(erased.append(&3u32.to_le_bytes()), Err(BufferError::InvalidHandle));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `growbuf-core` | Errors, resize mode, destructor capability, `CapacityManaged` |
//! | [`arena`] | `growbuf-arena` | Typed and erased buffers, config, metrics |
//! | [`collections`] | `growbuf-collections` | Stack and queue adapters |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core error taxonomy and traits (`growbuf-core`).
pub use growbuf_core as types;

/// Buffer implementations (`growbuf-arena`).
///
/// [`arena::GrowableBuffer`] for typed storage, [`arena::ErasedBuffer`] for
/// opaque fixed-size elements with an external destructor.
pub use growbuf_arena as arena;

/// Stack and queue adapters (`growbuf-collections`).
pub use growbuf_collections as collections;

/// Common imports for typical growbuf usage.
///
/// ```rust
/// use growbuf::prelude::*;
/// ```
pub mod prelude {
    // Core
    pub use growbuf_core::{
        BufferError, CapacityManaged, ElementDestructor, NoopDestructor, ResizeMode,
    };

    // Buffers
    pub use growbuf_arena::{
        BufferConfig, BufferMetrics, ErasedBuffer, ErasedElement, GrowableBuffer,
    };

    // Collections
    pub use growbuf_collections::{Queue, Stack};
}

//! Stack and queue adapters over [`GrowableBuffer`].
//!
//! A [`GrowableBuffer`] must be constructed with an initial element. The
//! adapters here start empty and build their buffer on the first insertion,
//! so callers get the usual `new()` / `push()` shape.
//!
//! [`GrowableBuffer`]: growbuf_arena::GrowableBuffer

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod queue;
pub mod stack;

pub use queue::Queue;
pub use stack::Stack;

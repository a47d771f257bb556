//! Core types and traits for the growbuf workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! abstractions shared by every buffer flavour: the error taxonomy, the
//! resize mode, the element-destructor capability used for type-erased
//! storage, and the [`CapacityManaged`] trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod destructor;
pub mod error;
pub mod mode;
pub mod traits;

pub use destructor::{ElementDestructor, NoopDestructor};
pub use error::BufferError;
pub use mode::ResizeMode;
pub use traits::CapacityManaged;

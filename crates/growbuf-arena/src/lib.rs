//! Growable buffers with explicit capacity management.
//!
//! Two flavours share one capacity protocol:
//!
//! ```text
//! BufferConfig ──validate──▶ CapacityPolicy (double on full, halve at ≤ half)
//!                               │
//!              ┌────────────────┴────────────────┐
//!      GrowableBuffer<T>                    ErasedBuffer
//!      Box<[Option<T>]> slots               Vec<u8> slots × element_size
//!      destruction via Drop                 destruction via ElementDestructor
//!      pop/remove → T                       pop/remove → ErasedElement
//! ```
//!
//! Both track a [`Lifecycle`]: after `teardown()` every operation fails
//! with `InvalidHandle`. Both keep [`BufferMetrics`] up to date.
//!
//! # Safety
//!
//! All storage is zero-initialised safe Rust (`Option<T>` slots or a
//! `Vec<u8>`). No `MaybeUninit`, no `unsafe`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod element;
pub mod erased;
pub mod lifecycle;
pub mod metrics;
pub mod policy;
pub mod typed;

// Public re-exports for the primary API surface.
pub use config::{BufferConfig, ConfigError};
pub use element::ErasedElement;
pub use erased::ErasedBuffer;
pub use lifecycle::Lifecycle;
pub use metrics::BufferMetrics;
pub use policy::CapacityPolicy;
pub use typed::GrowableBuffer;

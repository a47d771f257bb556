//! C FFI bindings for growbuf.
//!
//! Exposes [`ErasedBuffer`](growbuf_arena::ErasedBuffer) to C through `u64`
//! handles. Every entry point returns a [`GrowbufStatus`] code and catches
//! panics at the boundary. This is the only crate in the workspace that
//! contains `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

/// Run an FFI body, mapping a caught panic to `GrowbufStatus::Panicked`.
///
/// `return` inside the body returns from the guarded closure.
macro_rules! ffi_guard {
    ($body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(_) => $crate::status::GrowbufStatus::Panicked as i32,
        }
    };
}

/// Like `ffi_guard!` for entry points that return a plain value; a panic
/// yields `$default`.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(_) => $default,
        }
    };
}

/// Lock a mutex inside `ffi_guard!`; a poisoned lock returns
/// `GrowbufStatus::InternalError` from the guarded body.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::GrowbufStatus::InternalError as i32,
        }
    };
}

pub mod buffer;
mod handle;
pub mod metrics;
pub mod status;

pub use buffer::GrowbufDestructorFn;
pub use metrics::GrowbufMetrics;
pub use status::GrowbufStatus;

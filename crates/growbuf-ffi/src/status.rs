//! C-compatible status codes.
//!
//! [`GrowbufStatus`] is a `repr(i32)` enum covering every error a buffer
//! operation or the FFI boundary itself can produce. `Ok` is 0 and every
//! error is negative.

use growbuf_core::BufferError;

/// C-compatible status code returned by all FFI functions.
///
/// Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrowbufStatus {
    /// Success.
    Ok = 0,
    /// Handle is invalid, stale or was already destroyed.
    InvalidHandle = -1,
    /// An argument is null, zero-sized or otherwise invalid.
    InvalidArgument = -2,
    /// Index outside the addressable range.
    OutOfBounds = -3,
    /// Pop or remove on a buffer with no populated slots.
    EmptyContainer = -4,
    /// Growth would pass the buffer's capacity limit.
    CapacityExceeded = -5,
    /// Rejected buffer configuration (e.g. zero initial capacity).
    ConfigError = -6,
    /// Caller-provided output buffer is smaller than one element.
    BufferTooSmall = -7,
    /// The slot exists but holds no element.
    NotPopulated = -8,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -9,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&BufferError> for GrowbufStatus {
    fn from(e: &BufferError) -> Self {
        match e {
            BufferError::InvalidArgument { .. } => GrowbufStatus::InvalidArgument,
            BufferError::OutOfBounds { .. } => GrowbufStatus::OutOfBounds,
            BufferError::EmptyContainer => GrowbufStatus::EmptyContainer,
            BufferError::InvalidHandle => GrowbufStatus::InvalidHandle,
            BufferError::CapacityExceeded { .. } => GrowbufStatus::CapacityExceeded,
            BufferError::InvalidConfig { .. } => GrowbufStatus::ConfigError,
        }
    }
}

impl<T> From<Result<T, BufferError>> for GrowbufStatus {
    fn from(result: Result<T, BufferError>) -> Self {
        match result {
            Ok(_) => GrowbufStatus::Ok,
            Err(e) => GrowbufStatus::from(&e),
        }
    }
}

//! Error types for buffer operations.
//!
//! One enum covers every structural operation on a buffer: construction,
//! indexed access, append/pop, insert/remove, resize and teardown.

use std::error::Error;
use std::fmt;

/// Errors that can occur during buffer operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// An argument was absent, zero-sized, mismatched or otherwise invalid
    /// (e.g. an element whose byte length differs from the buffer's
    /// element size, or a negative resize mode).
    InvalidArgument {
        /// Human-readable description of the rejected argument.
        reason: String,
    },
    /// An index was outside the permitted range for the operation.
    ///
    /// Reads are bounded by capacity; structural mutations are bounded by
    /// the logical length.
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// The exclusive upper bound the index was checked against.
        bound: usize,
    },
    /// Pop or remove on a buffer with zero logical length.
    EmptyContainer,
    /// The buffer has been torn down; no further operations are valid.
    InvalidHandle,
    /// Growth would exceed the configured maximum capacity or overflow
    /// the addressable size.
    CapacityExceeded {
        /// Capacity (in slots) the operation tried to reach.
        requested: usize,
        /// Largest capacity the buffer may hold.
        limit: usize,
    },
    /// The buffer configuration failed validation.
    InvalidConfig {
        /// Description of the violated constraint.
        reason: String,
    },
}

impl BufferError {
    /// Shorthand for [`BufferError::InvalidArgument`].
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::OutOfBounds { index, bound } => {
                write!(f, "index {index} out of bounds (bound {bound})")
            }
            Self::EmptyContainer => write!(f, "buffer is empty"),
            Self::InvalidHandle => write!(f, "buffer has been torn down"),
            Self::CapacityExceeded { requested, limit } => {
                write!(
                    f,
                    "capacity exceeded: requested {requested} slots, limit {limit} slots"
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid buffer config: {reason}"),
        }
    }
}

impl Error for BufferError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_out_of_bounds() {
        let e = BufferError::OutOfBounds { index: 7, bound: 4 };
        assert_eq!(e.to_string(), "index 7 out of bounds (bound 4)");
    }

    #[test]
    fn display_capacity_exceeded() {
        let e = BufferError::CapacityExceeded {
            requested: 16,
            limit: 8,
        };
        assert_eq!(
            e.to_string(),
            "capacity exceeded: requested 16 slots, limit 8 slots"
        );
    }

    #[test]
    fn invalid_argument_shorthand() {
        let e = BufferError::invalid_argument("zero-sized element");
        assert_eq!(
            e,
            BufferError::InvalidArgument {
                reason: "zero-sized element".into()
            }
        );
        assert_eq!(e.to_string(), "invalid argument: zero-sized element");
    }

    #[test]
    fn unit_variants_display() {
        assert_eq!(BufferError::EmptyContainer.to_string(), "buffer is empty");
        assert_eq!(
            BufferError::InvalidHandle.to_string(),
            "buffer has been torn down"
        );
    }
}

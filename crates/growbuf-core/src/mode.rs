//! Resize direction for explicit capacity changes.

use crate::error::BufferError;

/// Direction of an explicit resize.
///
/// Integer encoding follows the C surface: `0` shrinks, any positive
/// value grows, negative values are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeMode {
    /// Halve capacity.
    Shrink,
    /// Double capacity.
    Grow,
}

impl TryFrom<i32> for ResizeMode {
    type Error = BufferError;

    fn try_from(mode: i32) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::Shrink),
            m if m > 0 => Ok(Self::Grow),
            m => Err(BufferError::invalid_argument(format!(
                "resize mode must be non-negative, got {m}"
            ))),
        }
    }
}

//! Core abstraction shared by every capacity-managed container.

use crate::error::BufferError;
use crate::mode::ResizeMode;

/// A container with an explicit capacity, a logical length and an
/// explicit doubling/halving resize protocol.
///
/// Implementors guarantee `len() <= capacity()` at all times and report
/// `0` for both once torn down.
pub trait CapacityManaged {
    /// Number of logically populated slots.
    fn len(&self) -> usize;

    /// Number of allocated slots.
    fn capacity(&self) -> usize;

    /// Whether the container still accepts operations.
    fn is_live(&self) -> bool;

    /// Double the capacity. Returns the new capacity.
    fn grow(&mut self) -> Result<usize, BufferError>;

    /// Halve the capacity, destroying any element beyond the new boundary.
    /// Returns the new capacity.
    fn shrink(&mut self) -> Result<usize, BufferError>;

    /// Whether no slot is populated.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatch to [`grow`](Self::grow) or [`shrink`](Self::shrink).
    fn resize(&mut self, mode: ResizeMode) -> Result<usize, BufferError> {
        match mode {
            ResizeMode::Grow => self.grow(),
            ResizeMode::Shrink => self.shrink(),
        }
    }
}

//! Buffer lifecycle state.
//!
//! `Uninitialized` is not represented: construction either yields a live
//! buffer or an error.

use growbuf_core::BufferError;

/// Whether a buffer still accepts operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed and not yet torn down.
    #[default]
    Live,
    /// Terminal: storage released, every operation fails with
    /// [`BufferError::InvalidHandle`].
    TornDown,
}

impl Lifecycle {
    /// Whether this is [`Lifecycle::Live`].
    pub fn is_live(self) -> bool {
        self == Self::Live
    }

    /// `Ok(())` when live, `Err(InvalidHandle)` after teardown.
    pub fn ensure_live(self) -> Result<(), BufferError> {
        match self {
            Self::Live => Ok(()),
            Self::TornDown => Err(BufferError::InvalidHandle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torn_down_is_invalid_handle() {
        assert_eq!(
            Lifecycle::TornDown.ensure_live(),
            Err(BufferError::InvalidHandle)
        );
        assert!(Lifecycle::Live.ensure_live().is_ok());
    }
}

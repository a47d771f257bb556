//! Buffer configuration parameters.

use std::error::Error;
use std::fmt;

use growbuf_core::BufferError;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`BufferConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `initial_capacity` is zero; the initial element needs a slot.
    ZeroInitialCapacity,
    /// `min_capacity` is zero; a live buffer always keeps one slot.
    ZeroMinCapacity,
    /// `min_capacity` is larger than `initial_capacity`.
    MinAboveInitial {
        /// Configured shrink floor.
        min_capacity: usize,
        /// Configured starting capacity.
        initial_capacity: usize,
    },
    /// `initial_capacity` is larger than `max_capacity`.
    InitialAboveMax {
        /// Configured starting capacity.
        initial_capacity: usize,
        /// Configured growth ceiling.
        max_capacity: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInitialCapacity => write!(f, "initial_capacity must be at least 1"),
            Self::ZeroMinCapacity => write!(f, "min_capacity must be at least 1"),
            Self::MinAboveInitial {
                min_capacity,
                initial_capacity,
            } => write!(
                f,
                "min_capacity {min_capacity} exceeds initial_capacity {initial_capacity}"
            ),
            Self::InitialAboveMax {
                initial_capacity,
                max_capacity,
            } => write!(
                f,
                "initial_capacity {initial_capacity} exceeds max_capacity {max_capacity}"
            ),
        }
    }
}

impl Error for ConfigError {}

impl From<ConfigError> for BufferError {
    fn from(e: ConfigError) -> Self {
        BufferError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}

// ── BufferConfig ───────────────────────────────────────────────────

/// Configuration for a growable buffer.
///
/// Controls the starting capacity, the floor that shrinking never goes
/// below and an optional growth ceiling. Validated at construction; all
/// values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Number of slots allocated at construction.
    ///
    /// Default: 4. Must be at least 1 (slot 0 holds the initial element).
    pub initial_capacity: usize,

    /// Smallest capacity a shrink may produce.
    ///
    /// Default: 1. Must be at least 1 and no larger than `initial_capacity`.
    pub min_capacity: usize,

    /// Largest capacity growth may produce, if bounded.
    ///
    /// Default: `None` (bounded only by addressable memory).
    pub max_capacity: Option<usize>,
}

impl BufferConfig {
    /// Default number of slots allocated at construction.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 4;

    /// Default shrink floor.
    pub const DEFAULT_MIN_CAPACITY: usize = 1;

    /// Create a config with the given initial capacity.
    ///
    /// Uses default values for all other parameters.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
            max_capacity: None,
        }
    }

    /// Set the growth ceiling.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// Set the shrink floor.
    pub fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    /// Check all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroInitialCapacity);
        }
        if self.min_capacity == 0 {
            return Err(ConfigError::ZeroMinCapacity);
        }
        if self.min_capacity > self.initial_capacity {
            return Err(ConfigError::MinAboveInitial {
                min_capacity: self.min_capacity,
                initial_capacity: self.initial_capacity,
            });
        }
        if let Some(max_capacity) = self.max_capacity {
            if self.initial_capacity > max_capacity {
                return Err(ConfigError::InitialAboveMax {
                    initial_capacity: self.initial_capacity,
                    max_capacity,
                });
            }
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BufferConfig::default();
        assert_eq!(config.initial_capacity, 4);
        assert_eq!(config.min_capacity, 1);
        assert_eq!(config.max_capacity, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_initial_capacity_rejected() {
        assert_eq!(
            BufferConfig::new(0).validate(),
            Err(ConfigError::ZeroInitialCapacity)
        );
    }

    #[test]
    fn zero_min_capacity_rejected() {
        let config = BufferConfig::new(4).with_min_capacity(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroMinCapacity));
    }

    #[test]
    fn min_above_initial_rejected() {
        let config = BufferConfig::new(2).with_min_capacity(8);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MinAboveInitial { .. })
        ));
    }

    #[test]
    fn initial_above_max_rejected() {
        let config = BufferConfig::new(16).with_max_capacity(8);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialAboveMax { .. })
        ));
    }

    #[test]
    fn converts_into_buffer_error() {
        let e: BufferError = ConfigError::ZeroInitialCapacity.into();
        assert_eq!(
            e,
            BufferError::InvalidConfig {
                reason: "initial_capacity must be at least 1".into()
            }
        );
    }
}

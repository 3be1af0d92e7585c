//! Sweep configuration and validation.

use std::fmt;

use crate::sweep::SizeProgression;

/// Smallest array size measured, and the first size of every sweep.
pub const MIN_SIZE_BYTES: u64 = 100;

/// Environment variable that silences informational stderr output.
pub const QUIET_ENV: &str = "MEMORY_LATENCY_QUIET";

/// Error returned when sweep parameters are out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `max_size` is below [`MIN_SIZE_BYTES`].
    MaxSizeTooSmall {
        /// The value supplied.
        max_size: u64,
    },
    /// `factor` is not a finite number greater than 1.
    InvalidFactor {
        /// The value supplied.
        factor: f64,
    },
    /// `repeat` is zero.
    ZeroRepeat,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MaxSizeTooSmall { max_size } => write!(
                f,
                "max_size must be at least {} (got {})",
                MIN_SIZE_BYTES, max_size
            ),
            ConfigError::InvalidFactor { factor } => {
                write!(f, "factor must be greater than 1.0 (got {})", factor)
            }
            ConfigError::ZeroRepeat => write!(f, "repeat must be greater than 0"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated parameters of a latency sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepConfig {
    max_size_bytes: u64,
    factor: f64,
    repeat: u64,
}

impl SweepConfig {
    /// Validate and build a configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MaxSizeTooSmall`] if `max_size_bytes < 100`
    /// - [`ConfigError::InvalidFactor`] if `factor` is not finite or `<= 1.0`
    /// - [`ConfigError::ZeroRepeat`] if `repeat == 0`
    pub fn new(max_size_bytes: u64, factor: f64, repeat: u64) -> Result<Self, ConfigError> {
        if max_size_bytes < MIN_SIZE_BYTES {
            return Err(ConfigError::MaxSizeTooSmall {
                max_size: max_size_bytes,
            });
        }
        if !factor.is_finite() || factor <= 1.0 {
            return Err(ConfigError::InvalidFactor { factor });
        }
        if repeat == 0 {
            return Err(ConfigError::ZeroRepeat);
        }
        Ok(Self {
            max_size_bytes,
            factor,
            repeat,
        })
    }

    /// Largest array size, in bytes, that may be measured.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Growth factor between consecutive sizes.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Requested iterations per measurement phase.
    pub fn repeat(&self) -> u64 {
        self.repeat
    }

    /// Array sizes this sweep visits, in increasing order.
    pub fn sizes(&self) -> SizeProgression {
        SizeProgression::new(MIN_SIZE_BYTES, self.max_size_bytes, self.factor)
    }
}

/// True when `MEMORY_LATENCY_QUIET` is set to a non-empty value other than `0`.
pub fn quiet_from_env() -> bool {
    std::env::var(QUIET_ENV)
        .map(|v| !v.is_empty() && v != "0")
        .unwrap_or(false)
}

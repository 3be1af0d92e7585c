//! Crate-level error type.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::probe::AllocationError;

/// Errors that stop a latency sweep.
#[derive(Debug)]
pub enum Error {
    /// Sweep parameters were out of range.
    Config(ConfigError),

    /// The probe array for a size could not be allocated.
    Allocation {
        /// Array size being measured when allocation failed.
        size_bytes: u64,
        /// Underlying allocation failure.
        source: AllocationError,
    },

    /// Writing a result row failed.
    Output(io::Error),

    /// Serializing a result row to JSON failed.
    Json(serde_json::Error),
}

impl Error {
    /// Attach the sweep size to an allocation failure.
    pub fn allocation(size_bytes: u64, source: AllocationError) -> Self {
        Error::Allocation { size_bytes, source }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "{}", e),
            Error::Allocation { size_bytes, source } => {
                write!(f, "at size {} bytes: {}", size_bytes, source)
            }
            Error::Output(e) => write!(f, "failed to write results: {}", e),
            Error::Json(e) => write!(f, "failed to serialize results: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Allocation { source, .. } => Some(source),
            Error::Output(e) => Some(e),
            Error::Json(e) => Some(e),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Output(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

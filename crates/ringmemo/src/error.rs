//! Error types for ringmemo

use std::fmt;

/// Result type alias for ringmemo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache configuration
///
/// Failures of the wrapped function are never translated into this type;
/// they reach the caller unchanged through
/// [`Memoized::try_call`](crate::Memoized::try_call).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Capacity must hold at least one entry
    InvalidCapacity(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCapacity(capacity) => {
                write!(f, "Invalid capacity: {} (must be at least 1)", capacity)
            }
        }
    }
}

impl std::error::Error for Error {}

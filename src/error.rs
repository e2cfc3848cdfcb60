//! Error types shared by the counters and the list.

use core::fmt;

/// Why a [`CounterConfig`](crate::counter::CounterConfig) was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A bank needs at least one worker slot.
    ZeroCapacity,
    /// The requested capacity is larger than the configured bound.
    CapacityExceeded {
        /// Capacity that was asked for.
        requested: usize,
        /// Largest capacity the bound admits.
        max: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => f.write_str("counter bank capacity must be at least 1"),
            Self::CapacityExceeded { requested, max } => write!(
                f,
                "too many workers: requested {requested} slots, bound is {max}"
            ),
        }
    }
}

/// The error type for fallible construction and append operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Construction parameters are out of range. Fatal to that construction
    /// attempt; retry with a smaller capacity or an unbounded bank.
    InvalidConfiguration(ConfigError),
    /// Node or slot storage could not be allocated. Nothing was modified.
    AllocationFailure {
        /// Size of the allocation that failed.
        bytes: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration(reason) => write!(f, "invalid configuration: {reason}"),
            Self::AllocationFailure { bytes } => {
                write!(f, "memory allocation of {bytes} bytes failed")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<ConfigError> for Error {
    fn from(reason: ConfigError) -> Self {
        Self::InvalidConfiguration(reason)
    }
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_bound() {
        let err = Error::from(ConfigError::CapacityExceeded { requested: 17, max: 16 });
        assert_eq!(
            err.to_string(),
            "invalid configuration: too many workers: requested 17 slots, bound is 16"
        );
    }

    #[test]
    fn allocation_failure_reports_size() {
        let err = Error::AllocationFailure { bytes: 48 };
        assert_eq!(err.to_string(), "memory allocation of 48 bytes failed");
    }
}

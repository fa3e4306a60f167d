//! Error types shared by every pacer crate

use thiserror::Error;

/// Errors raised while building or configuring a rate limiter
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PacerError {
    /// An argument was rejected at construction time
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Name of the offending argument
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// No tokio runtime was reachable to schedule timers on
    #[error("no tokio runtime available: {0}")]
    NoRuntime(String),

    /// Configuration could not be parsed or failed validation
    #[error("config error: {0}")]
    Config(String),

    /// Filesystem error while reading or writing configuration
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PacerError {
    /// Shorthand for [`PacerError::InvalidArgument`]
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

impl From<std::convert::Infallible> for PacerError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

/// Result type for pacer operations
pub type Result<T> = std::result::Result<T, PacerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = PacerError::invalid("delay", "must not be negative (got -5ms)");
        assert_eq!(
            err.to_string(),
            "invalid argument `delay`: must not be negative (got -5ms)"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PacerError = io.into();
        assert!(matches!(err, PacerError::Io(_)));
    }
}

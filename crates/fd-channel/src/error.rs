//! Error types for channel calculations.

use fd_core::error::FdError;
use thiserror::Error;

/// Errors that can occur while integrating a channel.
#[derive(Error, Debug, Clone)]
pub enum ChannelError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    Shape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Core error: {message}")]
    Core { message: String },
}

pub type ChannelResult<T> = Result<T, ChannelError>;

impl From<FdError> for ChannelError {
    fn from(e: FdError) -> Self {
        ChannelError::Core {
            message: e.to_string(),
        }
    }
}

impl From<ChannelError> for FdError {
    fn from(e: ChannelError) -> Self {
        match e {
            ChannelError::NonPhysical { what } => FdError::InvalidArg { what },
            ChannelError::InvalidArg { what } => FdError::InvalidArg { what },
            ChannelError::Shape { what, .. } => FdError::InvalidArg { what },
            ChannelError::Core { message: _ } => FdError::InvalidArg { what: "core error" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ChannelError::NonPhysical { what: "flow rate" };
        assert!(err.to_string().contains("flow rate"));
        let shape = ChannelError::Shape {
            what: "alpha",
            expected: 3,
            actual: 2,
        };
        assert!(shape.to_string().contains("expected 3"));
    }

    #[test]
    fn error_conversion() {
        let err = ChannelError::InvalidArg { what: "test" };
        let fd: FdError = err.into();
        assert!(matches!(fd, FdError::InvalidArg { .. }));
    }
}

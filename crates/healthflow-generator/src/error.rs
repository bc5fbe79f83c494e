//! Error types for event generation.

use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Malformed date range or non-positive count
    E001InvalidInput,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E001InvalidInput => "E001",
        }
    }
}

/// Errors raised before any record is generated
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Invalid date range, count, or date string
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: &'static str, message: String },
}

impl GeneratorError {
    /// Create an invalid input error with error code
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::E001InvalidInput.as_str(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::E001InvalidInput,
        }
    }
}

/// Result type alias for GeneratorError
pub type Result<T> = std::result::Result<T, GeneratorError>;

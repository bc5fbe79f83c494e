//! Error types for remote store access.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E003: Remote object does not exist
    E003NotFound,
    /// E004: Credentials lack permission for the object
    E004AccessDenied,
    /// E005: Network, timeout, or local file failure
    E005TransientIo,
    /// E006: Remote section cannot be turned into a store
    E006InvalidConfig,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E003NotFound => "E003",
            Self::E004AccessDenied => "E004",
            Self::E005TransientIo => "E005",
            Self::E006InvalidConfig => "E006",
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("[{code}] Object not found: {key}")]
    NotFound { code: &'static str, key: String },

    #[error("[{code}] Access denied for '{key}': {message}")]
    AccessDenied {
        code: &'static str,
        key: String,
        message: String,
    },

    /// Remote call failed for any reason other than absence or permissions
    #[error("[{code}] Remote {operation} failed for '{key}': {source}")]
    Transient {
        code: &'static str,
        operation: &'static str,
        key: String,
        #[source]
        source: opendal::Error,
    },

    /// Reading or writing the local side of a transfer failed
    #[error("[{}] Local file access failed for '{}': {}", .code, .path.display(), .source)]
    LocalIo {
        code: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[{code}] Invalid remote configuration: {message}")]
    InvalidConfig { code: &'static str, message: String },
}

impl StorageError {
    /// Classify an opendal error raised by `operation` on `key`.
    pub fn from_opendal(operation: &'static str, key: &str, err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                code: ErrorCode::E003NotFound.as_str(),
                key: key.to_string(),
            },
            opendal::ErrorKind::PermissionDenied => Self::AccessDenied {
                code: ErrorCode::E004AccessDenied.as_str(),
                key: key.to_string(),
                message: err.to_string(),
            },
            _ => Self::Transient {
                code: ErrorCode::E005TransientIo.as_str(),
                operation,
                key: key.to_string(),
                source: err,
            },
        }
    }

    pub fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIo {
            code: ErrorCode::E005TransientIo.as_str(),
            path: path.into(),
            source,
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            code: ErrorCode::E006InvalidConfig.as_str(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::E003NotFound,
            Self::AccessDenied { .. } => ErrorCode::E004AccessDenied,
            Self::Transient { .. } | Self::LocalIo { .. } => ErrorCode::E005TransientIo,
            Self::InvalidConfig { .. } => ErrorCode::E006InvalidConfig,
        }
    }
}

/// Result type alias for StorageError
pub type Result<T> = std::result::Result<T, StorageError>;

//! Error types for partition writing.

use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E002: Partition file could not be written or read
    E002PartitionIo,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E002PartitionIo => "E002",
        }
    }
}

/// Errors that can occur while materialising or reading partitions
#[derive(Debug, Error)]
pub enum WriterError {
    /// Directory creation or file access failed
    #[error("[{}] Partition I/O failed for '{}': {}", .code, .path.display(), .source)]
    Io {
        code: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding or decoding failed
    #[error("[{}] Partition CSV failed for '{}': {}", .code, .path.display(), .source)]
    Csv {
        code: &'static str,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl WriterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            code: ErrorCode::E002PartitionIo.as_str(),
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            code: ErrorCode::E002PartitionIo.as_str(),
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for WriterError
pub type Result<T> = std::result::Result<T, WriterError>;

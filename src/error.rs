//! Error types for an attendance run

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Result type for attendance operations
pub type AttendanceResult<T> = Result<T, AttendanceError>;

/// Everything that can abort a run. Nothing is retried; the first error wins.
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// Missing or unparsable config, missing key, or an invalid value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Archive collision, permission failure, missing input table
    #[error("Filesystem error: {message}")]
    Filesystem {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Unparsable attendance count or a row missing a required column
    #[error("Data error on line {line}: {message}")]
    Data { line: u64, message: String },
}

impl AttendanceError {
    pub fn config<E: fmt::Display>(err: E) -> Self {
        Self::Config(err.to_string())
    }

    pub fn filesystem(message: impl Into<String>) -> Self {
        Self::Filesystem {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an I/O failure on `path`
    pub fn io(action: &str, path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            message: format!("Failed to {} {}: {}", action, path.display(), source),
            source: Some(source),
        }
    }

    pub fn data<E: fmt::Display>(line: u64, err: E) -> Self {
        Self::Data {
            line,
            message: err.to_string(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_filesystem(&self) -> bool {
        matches!(self, Self::Filesystem { .. })
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data { .. })
    }
}

//! Error types for Nova-Infor.
//!
//! Library crates use [`NovaError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Nova-Infor operations.
#[derive(Debug, thiserror::Error)]
pub enum NovaError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed CSV content in an interview table.
    #[error("CSV error in {path:?}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Data validation error (missing column, empty table, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Transport-level failure talking to the model service.
    #[error("network error: {0}")]
    Network(String),

    /// The model service answered, but not with something usable.
    #[error("API error: {0}")]
    Api(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NovaError>;

impl NovaError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a CSV error for the given file.
    pub fn csv(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Csv {
            path: path.into(),
            message: msg.into(),
        }
    }
}

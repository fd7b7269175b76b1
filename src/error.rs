use std::path::PathBuf;
use thiserror::Error;

/// Error type for scan, key generation and rewrite operations
#[derive(Debug, Error)]
pub enum RetrofitError {
    /// A file named by an approved change does not exist
    #[error("File not found: {file}\n\nTip: Locations are resolved against the base directory; check --base-dir")]
    FileNotFound { file: PathBuf },

    /// The rewritten content could not be persisted
    #[error("Failed to write {file}: {reason}\n\nTip: Check file permissions and free disk space")]
    WriteFailed { file: PathBuf, reason: String },

    /// Project configuration file could not be parsed
    #[error("Invalid configuration in {file}:\n{reason}\n\nTip: The config file must be a JSON object with exclude_dirs, exclude_files and include arrays")]
    InvalidConfig { file: PathBuf, reason: String },

    /// Approved change batch is malformed
    #[error("Invalid approved changes: {0}\n\nTip: Expected a JSON array of {{id, key, value, params, locations}} objects")]
    InvalidChanges(String),

    /// An include pattern is not a valid glob
    #[error("Invalid include pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RetrofitError {
    /// Create a FileNotFound error
    pub fn file_not_found(file: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { file: file.into() }
    }

    /// Create a WriteFailed error from a path and the underlying reason
    pub fn write_failed(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(file: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidGlob error
    pub fn invalid_glob(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGlob {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for RetrofitError
pub type Result<T> = std::result::Result<T, RetrofitError>;

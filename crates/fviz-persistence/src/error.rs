//! Cache error types.
//!
//! Every cache operation returns a structured error with a user-facing
//! message and, where one exists, a remediation hint.

use std::path::PathBuf;

use thiserror::Error;

/// State cache error.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No snapshot is stored under the key.
    #[error("no cached state for key '{key}'")]
    Miss { key: String },

    /// Key is empty or contains characters not allowed in file names.
    #[error("invalid cache key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    /// Snapshot could not be written.
    #[error("failed to {operation} cache file: {path}")]
    Write {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot or input file could not be read.
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot exists but is not a valid envelope.
    #[error("cache file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// Snapshot was written by a newer schema.
    #[error("cache schema version {found} is not supported (maximum: {max_supported})")]
    UnsupportedVersion {
        found: u32,
        max_supported: u32,
        path: PathBuf,
    },

    /// Metadata holds a value JSON cannot represent.
    #[error("cannot cache state for key '{key}': {field} holds a non-finite value")]
    NonFinite { key: String, field: &'static str },

    /// Metadata could not be encoded.
    #[error("failed to serialize viewer metadata")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },
}

impl CacheError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Miss { key } => format!("Nothing has been cached under '{key}' yet."),
            Self::InvalidKey { key, reason } => {
                format!("'{key}' cannot be used as a cache key: {reason}.")
            }
            Self::Write {
                operation, path, ..
            } => format!("Could not {operation} the cache file at {}.", path.display()),
            Self::Read { path, .. } => format!("Could not read {}.", path.display()),
            Self::Corrupt { path, .. } => format!(
                "The cache file at {} is damaged and cannot be loaded.",
                path.display()
            ),
            Self::UnsupportedVersion {
                found,
                max_supported,
                ..
            } => format!(
                "This cache was written by a newer version of fviz \
                (schema {found}, this version reads up to {max_supported})."
            ),
            Self::NonFinite { field, .. } => {
                format!("The viewer state contains NaN or infinite values in {field}.")
            }
            Self::Serialization { .. } => {
                "An error occurred while encoding the viewer state.".to_string()
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Miss { .. } => Some("Run `fviz load` first to populate the cache.".into()),
            Self::InvalidKey { .. } => Some(
                "Use only letters, digits, '-', '_' and '.', and do not start with a dot.".into(),
            ),
            Self::Write { .. } => {
                Some("Check disk space and that the cache directory is writable.".into())
            }
            Self::Read { .. } => {
                Some("Check that the file exists and you have permission to read it.".into())
            }
            Self::Corrupt { .. } => Some("Load the imaging files again to rebuild it.".into()),
            Self::UnsupportedVersion { .. } => Some("Update fviz to the latest version.".into()),
            Self::NonFinite { .. } => {
                Some("Check the input files for overflowing or missing values.".into())
            }
            Self::Serialization { .. } => None,
        }
    }
}

/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

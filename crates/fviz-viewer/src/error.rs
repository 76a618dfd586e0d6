//! Viewer state errors.

use fviz_validate::Rule;
use thiserror::Error;

/// Errors returned by [`DataManager`](crate::DataManager) operations.
///
/// A failed operation never modifies the current state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// The operation needs a file set and none has been created.
    #[error("no active viewer state; load imaging files first")]
    NoActiveState,

    /// The supplied file set breaks a structural invariant.
    #[error("invalid file set: {}", .rule.description())]
    InvalidFileSet { rule: Rule },

    /// An auxiliary series does not match the temporal length.
    #[error("'{label}' has length {found}, expected {expected}")]
    LengthMismatch {
        label: String,
        expected: usize,
        found: usize,
    },
}

/// Result type for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

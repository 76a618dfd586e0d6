//! Error types for regressor computation.

use thiserror::Error;

/// Errors that can occur while computing a regressor.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SignalError {
    /// Fewer than two frame times; no sampling interval can be derived.
    #[error("at least 2 frame times are required, got {found}")]
    TooFewFrames { found: usize },

    /// Frame times must be finite and strictly increasing.
    #[error("frame times must be finite and strictly increasing (index {index})")]
    UnorderedFrameTimes { index: usize },

    /// An event field is NaN or infinite.
    #[error("condition '{condition}' has a non-finite {field} at event {index}")]
    NonFiniteEvent {
        condition: String,
        field: &'static str,
        index: usize,
    },
}

/// Result type for signal operations.
pub type Result<T> = std::result::Result<T, SignalError>;

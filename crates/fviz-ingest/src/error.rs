//! Error types for file ingestion.

use std::path::PathBuf;

use fviz_model::{FileRole, Modality};
use fviz_signal::SignalError;
use fviz_validate::Rule;
use thiserror::Error;

/// Errors that can occur during an upload.
///
/// Any error aborts the whole upload; nothing is partially accepted.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Request Errors ===
    /// Files of both modalities supplied, or files disagree with the declared modality.
    #[error("{first} and {second} inputs are mutually exclusive; upload one file type")]
    ConflictingModality { first: Modality, second: Modality },

    /// A role required by the modality was not supplied.
    #[error("missing required {role} input")]
    MissingRole { role: FileRole },

    // === File System Errors ===
    /// Supplied path does not exist.
    #[error("{role} file not found: {path}")]
    MissingFile { role: FileRole, path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table file exceeds the configured size limit.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Table file uses an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}; save the file as UTF-8")]
    UnsupportedEncoding {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Parse Errors ===
    /// NIfTI file could not be decoded.
    #[error("failed to read NIfTI {path}: {message}")]
    NiftiRead { path: PathBuf, message: String },

    /// GIfTI file could not be decoded.
    #[error("failed to parse GIfTI {path}: {message}")]
    GiftiParse { path: PathBuf, message: String },

    /// Time series or task design table could not be parsed.
    #[error("failed to parse table {path}: {message}")]
    TableParse { path: PathBuf, message: String },

    // === Validation Errors ===
    /// A validation rule rejected an input.
    #[error("invalid {role} input: {desc} ({value})", desc = .rule.description())]
    Validation {
        role: FileRole,
        rule: Rule,
        value: String,
    },

    /// Auxiliary series length differs from the functional temporal length.
    #[error("{path} has {found} rows but the functional data has {expected} timepoints")]
    LengthMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    // === Regressor Errors ===
    /// Task regressor computation failed.
    #[error("failed to compute regressors for condition '{condition}': {source}")]
    Signal {
        condition: String,
        #[source]
        source: SignalError,
    },
}

impl IngestError {
    pub(crate) fn validation(role: FileRole, rule: Rule, value: impl Into<String>) -> Self {
        Self::Validation {
            role,
            rule,
            value: value.into(),
        }
    }

    /// Rule that rejected the input, if this is a validation failure.
    pub fn rule(&self) -> Option<Rule> {
        match self {
            Self::Validation { rule, .. } => Some(*rule),
            Self::LengthMismatch { .. } => Some(Rule::FmriLength),
            _ => None,
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

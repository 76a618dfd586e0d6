//! Delimited table reading for time series and task design files.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{IngestError, Result};

/// Maximum size for a time series or task design file (50 MB).
pub const MAX_TABLE_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Field separator of a table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
    /// Runs of spaces or tabs (plain-text time series).
    Whitespace,
}

impl Delimiter {
    /// Separator implied by a file name's extension.
    pub fn from_extension(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tsv") => Self::Tab,
            Some("txt") => Self::Whitespace,
            _ => Self::Comma,
        }
    }

    fn byte(self) -> Option<u8> {
        match self {
            Self::Comma => Some(b','),
            Self::Tab => Some(b'\t'),
            Self::Whitespace => None,
        }
    }
}

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    }
}

/// Check file size against a limit before reading.
pub fn check_file_size(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reject UTF-16 encoded files; a UTF-8 BOM is accepted.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| open_error(path, e))?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Read every non-blank row of a table as trimmed string fields.
///
/// No header handling is done here; callers decide whether the first row
/// is a header.
pub fn read_rows(path: &Path, delimiter: Delimiter) -> Result<Vec<Vec<String>>> {
    let mut rows = match delimiter.byte() {
        Some(byte) => read_delimited(path, byte)?,
        None => read_whitespace(path)?,
    };

    if let Some(first) = rows.first_mut().and_then(|row| row.first_mut()) {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.trim().to_string();
        }
    }

    Ok(rows)
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| table_error(path, &e))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| table_error(path, &e))?;
        let row: Vec<String> = record.iter().map(|field| field.trim().to_string()).collect();
        if row.iter().any(|field| !field.is_empty()) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn read_whitespace(path: &Path) -> Result<Vec<Vec<String>>> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut rows = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| table_error(path, &e))?;
        let row: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn table_error(path: &Path, err: &dyn std::fmt::Display) -> IngestError {
    IngestError::TableParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

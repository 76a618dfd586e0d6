//! Snapshot reading.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{CacheError, Result};
use crate::snapshot::{CURRENT_SCHEMA_VERSION, CacheSnapshot, SchemaProbe};

/// Read the snapshot stored at `path` under `key`.
pub fn read_snapshot(path: &Path, key: &str) -> Result<CacheSnapshot> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => CacheError::Miss {
            key: key.to_string(),
        },
        _ => CacheError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;

    parse_snapshot(&bytes, path, key)
}

/// Validate the envelope and decode it.
fn parse_snapshot(bytes: &[u8], path: &Path, key: &str) -> Result<CacheSnapshot> {
    let corrupt = |reason: String| CacheError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    // The version is checked first so a newer layout is not reported as corrupt.
    let probe: SchemaProbe = serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    if probe.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(CacheError::UnsupportedVersion {
            found: probe.schema_version,
            max_supported: CURRENT_SCHEMA_VERSION,
            path: path.to_path_buf(),
        });
    }

    let snapshot: CacheSnapshot =
        serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    if snapshot.key != key {
        return Err(corrupt(format!(
            "snapshot belongs to key '{}'",
            snapshot.key
        )));
    }

    tracing::debug!(
        key,
        path = %path.display(),
        saved_at = %snapshot.saved_at,
        "loaded viewer state"
    );
    Ok(snapshot)
}

//! Snapshot writing.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CacheError, Result};
use crate::snapshot::{CacheSnapshot, first_non_finite};

/// Removes the temp file unless the write completed.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed && fs::remove_file(&self.path).is_ok() {
            tracing::debug!(path = %self.path.display(), "removed incomplete cache file");
        }
    }
}

/// Write a snapshot to `path`.
///
/// Uses atomic write (temp file + fsync + rename), so readers only ever see
/// the previous file or the complete new one.
pub fn write_snapshot(snapshot: &CacheSnapshot, path: &Path) -> Result<()> {
    if let Some(field) = first_non_finite(&snapshot.metadata) {
        return Err(CacheError::NonFinite {
            key: snapshot.key.clone(),
            field,
        });
    }
    let bytes = serde_json::to_vec_pretty(snapshot)
        .map_err(|source| CacheError::Serialization { source })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CacheError::Write {
            operation: "create directory for",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let write_error = |operation: &'static str, source: std::io::Error| CacheError::Write {
        operation,
        path: temp_path.clone(),
        source,
    };

    let mut guard = TempFileGuard::new(temp_path.clone());
    let mut file = File::create(&temp_path).map_err(|e| write_error("create", e))?;
    file.write_all(&bytes).map_err(|e| write_error("write", e))?;
    file.sync_all().map_err(|e| write_error("sync", e))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|source| CacheError::Write {
        operation: "replace",
        path: path.to_path_buf(),
        source,
    })?;
    guard.disarm();

    tracing::info!(key = %snapshot.key, path = %path.display(), "saved viewer state");
    Ok(())
}

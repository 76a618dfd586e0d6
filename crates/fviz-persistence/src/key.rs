//! Cache key validation and derivation.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};

/// Hex characters of the digest kept in derived keys.
const DERIVED_KEY_HEX_LEN: usize = 16;

/// Check that `key` is usable as a file stem.
///
/// Keys are non-empty, use only ASCII alphanumerics, `-`, `_` and `.`, and
/// do not start with a dot.
pub fn validate_key(key: &str) -> Result<()> {
    let invalid = |reason| {
        Err(CacheError::InvalidKey {
            key: key.to_string(),
            reason,
        })
    };
    if key.is_empty() {
        return invalid("key is empty");
    }
    if key.starts_with('.') {
        return invalid("key starts with a dot");
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return invalid("key contains characters other than letters, digits, '-', '_' or '.'");
    }
    Ok(())
}

/// Key for the current process, stable across calls.
pub fn session_key() -> &'static str {
    static KEY: OnceLock<String> = OnceLock::new();
    KEY.get_or_init(|| {
        format!(
            "session-{}-{}",
            Utc::now().format("%Y%m%dT%H%M%S"),
            std::process::id()
        )
    })
}

/// Content-addressed key for a set of input files.
///
/// Hashes each file's canonical path and size in the order given, so the
/// same inputs always map to the same snapshot.
pub fn derive_key<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
    let mut hasher = Sha256::new();
    for path in paths {
        let path = path.as_ref();
        let read_error = |source| CacheError::Read {
            path: path.to_path_buf(),
            source,
        };
        let canonical = fs::canonicalize(path).map_err(read_error)?;
        let size = fs::metadata(&canonical).map_err(read_error)?.len();

        hasher.update(canonical.to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update(size.to_le_bytes());
    }

    let digest = hex::encode(hasher.finalize());
    Ok(format!("fviz-{}", &digest[..DERIVED_KEY_HEX_LEN]))
}

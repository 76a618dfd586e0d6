//! Keyed store of viewer metadata snapshots.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use fviz_model::ViewerMetadata;

use crate::error::{CacheError, Result};
use crate::io::{read_snapshot, write_snapshot};
use crate::key::validate_key;
use crate::snapshot::CacheSnapshot;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "fviz";
const APP_NAME: &str = "fviz";

/// Directory-backed state cache; one `<key>.json` file per snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// Cache rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache in the platform cache directory, or the temp dir when the
    /// platform directory cannot be determined.
    pub fn default_location() -> Self {
        let root = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| dirs.cache_dir().join("state"))
            .unwrap_or_else(|| {
                tracing::warn!("Could not determine cache directory, using temp dir");
                std::env::temp_dir().join("fviz-cache")
            });
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File a key is stored in.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    /// Store `metadata` under `key`, replacing any previous snapshot.
    pub fn save(&self, key: &str, metadata: &ViewerMetadata) -> Result<PathBuf> {
        let path = self.path_for(key)?;
        let snapshot = CacheSnapshot::new(key, metadata.clone());
        write_snapshot(&snapshot, &path)?;
        Ok(path)
    }

    /// Load the metadata stored under `key`.
    pub fn load(&self, key: &str) -> Result<ViewerMetadata> {
        self.load_snapshot(key).map(|snapshot| snapshot.metadata)
    }

    /// Load the full envelope, including when it was saved.
    pub fn load_snapshot(&self, key: &str) -> Result<CacheSnapshot> {
        let path = self.path_for(key)?;
        read_snapshot(&path, key)
    }

    /// Delete the snapshot under `key`. Returns whether one existed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(key, "removed cached state");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CacheError::Write {
                operation: "remove",
                path,
                source,
            }),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).is_ok_and(|path| path.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_for_rejects_traversal() {
        let cache = Cache::new("/tmp/fviz-test");
        assert!(matches!(
            cache.path_for("../etc/passwd"),
            Err(CacheError::InvalidKey { .. })
        ));
        assert_eq!(
            cache.path_for("abc").unwrap(),
            PathBuf::from("/tmp/fviz-test/abc.json")
        );
    }

    #[test]
    fn test_default_location_is_absolute() {
        assert!(Cache::default_location().root().is_absolute());
    }
}

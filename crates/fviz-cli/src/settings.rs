//! Settings file support.
//!
//! Settings live in `settings.toml` in the platform config folder:
//! - macOS: ~/Library/Application Support/org.fviz.fviz/
//! - Windows: %APPDATA%/fviz/fviz/config/
//! - Linux: ~/.config/fviz/
//!
//! Command-line flags override the file, and the file overrides built-in
//! defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

const APP_QUALIFIER: &str = "org";
const APP_ORG: &str = "fviz";
const APP_NAME: &str = "fviz";
const CONFIG_FILENAME: &str = "settings.toml";

/// Contents of `settings.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub ingest: IngestSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache directory; the platform cache dir when unset.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Slice-time reference used when `--slicetime-ref` is not given.
    pub slicetime_ref: Option<f64>,
    /// Largest accepted time series or task design file, in bytes.
    pub max_table_file_size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub format: Option<LogFormat>,
}

/// Path to the settings file, if the platform config folder is known.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl Settings {
    /// Read settings from `path`.
    ///
    /// A missing file yields defaults; an unreadable or unparsable file is an
    /// error so the caller can decide whether to fall back.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("read settings {}", path.display()));
            }
        };
        toml::from_str(&content).with_context(|| format!("parse settings {}", path.display()))
    }

    /// Render as `settings.toml` content.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize settings")
    }

    /// Write settings to `path`, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config directory {}", parent.display()))?;
        }
        let content = self.to_toml()?;
        fs::write(path, content).with_context(|| format!("write settings {}", path.display()))
    }

    /// Write settings to `path` unless a file is already there.
    ///
    /// Returns whether the file was written.
    pub fn init_at(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        self.save_to(path)?;
        Ok(true)
    }
}

//! Upload request and result types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fviz_model::{FileRole, FileSet, Modality, TaskRegressors, TimeSeries};

use crate::readers::MAX_TABLE_FILE_SIZE;

/// Slice-time reference used when none is given.
pub const DEFAULT_SLICETIME_REF: f64 = 0.5;

/// A time series file to attach.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesInput {
    pub path: PathBuf,
    /// Display label; the file stem is used when empty.
    pub label: String,
    /// Whether the first row is a header to skip.
    pub has_header: bool,
}

impl TimeSeriesInput {
    pub fn new(path: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            has_header: false,
        }
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Label after falling back to the file stem.
    pub fn effective_label(&self) -> String {
        if !self.label.trim().is_empty() {
            return self.label.trim().to_string();
        }
        file_stem(&self.path)
    }
}

/// A task design file with its timing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDesignInput {
    pub path: PathBuf,
    /// Repetition time in seconds.
    pub tr: f64,
    /// Slice-time reference as a fraction of TR, in [0, 1].
    pub slicetime_ref: f64,
}

impl TaskDesignInput {
    pub fn new(path: impl Into<PathBuf>, tr: f64) -> Self {
        Self {
            path: path.into(),
            tr,
            slicetime_ref: DEFAULT_SLICETIME_REF,
        }
    }

    pub fn with_slicetime_ref(mut self, slicetime_ref: f64) -> Self {
        self.slicetime_ref = slicetime_ref;
        self
    }
}

/// Everything a user supplied for one upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Declared modality; must agree with the imaging roles supplied.
    pub modality: Modality,
    /// Imaging files keyed by role.
    pub files: BTreeMap<FileRole, PathBuf>,
    pub time_series: Vec<TimeSeriesInput>,
    pub task: Option<TaskDesignInput>,
}

impl UploadRequest {
    pub fn new(modality: Modality) -> Self {
        Self {
            modality,
            files: BTreeMap::new(),
            time_series: Vec::new(),
            task: None,
        }
    }

    pub fn with_file(mut self, role: FileRole, path: impl Into<PathBuf>) -> Self {
        self.files.insert(role, path.into());
        self
    }

    pub fn with_time_series(mut self, input: TimeSeriesInput) -> Self {
        self.time_series.push(input);
        self
    }

    pub fn with_task(mut self, input: TaskDesignInput) -> Self {
        self.task = Some(input);
        self
    }

    pub fn file(&self, role: FileRole) -> Option<&Path> {
        self.files.get(&role).map(PathBuf::as_path)
    }
}

/// Orchestrator limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Largest accepted time series or task design file, in bytes.
    pub max_table_file_size: u64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_table_file_size: MAX_TABLE_FILE_SIZE,
        }
    }
}

/// Validated, loaded upload ready for the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadBundle {
    pub file_set: FileSet,
    pub time_series: Option<TimeSeries>,
    pub task: Option<TaskRegressors>,
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

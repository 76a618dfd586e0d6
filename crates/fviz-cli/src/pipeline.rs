//! Load pipeline: command-line inputs → upload → viewer state → cache.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use fviz_ingest::{
    DEFAULT_SLICETIME_REF, FileUpload, IngestOptions, TaskDesignInput, TimeSeriesInput,
    UploadRequest,
};
use fviz_model::{FileRole, Modality, ViewerMetadata};
use fviz_persistence::{Cache, derive_key};
use fviz_viewer::DataManager;
use tracing::{info, info_span};

/// Paths and options collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct LoadInputs {
    /// Imaging files keyed by role.
    pub imaging: Vec<(FileRole, PathBuf)>,
    pub time_series: Vec<PathBuf>,
    /// One label per time series, or none.
    pub ts_labels: Vec<String>,
    /// One header flag per time series, or none.
    pub ts_headers: Vec<bool>,
    pub task_design: Option<PathBuf>,
    pub tr: Option<f64>,
    pub slicetime_ref: Option<f64>,
}

impl LoadInputs {
    /// Every supplied path, imaging files first.
    pub fn all_paths(&self) -> Vec<&PathBuf> {
        self.imaging
            .iter()
            .map(|(_, path)| path)
            .chain(&self.time_series)
            .chain(&self.task_design)
            .collect()
    }
}

/// Turn command-line inputs into an upload request.
///
/// The declared modality follows the imaging flags; mixing NIfTI and GIfTI
/// flags is left for the upload to reject.
pub fn build_request(inputs: &LoadInputs) -> Result<UploadRequest> {
    let has = |modality| {
        inputs
            .imaging
            .iter()
            .any(|(role, _)| role.modality() == Some(modality))
    };
    let modality = if has(Modality::Volumetric) {
        Modality::Volumetric
    } else if has(Modality::Surface) {
        Modality::Surface
    } else {
        bail!("no imaging files given; pass --nifti-func or a --gifti-* pair");
    };

    let count = inputs.time_series.len();
    if !inputs.ts_labels.is_empty() && inputs.ts_labels.len() != count {
        bail!(
            "--ts-labels has {} values but {count} time series files were given",
            inputs.ts_labels.len()
        );
    }
    if !inputs.ts_headers.is_empty() && inputs.ts_headers.len() != count {
        bail!(
            "--ts-headers has {} values but {count} time series files were given",
            inputs.ts_headers.len()
        );
    }

    let mut request = UploadRequest::new(modality);
    for (role, path) in &inputs.imaging {
        request = request.with_file(*role, path.clone());
    }
    for (index, path) in inputs.time_series.iter().enumerate() {
        let label = inputs.ts_labels.get(index).cloned().unwrap_or_default();
        let has_header = inputs.ts_headers.get(index).copied().unwrap_or(false);
        request = request
            .with_time_series(TimeSeriesInput::new(path.clone(), label).with_header(has_header));
    }
    if let Some(path) = &inputs.task_design {
        let Some(tr) = inputs.tr else {
            bail!("--task-design requires --tr");
        };
        let slicetime_ref = inputs.slicetime_ref.unwrap_or(DEFAULT_SLICETIME_REF);
        request = request
            .with_task(TaskDesignInput::new(path.clone(), tr).with_slicetime_ref(slicetime_ref));
    }
    Ok(request)
}

/// Where and under which key to cache the result.
#[derive(Debug, Clone)]
pub struct CacheTarget {
    pub cache: Cache,
    /// Explicit key; derived from the inputs when unset.
    pub key: Option<String>,
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub metadata: ViewerMetadata,
    /// Key and file of the cached snapshot, when caching was requested.
    pub cached: Option<(String, PathBuf)>,
}

/// Validate and load the inputs, build the viewer state, and cache its
/// metadata.
pub fn run_load(
    inputs: &LoadInputs,
    options: IngestOptions,
    target: Option<&CacheTarget>,
) -> Result<LoadOutcome> {
    let span = info_span!("load");
    let _guard = span.enter();

    let request = build_request(inputs)?;
    let bundle = FileUpload::with_options(options)
        .upload(&request)
        .context("validate inputs")?;

    let mut manager = DataManager::new();
    let metadata = manager
        .apply_bundle(bundle)
        .context("build viewer state")?
        .clone();
    info!(
        modality = %metadata.modality,
        timepoints = metadata.timepoints,
        "viewer state ready"
    );

    let cached = match target {
        Some(target) => {
            let key = match &target.key {
                Some(key) => key.clone(),
                None => derive_key(&inputs.all_paths()).context("derive cache key")?,
            };
            let path = info_span!("cache", key = %key)
                .in_scope(|| target.cache.save(&key, &metadata))
                .context("save viewer state")?;
            Some((key, path))
        }
        None => None,
    };

    Ok(LoadOutcome { metadata, cached })
}

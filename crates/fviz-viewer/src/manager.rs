//! The viewer state manager.

use fviz_ingest::UploadBundle;
use fviz_model::{
    FileSet, HemisphereData, Modality, SurfaceFiles, SurfaceFunc, SurfaceMesh, TaskRegressors,
    TimeSeries, ViewerMetadata, VolumeImage, VolumetricFiles,
};
use fviz_validate::{
    Rule, validate_gii_file_inputs, validate_nii_3d, validate_nii_4d, validate_nii_brain_mask,
    validate_nii_same_dim_len,
};
use tracing::{debug, info};

use crate::derive::{derive_metadata, summarize_series, summarize_task};
use crate::error::{Result, ViewerError};

// ============================================================================
// Viewer State
// ============================================================================

/// Everything the viewer knows about the current session.
#[derive(Clone, PartialEq)]
pub struct ViewerState {
    file_set: FileSet,
    time_series: Option<TimeSeries>,
    task_design: Option<TaskRegressors>,
    metadata: ViewerMetadata,
}

impl ViewerState {
    fn new(file_set: FileSet) -> Self {
        let metadata = derive_metadata(&file_set, None, None);
        Self {
            file_set,
            time_series: None,
            task_design: None,
            metadata,
        }
    }

    pub fn file_set(&self) -> &FileSet {
        &self.file_set
    }

    pub fn time_series(&self) -> Option<&TimeSeries> {
        self.time_series.as_ref()
    }

    pub fn task_design(&self) -> Option<&TaskRegressors> {
        self.task_design.as_ref()
    }

    pub fn metadata(&self) -> &ViewerMetadata {
        &self.metadata
    }

    pub fn modality(&self) -> Modality {
        self.file_set.modality()
    }

    pub fn temporal_length(&self) -> usize {
        self.metadata.timepoints
    }

    fn attach_time_series(&mut self, series: TimeSeries) -> Result<()> {
        let expected = self.temporal_length();
        for entry in series.iter() {
            check_length(&entry.label, expected, entry.values.len())?;
        }

        let merged = self.time_series.get_or_insert_with(TimeSeries::new);
        merged.merge(series);
        self.metadata.time_series = summarize_series(merged);
        Ok(())
    }

    fn attach_task_design(&mut self, regressors: TaskRegressors) -> Result<()> {
        let expected = self.temporal_length();
        check_length("frame_times", expected, regressors.frame_times.len())?;
        for condition in &regressors.conditions {
            check_length(&condition.label, expected, condition.block.len())?;
            check_length(&condition.label, expected, condition.hrf.len())?;
        }

        self.metadata.task = Some(summarize_task(&regressors));
        self.task_design = Some(regressors);
        Ok(())
    }
}

impl std::fmt::Debug for ViewerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerState")
            .field("modality", &self.modality())
            .field("timepoints", &self.metadata.timepoints)
            .field(
                "time_series",
                &self.time_series.as_ref().map_or(0, TimeSeries::len),
            )
            .field("has_task_design", &self.task_design.is_some())
            .finish()
    }
}

fn check_length(label: &str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(ViewerError::LengthMismatch {
            label: label.to_string(),
            expected,
            found,
        })
    }
}

fn ensure(valid: bool, rule: Rule) -> Result<()> {
    if valid {
        Ok(())
    } else {
        Err(ViewerError::InvalidFileSet { rule })
    }
}

// ============================================================================
// Data Manager
// ============================================================================

/// Owner of the single active viewer session.
///
/// Starts empty. A `create_*` call (or [`apply_bundle`](Self::apply_bundle))
/// installs a file set, replacing any previous session along with its
/// auxiliary data. Attach calls enrich the current session. A failed call
/// leaves the manager exactly as it was.
///
/// The manager holds no locks; callers sharing it across threads wrap it in
/// their own mutex.
#[derive(Debug, Clone, Default)]
pub struct DataManager {
    state: Option<ViewerState>,
}

impl DataManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Install a volumetric session.
    ///
    /// `func` must be 4-D; `anat` and `mask` must be 3-D with the functional
    /// spatial extent, and the mask must be binary.
    pub fn create_volumetric_state(
        &mut self,
        func: VolumeImage,
        anat: Option<VolumeImage>,
        mask: Option<VolumeImage>,
    ) -> Result<&ViewerMetadata> {
        let file_set = FileSet::Volumetric(VolumetricFiles { func, anat, mask });
        self.create_state(file_set)
    }

    /// Install a surface session from per-hemisphere functional data and meshes.
    pub fn create_surface_state(
        &mut self,
        left_func: Option<SurfaceFunc>,
        right_func: Option<SurfaceFunc>,
        left_mesh: Option<SurfaceMesh>,
        right_mesh: Option<SurfaceMesh>,
    ) -> Result<&ViewerMetadata> {
        let (_, paired) = validate_gii_file_inputs(
            left_mesh.as_ref(),
            right_mesh.as_ref(),
            left_func.as_ref(),
            right_func.as_ref(),
        );
        ensure(paired, Rule::GiftiFileInputs)?;

        let pair = |func: Option<SurfaceFunc>, mesh: Option<SurfaceMesh>| {
            func.zip(mesh).map(|(func, mesh)| HemisphereData { func, mesh })
        };
        let file_set = FileSet::Surface(SurfaceFiles {
            left: pair(left_func, left_mesh),
            right: pair(right_func, right_mesh),
        });
        self.create_state(file_set)
    }

    /// Install an already assembled file set after re-checking it.
    pub fn create_state(&mut self, file_set: FileSet) -> Result<&ViewerMetadata> {
        check_file_set(&file_set)?;
        let state = ViewerState::new(file_set);
        info!(
            modality = %state.modality(),
            timepoints = state.temporal_length(),
            replaced = self.state.is_some(),
            "viewer state created"
        );
        Ok(&self.state.insert(state).metadata)
    }

    /// Install a validated upload and its auxiliary data in one step.
    ///
    /// Either everything in the bundle is applied or nothing is.
    pub fn apply_bundle(&mut self, bundle: UploadBundle) -> Result<&ViewerMetadata> {
        check_file_set(&bundle.file_set)?;
        let mut state = ViewerState::new(bundle.file_set);
        if let Some(series) = bundle.time_series {
            state.attach_time_series(series)?;
        }
        if let Some(task) = bundle.task {
            state.attach_task_design(task)?;
        }
        info!(
            modality = %state.modality(),
            timepoints = state.temporal_length(),
            time_series = state.metadata.time_series.len(),
            task = state.task_design.is_some(),
            "viewer state created from upload"
        );
        Ok(&self.state.insert(state).metadata)
    }

    /// Drop the current session.
    pub fn reset(&mut self) {
        if self.state.take().is_some() {
            debug!("viewer state reset");
        }
    }

    // ========================================================================
    // Auxiliary Data
    // ========================================================================

    /// Merge time series into the session.
    ///
    /// Every series must match the temporal length. Existing labels are
    /// replaced in place; new labels are appended in order.
    pub fn attach_time_series(&mut self, series: TimeSeries) -> Result<()> {
        let state = self.state.as_mut().ok_or(ViewerError::NoActiveState)?;
        let count = series.len();
        state.attach_time_series(series)?;
        debug!(count, total = state.metadata.time_series.len(), "time series attached");
        Ok(())
    }

    /// Replace the session's task regressors.
    pub fn attach_task_design(&mut self, regressors: TaskRegressors) -> Result<()> {
        let state = self.state.as_mut().ok_or(ViewerError::NoActiveState)?;
        let conditions = regressors.conditions.len();
        state.attach_task_design(regressors)?;
        debug!(conditions, "task design attached");
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get_metadata(&self) -> Result<&ViewerMetadata> {
        self.state()
            .map(ViewerState::metadata)
            .ok_or(ViewerError::NoActiveState)
    }

    pub fn state(&self) -> Option<&ViewerState> {
        self.state.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn modality(&self) -> Option<Modality> {
        self.state().map(ViewerState::modality)
    }
}

/// Structural invariants of a file set.
fn check_file_set(file_set: &FileSet) -> Result<()> {
    match file_set {
        FileSet::Volumetric(files) => {
            ensure(validate_nii_4d(&files.func), Rule::NiftiFunc4d)?;
            for image in [&files.anat, &files.mask].into_iter().flatten() {
                ensure(validate_nii_3d(image), Rule::Nifti3d)?;
                ensure(validate_nii_same_dim_len(image, &files.func), Rule::NiftiSameDims)?;
            }
            if let Some(mask) = &files.mask {
                ensure(validate_nii_brain_mask(mask), Rule::NiftiBrainMask)?;
            }
        }
        FileSet::Surface(files) => {
            let hemispheres: Vec<&HemisphereData> = files.present().map(|(_, data)| data).collect();
            ensure(!hemispheres.is_empty(), Rule::GiftiFileInputs)?;
            for data in &hemispheres {
                ensure(data.func.timepoints() > 0, Rule::GiftiFuncShape)?;
                let vertices = data.mesh.vertex_count();
                ensure(
                    data.func.frames().iter().all(|frame| frame.len() == vertices),
                    Rule::GiftiVertexCount,
                )?;
            }
            if let [left, right] = hemispheres.as_slice() {
                ensure(
                    left.func.timepoints() == right.func.timepoints(),
                    Rule::GiftiFuncLength,
                )?;
            }
        }
    }
    Ok(())
}

//! The validating upload pipeline.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fviz_model::{
    FileRole, FileSet, GiftiImage, Hemisphere, HemisphereData, Modality, SurfaceFiles,
    SurfaceFunc, SurfaceMesh, TimeSeries, VolumeImage, VolumetricFiles,
};
use fviz_validate::{
    Rule, validate_gii_file_inputs, validate_gii_func, validate_gii_func_ext,
    validate_gii_func_len, validate_gii_func_mesh_vertices, validate_gii_mesh,
    validate_gii_mesh_ext, validate_nii_3d, validate_nii_4d, validate_nii_brain_mask,
    validate_nii_ext, validate_nii_same_dim_len,
};
use tracing::{debug, info, info_span, warn};

use crate::auxiliary::{build_task_regressors, load_task_design, load_time_series};
use crate::error::{IngestError, Result};
use crate::readers::{read_gifti, read_nifti};
use crate::request::{IngestOptions, UploadBundle, UploadRequest, file_name};

/// Functional and mesh roles of a hemisphere.
fn hemisphere_roles(hemisphere: Hemisphere) -> (FileRole, FileRole) {
    match hemisphere {
        Hemisphere::Left => (FileRole::GiftiLeftFunc, FileRole::GiftiLeftMesh),
        Hemisphere::Right => (FileRole::GiftiRightFunc, FileRole::GiftiRightMesh),
    }
}

const HEMISPHERES: [Hemisphere; 2] = [Hemisphere::Left, Hemisphere::Right];

/// Validates and loads an [`UploadRequest`].
///
/// Checks run in a fixed order and the first failure aborts the upload.
/// Each file is only read after its own name checks pass, and nothing is
/// retained between calls.
#[derive(Debug, Clone, Default)]
pub struct FileUpload {
    options: IngestOptions,
}

impl FileUpload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: IngestOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Run the full pipeline.
    pub fn upload(&self, request: &UploadRequest) -> Result<UploadBundle> {
        let span = info_span!("upload", modality = %request.modality);
        let _guard = span.enter();

        check_modality(request)?;
        check_files_exist(request)?;

        let file_set = info_span!("imaging").in_scope(|| match request.modality {
            Modality::Volumetric => self.load_volumetric(&request.files).map(FileSet::Volumetric),
            Modality::Surface => self.load_surface(&request.files).map(FileSet::Surface),
        })?;
        let temporal_length = file_set.temporal_length();
        info!(timepoints = temporal_length, "imaging files validated");

        let time_series = info_span!("time_series")
            .in_scope(|| self.load_series(request, temporal_length))?;

        let task = match &request.task {
            Some(input) => Some(info_span!("task_design").in_scope(|| {
                let design = load_task_design(input, &self.options)?;
                build_task_regressors(&design, input.tr, input.slicetime_ref, temporal_length)
            })?),
            None => None,
        };

        info!(
            time_series = time_series.as_ref().map_or(0, TimeSeries::len),
            task = task.is_some(),
            "upload complete"
        );

        Ok(UploadBundle {
            file_set,
            time_series,
            task,
        })
    }

    fn load_volumetric(&self, files: &BTreeMap<FileRole, PathBuf>) -> Result<VolumetricFiles> {
        let func_path = files.get(&FileRole::NiftiFunc).ok_or(IngestError::MissingRole {
            role: FileRole::NiftiFunc,
        })?;
        check_extension(FileRole::NiftiFunc, func_path, validate_nii_ext, Rule::NiftiExtension)?;
        let func = read_nifti(func_path)?;
        if !validate_nii_4d(&func) {
            return Err(IngestError::validation(
                FileRole::NiftiFunc,
                Rule::NiftiFunc4d,
                format!("{} has {} dimensions", file_name(func_path), func.ndim()),
            ));
        }

        let anat = files
            .get(&FileRole::NiftiAnat)
            .map(|path| load_companion(FileRole::NiftiAnat, path, &func))
            .transpose()?;

        let mask = files
            .get(&FileRole::NiftiMask)
            .map(|path| {
                let mask = load_companion(FileRole::NiftiMask, path, &func)?;
                if !validate_nii_brain_mask(&mask) {
                    return Err(IngestError::validation(
                        FileRole::NiftiMask,
                        Rule::NiftiBrainMask,
                        file_name(path),
                    ));
                }
                Ok(mask)
            })
            .transpose()?;

        Ok(VolumetricFiles { func, anat, mask })
    }

    fn load_surface(&self, files: &BTreeMap<FileRole, PathBuf>) -> Result<SurfaceFiles> {
        let (message, valid) = validate_gii_file_inputs(
            files.get(&FileRole::GiftiLeftMesh),
            files.get(&FileRole::GiftiRightMesh),
            files.get(&FileRole::GiftiLeftFunc),
            files.get(&FileRole::GiftiRightFunc),
        );
        if !valid {
            return Err(IngestError::validation(
                unpaired_role(files),
                Rule::GiftiFileInputs,
                message,
            ));
        }

        for role in FileRole::SURFACE {
            if let Some(path) = files.get(role) {
                if matches!(role, FileRole::GiftiLeftMesh | FileRole::GiftiRightMesh) {
                    check_extension(*role, path, validate_gii_mesh_ext, Rule::GiftiMeshExtension)?;
                } else {
                    check_extension(*role, path, validate_gii_func_ext, Rule::GiftiFuncExtension)?;
                }
            }
        }

        let mut loaded: Vec<(Hemisphere, GiftiImage, GiftiImage)> = Vec::new();
        for hemisphere in HEMISPHERES {
            let (func_role, mesh_role) = hemisphere_roles(hemisphere);
            let (Some(func_path), Some(mesh_path)) = (files.get(&func_role), files.get(&mesh_role))
            else {
                continue;
            };

            let func = read_gifti(func_path)?;
            if !validate_gii_func(&func) {
                return Err(IngestError::validation(
                    func_role,
                    Rule::GiftiFuncShape,
                    file_name(func_path),
                ));
            }
            let mesh = read_gifti(mesh_path)?;
            if !validate_gii_mesh(&mesh) {
                return Err(IngestError::validation(
                    mesh_role,
                    Rule::GiftiMeshShape,
                    file_name(mesh_path),
                ));
            }
            debug!(%hemisphere, frames = func.darrays.len(), "loaded hemisphere");
            loaded.push((hemisphere, func, mesh));
        }

        if let [(_, left, _), (_, right, _)] = loaded.as_slice() {
            if !validate_gii_func_len(left, right) {
                return Err(IngestError::validation(
                    FileRole::GiftiRightFunc,
                    Rule::GiftiFuncLength,
                    format!(
                        "left has {} frames, right has {}",
                        left.darrays.len(),
                        right.darrays.len()
                    ),
                ));
            }
        }

        for (hemisphere, func, mesh) in &loaded {
            if !validate_gii_func_mesh_vertices(func, mesh) {
                let (func_role, _) = hemisphere_roles(*hemisphere);
                return Err(IngestError::validation(
                    func_role,
                    Rule::GiftiVertexCount,
                    format!("{hemisphere} hemisphere"),
                ));
            }
        }

        let mut surface = SurfaceFiles {
            left: None,
            right: None,
        };
        for (hemisphere, func, mesh) in loaded {
            let (func_role, mesh_role) = hemisphere_roles(hemisphere);
            let func = SurfaceFunc::from_gifti(&func).ok_or_else(|| {
                IngestError::validation(func_role, Rule::GiftiFuncShape, hemisphere.label())
            })?;
            let mesh = SurfaceMesh::from_gifti(&mesh).ok_or_else(|| {
                IngestError::validation(mesh_role, Rule::GiftiMeshShape, hemisphere.label())
            })?;
            let data = Some(HemisphereData { func, mesh });
            match hemisphere {
                Hemisphere::Left => surface.left = data,
                Hemisphere::Right => surface.right = data,
            }
        }

        Ok(surface)
    }

    fn load_series(
        &self,
        request: &UploadRequest,
        temporal_length: usize,
    ) -> Result<Option<TimeSeries>> {
        if request.time_series.is_empty() {
            return Ok(None);
        }

        let mut series = TimeSeries::new();
        for input in &request.time_series {
            let label = input.effective_label();
            if series.contains(&label) {
                return Err(IngestError::validation(
                    FileRole::TimeSeries,
                    Rule::TimeSeriesLabelUnique,
                    label,
                ));
            }
            let values = load_time_series(input, temporal_length, &self.options)?;
            series.insert(label, values);
        }
        Ok(Some(series))
    }
}

/// Declared modality agrees with the supplied imaging roles, and the roles
/// do not mix modalities.
fn check_modality(request: &UploadRequest) -> Result<()> {
    let has = |modality: Modality| {
        request
            .files
            .keys()
            .any(|role| role.modality() == Some(modality))
    };
    let volumetric = has(Modality::Volumetric);
    let surface = has(Modality::Surface);

    if volumetric && surface {
        return Err(IngestError::ConflictingModality {
            first: Modality::Volumetric,
            second: Modality::Surface,
        });
    }
    let detected = if volumetric {
        Some(Modality::Volumetric)
    } else if surface {
        Some(Modality::Surface)
    } else {
        None
    };
    if let Some(detected) = detected {
        if detected != request.modality {
            return Err(IngestError::ConflictingModality {
                first: request.modality,
                second: detected,
            });
        }
    }

    for role in request.files.keys().filter(|role| role.modality().is_none()) {
        warn!(%role, "auxiliary role in imaging files is ignored");
    }
    Ok(())
}

fn check_files_exist(request: &UploadRequest) -> Result<()> {
    let imaging = request
        .files
        .iter()
        .filter(|(role, _)| role.modality().is_some())
        .map(|(role, path)| (*role, path));
    let series = request
        .time_series
        .iter()
        .map(|input| (FileRole::TimeSeries, &input.path));
    let task = request
        .task
        .iter()
        .map(|input| (FileRole::TaskDesign, &input.path));

    for (role, path) in imaging.chain(series).chain(task) {
        if !path.exists() {
            return Err(IngestError::MissingFile {
                role,
                path: path.clone(),
            });
        }
    }
    Ok(())
}

fn check_extension(role: FileRole, path: &Path, check: fn(&str) -> bool, rule: Rule) -> Result<()> {
    let name = file_name(path);
    if check(&name) {
        Ok(())
    } else {
        Err(IngestError::validation(role, rule, name))
    }
}

/// Anatomical or mask image: 3-D with the functional image's spatial extent.
fn load_companion(role: FileRole, path: &Path, func: &VolumeImage) -> Result<VolumeImage> {
    check_extension(role, path, validate_nii_ext, Rule::NiftiExtension)?;
    let image = read_nifti(path)?;
    if !validate_nii_3d(&image) {
        return Err(IngestError::validation(
            role,
            Rule::Nifti3d,
            format!("{} has {} dimensions", file_name(path), image.ndim()),
        ));
    }
    if !validate_nii_same_dim_len(&image, func) {
        return Err(IngestError::validation(
            role,
            Rule::NiftiSameDims,
            format!("{:?} vs functional {:?}", image.shape(), &func.shape()[..3]),
        ));
    }
    Ok(image)
}

/// Role whose absence breaks hemisphere pairing (left checked first).
fn unpaired_role(files: &BTreeMap<FileRole, PathBuf>) -> FileRole {
    for hemisphere in HEMISPHERES {
        let (func_role, mesh_role) = hemisphere_roles(hemisphere);
        match (files.contains_key(&func_role), files.contains_key(&mesh_role)) {
            (true, false) => return mesh_role,
            (false, true) => return func_role,
            _ => {}
        }
    }
    FileRole::GiftiLeftFunc
}

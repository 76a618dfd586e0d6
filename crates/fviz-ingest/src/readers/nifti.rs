//! NIfTI-1 volume loading.

use std::path::Path;

use fviz_model::VolumeImage;
use ndarray::{ArrayD, IxDyn};
use nifti::volume::ndarray::IntoNdArray;
use nifti::{NiftiObject, ReaderOptions};

use crate::error::{IngestError, Result};

/// Read a `.nii` or `.nii.gz` file into a [`VolumeImage`].
///
/// Voxel values are scaled by the header's slope/intercept and converted to
/// `f32`. Compression is detected from the file extension.
pub fn read_nifti(path: &Path) -> Result<VolumeImage> {
    let object = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| nifti_error(path, e))?;

    let pixdim = object.header().pixdim;
    let voxel_size = [pixdim[1], pixdim[2], pixdim[3]];

    let array = object
        .into_volume()
        .into_ndarray::<f32>()
        .map_err(|e| nifti_error(path, e))?;

    // Copy out in logical order so the result does not depend on the
    // reader's memory layout.
    let shape = array.shape().to_vec();
    let values: Vec<f32> = array.iter().copied().collect();
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| IngestError::NiftiRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(
        path = %path.display(),
        shape = ?shape,
        "loaded NIfTI volume"
    );

    Ok(VolumeImage::new(data).with_voxel_size(voxel_size))
}

fn nifti_error(path: &Path, err: impl std::fmt::Display) -> IngestError {
    IngestError::NiftiRead {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

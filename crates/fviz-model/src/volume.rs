//! Volumetric (NIfTI) image wrapper.

use ndarray::{ArrayD, ArrayViewD, Axis};

/// A loaded volumetric image.
///
/// Data is indexed `[x, y, z]` for 3-D images and `[x, y, z, t]` for 4-D
/// functional images.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeImage {
    data: ArrayD<f32>,
    voxel_size: Option<[f32; 3]>,
}

impl VolumeImage {
    pub fn new(data: ArrayD<f32>) -> Self {
        Self {
            data,
            voxel_size: None,
        }
    }

    /// Attach voxel dimensions (mm) read from the header.
    #[must_use]
    pub fn with_voxel_size(mut self, voxel_size: [f32; 3]) -> Self {
        self.voxel_size = Some(voxel_size);
        self
    }

    pub fn data(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn voxel_size(&self) -> Option<[f32; 3]> {
        self.voxel_size
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// The first three axis lengths, if the image has at least three axes.
    pub fn spatial_shape(&self) -> Option<[usize; 3]> {
        match self.shape() {
            [x, y, z, ..] => Some([*x, *y, *z]),
            _ => None,
        }
    }

    /// Number of volumes: the fourth axis for 4-D images, otherwise 1.
    pub fn timepoints(&self) -> usize {
        if self.ndim() >= 4 { self.shape()[3] } else { 1 }
    }

    /// View of a single volume of a 4-D image.
    pub fn volume(&self, index: usize) -> Option<ArrayViewD<'_, f32>> {
        if self.ndim() < 4 || index >= self.timepoints() {
            return None;
        }
        Some(self.data.index_axis(Axis(3), index))
    }
}

//! The validated, modality-tagged file set.

use crate::modality::{Hemisphere, Modality};
use crate::surface::{SurfaceFunc, SurfaceMesh};
use crate::volume::VolumeImage;

/// Volumetric inputs: a 4-D functional image plus optional anatomy and mask.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumetricFiles {
    pub func: VolumeImage,
    pub anat: Option<VolumeImage>,
    pub mask: Option<VolumeImage>,
}

/// One hemisphere's functional data together with its mesh.
///
/// Pairing the two in one struct makes a func-without-mesh hemisphere
/// unrepresentable once a file set has been built.
#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereData {
    pub func: SurfaceFunc,
    pub mesh: SurfaceMesh,
}

/// Surface inputs: at least one hemisphere.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFiles {
    pub left: Option<HemisphereData>,
    pub right: Option<HemisphereData>,
}

impl SurfaceFiles {
    pub fn hemisphere(&self, hemisphere: Hemisphere) -> Option<&HemisphereData> {
        match hemisphere {
            Hemisphere::Left => self.left.as_ref(),
            Hemisphere::Right => self.right.as_ref(),
        }
    }

    /// Present hemispheres in left-to-right order.
    pub fn present(&self) -> impl Iterator<Item = (Hemisphere, &HemisphereData)> {
        [(Hemisphere::Left, &self.left), (Hemisphere::Right, &self.right)]
            .into_iter()
            .filter_map(|(hemi, data)| data.as_ref().map(|d| (hemi, d)))
    }
}

/// Imaging inputs of a viewer session; exactly one modality.
#[derive(Debug, Clone, PartialEq)]
pub enum FileSet {
    Volumetric(VolumetricFiles),
    Surface(SurfaceFiles),
}

impl FileSet {
    pub fn modality(&self) -> Modality {
        match self {
            Self::Volumetric(_) => Modality::Volumetric,
            Self::Surface(_) => Modality::Surface,
        }
    }

    /// Number of volumes (volumetric) or frames (surface).
    pub fn temporal_length(&self) -> usize {
        match self {
            Self::Volumetric(files) => files.func.timepoints(),
            Self::Surface(files) => files
                .present()
                .map(|(_, data)| data.func.timepoints())
                .next()
                .unwrap_or(0),
        }
    }
}

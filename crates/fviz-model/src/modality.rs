//! Modality, file role, and hemisphere enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Imaging modality of a viewer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// NIfTI voxel grids (functional, anatomical, mask).
    Volumetric,
    /// GIfTI hemispheric surfaces (functional arrays + meshes).
    Surface,
}

impl Modality {
    /// File format name shown to users.
    pub const fn format_name(&self) -> &'static str {
        match self {
            Self::Volumetric => "NIfTI",
            Self::Surface => "GIfTI",
        }
    }

    /// Short lowercase label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Volumetric => "nifti",
            Self::Surface => "gifti",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_name())
    }
}

/// Brain hemisphere for surface data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    Left,
    Right,
}

impl Hemisphere {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role a supplied file plays in an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    NiftiFunc,
    NiftiAnat,
    NiftiMask,
    GiftiLeftFunc,
    GiftiRightFunc,
    GiftiLeftMesh,
    GiftiRightMesh,
    TimeSeries,
    TaskDesign,
}

impl FileRole {
    /// Roles belonging to the volumetric modality.
    pub const VOLUMETRIC: &'static [FileRole] =
        &[Self::NiftiFunc, Self::NiftiAnat, Self::NiftiMask];

    /// Roles belonging to the surface modality.
    pub const SURFACE: &'static [FileRole] = &[
        Self::GiftiLeftFunc,
        Self::GiftiRightFunc,
        Self::GiftiLeftMesh,
        Self::GiftiRightMesh,
    ];

    /// Modality this role belongs to; `None` for auxiliary roles.
    pub const fn modality(&self) -> Option<Modality> {
        match self {
            Self::NiftiFunc | Self::NiftiAnat | Self::NiftiMask => Some(Modality::Volumetric),
            Self::GiftiLeftFunc
            | Self::GiftiRightFunc
            | Self::GiftiLeftMesh
            | Self::GiftiRightMesh => Some(Modality::Surface),
            Self::TimeSeries | Self::TaskDesign => None,
        }
    }

    /// Hemisphere for surface roles.
    pub const fn hemisphere(&self) -> Option<Hemisphere> {
        match self {
            Self::GiftiLeftFunc | Self::GiftiLeftMesh => Some(Hemisphere::Left),
            Self::GiftiRightFunc | Self::GiftiRightMesh => Some(Hemisphere::Right),
            _ => None,
        }
    }

    /// Stable identifier used in messages and serialized requests.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NiftiFunc => "nifti_func",
            Self::NiftiAnat => "nifti_anat",
            Self::NiftiMask => "nifti_mask",
            Self::GiftiLeftFunc => "gifti_left_func",
            Self::GiftiRightFunc => "gifti_right_func",
            Self::GiftiLeftMesh => "gifti_left_mesh",
            Self::GiftiRightMesh => "gifti_right_mesh",
            Self::TimeSeries => "time_series",
            Self::TaskDesign => "task_design",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Rule catalogue.
//!
//! Each [`Rule`] names one validation check so that errors can report
//! exactly which invariant a file violated.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Extension,
    Structure,
    Consistency,
    Tabular,
    Length,
}

impl Category {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Extension,
            Self::Structure,
            Self::Consistency,
            Self::Tabular,
            Self::Length,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Extension => "Extension",
            Self::Structure => "Structure",
            Self::Consistency => "Consistency",
            Self::Tabular => "Tabular",
            Self::Length => "Length",
        }
    }
}

/// A single validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    // Extension checks
    NiftiExtension,
    GiftiFuncExtension,
    GiftiMeshExtension,
    TimeSeriesExtension,
    TaskExtension,

    // Structure checks
    NiftiFunc4d,
    Nifti3d,
    GiftiFileInputs,
    GiftiFuncShape,
    GiftiMeshShape,

    // Consistency checks
    NiftiSameDims,
    NiftiBrainMask,
    GiftiFuncLength,
    GiftiVertexCount,

    // Tabular checks
    TaskRequiredColumns,
    TaskDuplicateColumns,
    TaskTr,
    TaskSlicetime,
    TaskEventTiming,
    TimeSeriesSingleColumn,
    TimeSeriesNumeric,
    TimeSeriesLabelUnique,
    TableNotEmpty,

    // Length checks
    FmriLength,
}

impl Rule {
    /// Stable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Rule::NiftiExtension => "nii_ext",
            Rule::GiftiFuncExtension => "gii_func_ext",
            Rule::GiftiMeshExtension => "gii_mesh_ext",
            Rule::TimeSeriesExtension => "ts_ext",
            Rule::TaskExtension => "task_ext",
            Rule::NiftiFunc4d => "nii_4d",
            Rule::Nifti3d => "nii_3d",
            Rule::GiftiFileInputs => "gii_file_inputs",
            Rule::GiftiFuncShape => "gii_func",
            Rule::GiftiMeshShape => "gii_mesh",
            Rule::NiftiSameDims => "nii_same_dim_len",
            Rule::NiftiBrainMask => "nii_brain_mask",
            Rule::GiftiFuncLength => "gii_func_len",
            Rule::GiftiVertexCount => "gii_func_mesh_vertices",
            Rule::TaskRequiredColumns => "task_header_required_cols",
            Rule::TaskDuplicateColumns => "task_header_duplicates",
            Rule::TaskTr => "task_tr",
            Rule::TaskSlicetime => "task_slicetime",
            Rule::TaskEventTiming => "task_event_timing",
            Rule::TimeSeriesSingleColumn => "ts_single_col",
            Rule::TimeSeriesNumeric => "ts_numeric",
            Rule::TimeSeriesLabelUnique => "ts_label_unique",
            Rule::TableNotEmpty => "ts_task_length",
            Rule::FmriLength => "ts_fmri_length",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Rule::NiftiExtension
            | Rule::GiftiFuncExtension
            | Rule::GiftiMeshExtension
            | Rule::TimeSeriesExtension
            | Rule::TaskExtension => Category::Extension,
            Rule::NiftiFunc4d
            | Rule::Nifti3d
            | Rule::GiftiFileInputs
            | Rule::GiftiFuncShape
            | Rule::GiftiMeshShape => Category::Structure,
            Rule::NiftiSameDims
            | Rule::NiftiBrainMask
            | Rule::GiftiFuncLength
            | Rule::GiftiVertexCount => Category::Consistency,
            Rule::TaskRequiredColumns
            | Rule::TaskDuplicateColumns
            | Rule::TaskTr
            | Rule::TaskSlicetime
            | Rule::TaskEventTiming
            | Rule::TimeSeriesSingleColumn
            | Rule::TimeSeriesNumeric
            | Rule::TimeSeriesLabelUnique
            | Rule::TableNotEmpty => Category::Tabular,
            Rule::FmriLength => Category::Length,
        }
    }

    /// What the rule requires, phrased for users.
    pub fn description(&self) -> &'static str {
        match self {
            Rule::NiftiExtension => "NIfTI files must end in .nii or .nii.gz",
            Rule::GiftiFuncExtension => "functional GIfTI files must end in .func.gii",
            Rule::GiftiMeshExtension => "mesh GIfTI files must end in .surf.gii",
            Rule::TimeSeriesExtension => "time series files must end in .csv or .txt",
            Rule::TaskExtension => "task design files must end in .csv or .tsv",
            Rule::NiftiFunc4d => "functional NIfTI image must be 4-dimensional",
            Rule::Nifti3d => "anatomical and mask NIfTI images must be 3-dimensional",
            Rule::GiftiFileInputs => concat!(
                "each hemisphere needs both a func and a mesh file, ",
                "and at least one hemisphere is required"
            ),
            Rule::GiftiFuncShape => "functional GIfTI data arrays must all be 1-dimensional",
            Rule::GiftiMeshShape => {
                "mesh GIfTI must contain exactly two 2-dimensional arrays (coordinates and faces)"
            }
            Rule::NiftiSameDims => "image must share spatial dimensions with the functional image",
            Rule::NiftiBrainMask => "brain mask values must be 0 or 1",
            Rule::GiftiFuncLength => {
                "left and right functional GIfTI files must have the same number of frames"
            }
            Rule::GiftiVertexCount => {
                "functional GIfTI frames must have one value per mesh vertex"
            }
            Rule::TaskRequiredColumns => "task design header must contain onset and duration",
            Rule::TaskDuplicateColumns => "task design header has duplicate column names",
            Rule::TaskTr => "TR must be greater than 0",
            Rule::TaskSlicetime => "slice-time reference must be between 0 and 1",
            Rule::TaskEventTiming => "onset and duration values must be non-negative numbers",
            Rule::TimeSeriesSingleColumn => "time series files must contain a single column",
            Rule::TimeSeriesNumeric => "time series values must be numeric",
            Rule::TimeSeriesLabelUnique => "time series labels must be unique",
            Rule::TableNotEmpty => "file must contain at least one row of data",
            Rule::FmriLength => {
                "time series length must match the number of functional volumes"
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

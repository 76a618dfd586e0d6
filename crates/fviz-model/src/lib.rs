//! Domain types for the fviz neuroimaging viewer.
//!
//! This crate provides the data model shared by every other fviz crate:
//! - **Imaging**: volumetric images ([`VolumeImage`]), raw GIfTI containers
//!   ([`GiftiImage`]) and the surface types derived from them
//! - **File sets**: the [`FileSet`] sum type, one variant per modality
//! - **Auxiliary data**: time series, task design events, and task regressors
//! - **Metadata**: the serializable [`ViewerMetadata`] projection handed to the
//!   presentation layer and the state cache
//!
//! # Module Organization
//!
//! - [`modality`]: Modality, file roles, and hemispheres
//! - [`volume`]: Volumetric image wrapper over `ndarray`
//! - [`surface`]: GIfTI data arrays, surface functional data, and meshes
//! - [`file_set`]: The validated, modality-tagged file set
//! - [`auxiliary`]: Time series and task design types
//! - [`metadata`]: Viewer metadata projection

pub mod auxiliary;
pub mod file_set;
pub mod metadata;
pub mod modality;
pub mod surface;
pub mod volume;

pub use auxiliary::{
    ConditionRegressor, IMPLICIT_CONDITION, TaskDesign, TaskEvent, TaskRegressors, TimeSeries,
    TimeSeriesEntry,
};
pub use file_set::{FileSet, HemisphereData, SurfaceFiles, VolumetricFiles};
pub use metadata::{
    Dimensions, HemisphereInfo, TaskSummary, TimeSeriesSummary, ValueRange, ViewerMetadata,
};
pub use modality::{FileRole, Hemisphere, Modality};
pub use surface::{GiftiDataArray, GiftiImage, SurfaceFunc, SurfaceMesh};
pub use volume::VolumeImage;

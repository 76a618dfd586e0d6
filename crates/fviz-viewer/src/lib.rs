//! Viewer state management for fviz.
//!
//! [`DataManager`] owns at most one active session: a validated
//! [`FileSet`](fviz_model::FileSet), its optional time series and task
//! regressors, and the [`ViewerMetadata`](fviz_model::ViewerMetadata) derived
//! from them. Metadata is recomputed whenever the session changes, so reads
//! never touch voxel or vertex data.
//!
//! # Example
//!
//! ```ignore
//! use fviz_viewer::DataManager;
//!
//! let mut manager = DataManager::new();
//! manager.apply_bundle(bundle)?;
//! let metadata = manager.get_metadata()?;
//! println!("{} timepoints", metadata.timepoints);
//! ```

mod derive;
mod error;
mod manager;

pub use error::{Result, ViewerError};
pub use manager::{DataManager, ViewerState};

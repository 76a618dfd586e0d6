//! Neuroimaging file ingestion for fviz.
//!
//! This crate validates and loads a user's upload (a NIfTI triplet or a
//! GIfTI quartet plus optional time series and task design tables) into the
//! domain objects consumed by the viewer.
//!
//! # Features
//!
//! - **Upload pipeline**: [`FileUpload`] checks modality exclusivity, file
//!   existence, and every validation rule in a fixed order
//! - **Readers**: NIfTI via the `nifti` crate, GIfTI XML with ASCII, base64
//!   and compressed encodings, delimited tables via `csv`
//! - **Task regressors**: per-condition block and HRF regressors aligned to
//!   the functional frame times
//!
//! # Example
//!
//! ```ignore
//! use fviz_ingest::{FileUpload, TimeSeriesInput, UploadRequest};
//! use fviz_model::{FileRole, Modality};
//!
//! let request = UploadRequest::new(Modality::Volumetric)
//!     .with_file(FileRole::NiftiFunc, "sub-01_bold.nii.gz")
//!     .with_file(FileRole::NiftiMask, "sub-01_mask.nii.gz")
//!     .with_time_series(TimeSeriesInput::new("motion.csv", "motion"));
//!
//! let bundle = FileUpload::new().upload(&request)?;
//! ```

mod auxiliary;
mod error;
pub mod readers;
mod request;
mod upload;

// === Error Types ===
pub use error::{IngestError, Result};

// === Upload Pipeline ===
pub use request::{
    DEFAULT_SLICETIME_REF, IngestOptions, TaskDesignInput, TimeSeriesInput, UploadBundle,
    UploadRequest,
};
pub use upload::FileUpload;

// === Auxiliary Data ===
pub use auxiliary::{build_task_regressors, frame_times, load_task_design, load_time_series};

// === Readers ===
pub use readers::{MAX_TABLE_FILE_SIZE, read_gifti, read_nifti};

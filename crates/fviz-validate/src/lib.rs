//! Validation predicates for fviz inputs.
//!
//! Every check is a free function with no state and no side effects beyond
//! reading its arguments. Callers decide ordering and how failures are
//! reported; the [`Rule`] catalogue gives each check a stable identifier for
//! error messages.
//!
//! # Checks
//!
//! - **Extension**: exact, case-sensitive suffix match per file role
//! - **Structure**: dimensionality of volumes, shape of GIfTI arrays,
//!   hemisphere pairing
//! - **Consistency**: matching spatial extents, matching hemisphere lengths,
//!   binary masks, mesh/func vertex agreement
//! - **Tabular**: task design header and timing parameters, single-column
//!   numeric time series, non-empty tables
//! - **Length**: auxiliary series against the functional temporal length

mod checks;
mod rule;

pub use checks::extension::{
    validate_gii_func_ext, validate_gii_mesh_ext, validate_nii_ext, validate_task_ext,
    validate_ts_ext,
};
pub use checks::gifti::{
    validate_gii_file_inputs, validate_gii_func, validate_gii_func_len,
    validate_gii_func_mesh_vertices, validate_gii_mesh,
};
pub use checks::nifti::{
    validate_nii_3d, validate_nii_4d, validate_nii_brain_mask, validate_nii_same_dim_len,
};
pub use checks::table::{
    OPTIONAL_TASK_COLUMNS, REQUIRED_TASK_COLUMNS, validate_task_event_timing,
    validate_task_header_duplicates, validate_task_header_required_cols,
    validate_task_slicetime, validate_task_tr, validate_ts_fmri_length, validate_ts_numeric,
    validate_ts_single_col, validate_ts_task_length,
};
pub use rule::{Category, Rule};

//! File name suffix checks.
//!
//! Suffixes are matched exactly and case-sensitively. A functional GIfTI file
//! must end in `.func.gii` and a mesh in `.surf.gii`; a bare `.gii` is neither.

const NIFTI_SUFFIXES: &[&str] = &[".nii", ".nii.gz"];
const GIFTI_FUNC_SUFFIX: &str = ".func.gii";
const GIFTI_MESH_SUFFIX: &str = ".surf.gii";
const TIME_SERIES_SUFFIXES: &[&str] = &[".csv", ".txt"];
const TASK_SUFFIXES: &[&str] = &[".csv", ".tsv"];

fn has_suffix(name: &str, suffixes: &[&str]) -> bool {
    suffixes
        .iter()
        .any(|suffix| name.len() > suffix.len() && name.ends_with(suffix))
}

/// NIfTI image: `.nii` or `.nii.gz`.
pub fn validate_nii_ext(name: &str) -> bool {
    has_suffix(name, NIFTI_SUFFIXES)
}

/// Functional GIfTI: `.func.gii`.
pub fn validate_gii_func_ext(name: &str) -> bool {
    has_suffix(name, &[GIFTI_FUNC_SUFFIX])
}

/// Mesh GIfTI: `.surf.gii`.
pub fn validate_gii_mesh_ext(name: &str) -> bool {
    has_suffix(name, &[GIFTI_MESH_SUFFIX])
}

/// Time series table: `.csv` or `.txt`.
pub fn validate_ts_ext(name: &str) -> bool {
    has_suffix(name, TIME_SERIES_SUFFIXES)
}

/// Task design table: `.csv` or `.tsv`.
pub fn validate_task_ext(name: &str) -> bool {
    has_suffix(name, TASK_SUFFIXES)
}

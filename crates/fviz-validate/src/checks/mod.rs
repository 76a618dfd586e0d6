//! Validation check families.

pub mod extension;
pub mod gifti;
pub mod nifti;
pub mod table;

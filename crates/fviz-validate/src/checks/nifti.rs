//! Volumetric image checks.

use fviz_model::VolumeImage;

/// Functional image has exactly four axes.
pub fn validate_nii_4d(image: &VolumeImage) -> bool {
    image.ndim() == 4
}

/// Anatomical or mask image has exactly three axes.
pub fn validate_nii_3d(image: &VolumeImage) -> bool {
    image.ndim() == 3
}

/// Both images share the same first three axis lengths.
pub fn validate_nii_same_dim_len(image: &VolumeImage, other: &VolumeImage) -> bool {
    match (image.spatial_shape(), other.spatial_shape()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Every mask value is exactly 0 or 1.
pub fn validate_nii_brain_mask(mask: &VolumeImage) -> bool {
    mask.data().iter().all(|&v| v == 0.0 || v == 1.0)
}

//! Surface (GIfTI) checks.

use fviz_model::surface::{INTENT_POINTSET, INTENT_TRIANGLE};
use fviz_model::{GiftiImage, Hemisphere};

/// Check that functional and mesh files come in per-hemisphere pairs.
///
/// Generic over the handle types so it can run on paths before anything is
/// loaded. Returns an empty message when valid; otherwise the message names
/// the first offending hemisphere (left before right).
pub fn validate_gii_file_inputs<M, F>(
    left_mesh: Option<&M>,
    right_mesh: Option<&M>,
    left_func: Option<&F>,
    right_func: Option<&F>,
) -> (String, bool) {
    let hemispheres = [
        (Hemisphere::Left, left_mesh.is_some(), left_func.is_some()),
        (Hemisphere::Right, right_mesh.is_some(), right_func.is_some()),
    ];

    for (hemisphere, has_mesh, has_func) in hemispheres {
        if has_func && !has_mesh {
            return (
                format!(
                    "{hemisphere} mesh file must be provided with the {hemisphere} func file"
                ),
                false,
            );
        }
        if has_mesh && !has_func {
            return (
                format!(
                    "{hemisphere} func file must be provided with the {hemisphere} mesh file"
                ),
                false,
            );
        }
    }

    if hemispheres.iter().all(|(_, has_mesh, _)| !has_mesh) {
        return (
            "at least one hemisphere (func and mesh file) must be provided".to_string(),
            false,
        );
    }

    (String::new(), true)
}

/// Functional image: at least one data array, every array 1-D.
pub fn validate_gii_func(image: &GiftiImage) -> bool {
    !image.darrays.is_empty() && image.darrays.iter().all(|d| d.ndim() == 1)
}

/// Mesh image: exactly two data arrays, both 2-D.
pub fn validate_gii_mesh(image: &GiftiImage) -> bool {
    image.darrays.len() == 2 && image.darrays.iter().all(|d| d.ndim() == 2)
}

/// Left and right functional images have the same number of frames.
pub fn validate_gii_func_len(left: &GiftiImage, right: &GiftiImage) -> bool {
    left.darrays.len() == right.darrays.len()
}

/// Every functional frame has one value per mesh vertex.
///
/// The coordinate array is the one with the point-set intent, else the first
/// array without the triangle intent.
pub fn validate_gii_func_mesh_vertices(func: &GiftiImage, mesh: &GiftiImage) -> bool {
    let coords = mesh
        .darrays
        .iter()
        .find(|d| d.is_intent(INTENT_POINTSET))
        .or_else(|| mesh.darrays.iter().find(|d| !d.is_intent(INTENT_TRIANGLE)))
        .or_else(|| mesh.darrays.first());
    let Some(vertex_count) = coords.and_then(|c| c.dims.first().copied()) else {
        return false;
    };
    func.darrays
        .iter()
        .all(|frame| frame.dims.first() == Some(&vertex_count))
}

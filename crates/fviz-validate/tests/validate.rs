//! Tests for the validation predicates.

use fviz_model::surface::{INTENT_POINTSET, INTENT_TRIANGLE};
use fviz_model::{GiftiDataArray, GiftiImage, VolumeImage};
use fviz_validate::{
    REQUIRED_TASK_COLUMNS, validate_gii_file_inputs, validate_gii_func, validate_gii_func_ext,
    validate_gii_func_len, validate_gii_func_mesh_vertices, validate_gii_mesh,
    validate_gii_mesh_ext, validate_nii_3d, validate_nii_4d, validate_nii_brain_mask,
    validate_nii_ext, validate_nii_same_dim_len, validate_task_ext,
    validate_task_header_duplicates, validate_task_header_required_cols,
    validate_task_slicetime, validate_task_tr, validate_ts_ext, validate_ts_fmri_length,
    validate_ts_numeric, validate_ts_single_col, validate_ts_task_length,
};
use ndarray::{ArrayD, IxDyn};
use proptest::prelude::*;

fn volume(shape: &[usize]) -> VolumeImage {
    VolumeImage::new(ArrayD::zeros(IxDyn(shape)))
}

fn func_image(frames: usize, vertices: usize) -> GiftiImage {
    GiftiImage::new(
        (0..frames)
            .map(|i| GiftiDataArray::vector(vec![i as f64; vertices]))
            .collect(),
    )
}

fn mesh_image(vertices: usize, faces: usize) -> GiftiImage {
    GiftiImage::new(vec![
        GiftiDataArray::new(INTENT_POINTSET, vec![vertices, 3], vec![0.0; vertices * 3]),
        GiftiDataArray::new(INTENT_TRIANGLE, vec![faces, 3], vec![0.0; faces * 3]),
    ])
}

#[test]
fn test_gii_func_ext() {
    assert!(validate_gii_func_ext("data.func.gii"));
    assert!(!validate_gii_func_ext("data.gii"));
    assert!(!validate_gii_func_ext("data.surf.gii"));
    assert!(!validate_gii_func_ext("data.txt"));
    assert!(!validate_gii_func_ext("data.func.gii.gz"));
}

#[test]
fn test_gii_mesh_ext() {
    assert!(validate_gii_mesh_ext("data.surf.gii"));
    assert!(!validate_gii_mesh_ext("data.gii"));
    assert!(!validate_gii_mesh_ext("data.func.gii"));
    assert!(!validate_gii_mesh_ext("data.txt"));
    assert!(!validate_gii_mesh_ext("data.surf.gii.gz"));
}

#[test]
fn test_gii_file_inputs() {
    let (left_mesh, right_mesh) = ("lh.surf.gii", "rh.surf.gii");
    let (left_func, right_func) = ("lh.func.gii", "rh.func.gii");

    let (_, valid) = validate_gii_file_inputs(Some(&left_mesh), None, Some(&left_func), None);
    assert!(valid);

    let (msg, valid) = validate_gii_file_inputs(
        Some(&left_mesh),
        Some(&right_mesh),
        Some(&left_func),
        Some(&right_func),
    );
    assert!(valid);
    assert!(msg.is_empty());

    let (msg, valid) = validate_gii_file_inputs(None::<&&str>, None, Some(&left_func), None);
    assert!(!valid);
    assert!(msg.contains("mesh file must be provided"));

    let (msg, valid) = validate_gii_file_inputs(Some(&left_mesh), None, None, Some(&right_func));
    assert!(!valid);
    assert!(msg.contains("func file must be provided"));
}

#[test]
fn test_gii_func_shape() {
    assert!(validate_gii_func(&func_image(5, 100)));

    let two_d = GiftiImage::new(vec![
        GiftiDataArray::new("NIFTI_INTENT_NONE", vec![10, 10], vec![0.0; 100]);
        5
    ]);
    assert!(!validate_gii_func(&two_d));
    assert!(!validate_gii_func(&GiftiImage::new(Vec::new())));
}

#[test]
fn test_gii_mesh_shape() {
    assert!(validate_gii_mesh(&mesh_image(10, 4)));

    let single = GiftiImage::new(vec![GiftiDataArray::new(
        INTENT_POINTSET,
        vec![10, 3],
        vec![0.0; 30],
    )]);
    assert!(!validate_gii_mesh(&single));
}

#[test]
fn test_gii_func_len() {
    let len10 = func_image(10, 100);
    let len20 = func_image(20, 100);
    assert!(validate_gii_func_len(&len10, &len10));
    assert!(!validate_gii_func_len(&len20, &len10));
}

#[test]
fn test_gii_func_mesh_vertices() {
    assert!(validate_gii_func_mesh_vertices(&func_image(3, 10), &mesh_image(10, 4)));
    assert!(!validate_gii_func_mesh_vertices(&func_image(3, 9), &mesh_image(10, 4)));
}

#[test]
fn test_nii_ext() {
    assert!(validate_nii_ext("data.nii"));
    assert!(validate_nii_ext("data.nii.gz"));
    assert!(!validate_nii_ext("data.txt"));
    assert!(!validate_nii_ext("data.gz"));
    assert!(!validate_nii_ext("data.nii.txt"));
}

#[test]
fn test_nii_dimensionality() {
    let func = volume(&[10, 10, 10, 50]);
    let anat = volume(&[10, 10, 10]);
    assert!(validate_nii_4d(&func));
    assert!(!validate_nii_4d(&anat));
    assert!(validate_nii_3d(&anat));
    assert!(!validate_nii_3d(&func));
}

#[test]
fn test_nii_same_dim_len() {
    let anat = volume(&[10, 10, 10]);
    assert!(validate_nii_same_dim_len(&volume(&[10, 10, 10]), &anat));
    assert!(!validate_nii_same_dim_len(&volume(&[20, 20, 20]), &anat));
}

#[test]
fn test_nii_brain_mask() {
    let mut mask = ArrayD::<f32>::zeros(IxDyn(&[4, 4, 4]));
    mask[[1, 1, 1]] = 1.0;
    assert!(validate_nii_brain_mask(&VolumeImage::new(mask.clone())));

    mask[[2, 2, 2]] = 0.5;
    assert!(!validate_nii_brain_mask(&VolumeImage::new(mask)));
}

#[test]
fn test_task_ext() {
    assert!(validate_task_ext("task.csv"));
    assert!(validate_task_ext("task.tsv"));
    assert!(!validate_task_ext("task.txt"));
    assert!(!validate_task_ext("task"));
}

#[test]
fn test_task_header_required_cols() {
    assert!(validate_task_header_required_cols(
        &["onset", "duration", "trial_type"],
        REQUIRED_TASK_COLUMNS
    ));
    assert!(validate_task_header_required_cols(
        &["ONSET", "Duration"],
        REQUIRED_TASK_COLUMNS
    ));
    assert!(!validate_task_header_required_cols(&["onset"], REQUIRED_TASK_COLUMNS));
    assert!(!validate_task_header_required_cols(
        &["duration", "trial_type"],
        REQUIRED_TASK_COLUMNS
    ));
}

#[test]
fn test_task_header_duplicates() {
    assert!(validate_task_header_duplicates(
        &["onset", "duration", "trial_type"],
        REQUIRED_TASK_COLUMNS
    ));
    assert!(!validate_task_header_duplicates(
        &["onset", "onset", "duration"],
        REQUIRED_TASK_COLUMNS
    ));
    assert!(!validate_task_header_duplicates(
        &["onset", "duration", "duration"],
        REQUIRED_TASK_COLUMNS
    ));
}

#[test]
fn test_task_tr() {
    assert!(validate_task_tr(2.0));
    assert!(validate_task_tr(0.5));
    assert!(!validate_task_tr(0.0));
    assert!(!validate_task_tr(-1.0));
}

#[test]
fn test_task_slicetime() {
    assert!(validate_task_slicetime(0.5));
    assert!(validate_task_slicetime(0.0));
    assert!(validate_task_slicetime(1.0));
    assert!(!validate_task_slicetime(-0.1));
    assert!(!validate_task_slicetime(1.1));
}

#[test]
fn test_ts_task_length() {
    let empty: Vec<Vec<String>> = Vec::new();
    assert!(!validate_ts_task_length(&empty));
    assert!(validate_ts_task_length(&[vec!["1.0"]]));
    assert!(validate_ts_task_length(&[vec!["1.0"], vec!["2.0"], vec!["3.0"]]));
}

#[test]
fn test_ts_ext() {
    assert!(validate_ts_ext("data.csv"));
    assert!(validate_ts_ext("data.txt"));
    assert!(!validate_ts_ext("data.tsv"));
    assert!(!validate_ts_ext("data"));
}

#[test]
fn test_ts_single_col() {
    assert!(validate_ts_single_col(&["1.0"]));
    assert!(!validate_ts_single_col(&["1.0", "2.0"]));
    assert!(validate_ts_single_col::<&str>(&[]));
}

#[test]
fn test_ts_numeric() {
    let cases = [
        ("1.0", true),
        ("-1.0", true),
        ("0.0", true),
        ("abc", false),
        ("", false),
        ("1.2.3", false),
        ("1e-10", true),
        ("-1.23e+4", true),
        ("1e999", false),
        ("-1e400", false),
    ];
    for (value, expected) in cases {
        assert_eq!(validate_ts_numeric(value), expected, "value: {value:?}");
    }
}

#[test]
fn test_ts_fmri_length() {
    let ts = [1.0, 2.0, 3.0];
    assert!(validate_ts_fmri_length(3, &ts));
    assert!(!validate_ts_fmri_length(4, &ts));
}

proptest! {
    #[test]
    fn prop_formatted_finite_floats_are_numeric(value in proptest::num::f64::NORMAL) {
        prop_assert!(validate_ts_numeric(&value.to_string()));
        let sci = format!("{value:e}");
        prop_assert!(validate_ts_numeric(&sci));
    }

    #[test]
    fn prop_alphabetic_text_is_not_numeric(value in "[a-df-zA-DF-Z]{1,12}") {
        prop_assert!(!validate_ts_numeric(&value));
    }
}

//! Save/load behaviour of the state cache.

use std::fs;

use fviz_model::{
    ConditionRegressor, Dimensions, HemisphereInfo, Modality, TaskSummary, TimeSeriesSummary,
    ValueRange, ViewerMetadata,
};
use fviz_persistence::{
    CURRENT_SCHEMA_VERSION, Cache, CacheError, derive_key, session_key,
};
use proptest::prelude::*;
use tempfile::tempdir;

fn volumetric_metadata() -> ViewerMetadata {
    ViewerMetadata {
        modality: Modality::Volumetric,
        timepoints: 3,
        dimensions: Dimensions::Volumetric { x: 64, y: 64, z: 32 },
        global_range: Some(ValueRange::new(-12.5, 4096.0)),
        frame_ranges: vec![
            Some(ValueRange::new(-12.5, 4000.0)),
            Some(ValueRange::new(0.0, 4096.0)),
            None,
        ],
        anat_input: true,
        mask_input: true,
        left_input: false,
        right_input: false,
        time_series: vec![TimeSeriesSummary {
            label: "motion".into(),
            length: 3,
            range: Some(ValueRange::new(0.25, 0.75)),
        }],
        task: Some(TaskSummary {
            tr: 2.0,
            slicetime_ref: 0.5,
            frame_times: vec![1.0, 3.0, 5.0],
            conditions: vec![ConditionRegressor {
                label: "faces".into(),
                block: vec![1.0, 0.0, 0.0],
                hrf: vec![0.0, 0.125, 0.5],
            }],
        }),
    }
}

#[test]
fn test_round_trip() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path().join("cache"));
    let metadata = volumetric_metadata();

    let path = cache.save("subject-01", &metadata).unwrap();
    assert_eq!(path, dir.path().join("cache").join("subject-01.json"));
    assert!(cache.contains("subject-01"));
    assert_eq!(cache.load("subject-01").unwrap(), metadata);

    let snapshot = cache.load_snapshot("subject-01").unwrap();
    assert_eq!(snapshot.schema_version, CURRENT_SCHEMA_VERSION);
    assert_eq!(snapshot.key, "subject-01");
}

#[test]
fn test_save_replaces_previous_snapshot() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path());
    let mut metadata = volumetric_metadata();
    cache.save("k", &metadata).unwrap();

    metadata.task = None;
    cache.save("k", &metadata).unwrap();
    assert_eq!(cache.load("k").unwrap().task, None);

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_load_miss() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path());
    let err = cache.load("never-saved").unwrap_err();
    assert!(matches!(err, CacheError::Miss { .. }));
    assert!(err.suggestion().is_some());
    assert!(!cache.contains("never-saved"));
}

#[test]
fn test_load_truncated_file_is_corrupt() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path());
    let path = cache.save("k", &volumetric_metadata()).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, &text[..text.len() / 2]).unwrap();

    assert!(matches!(cache.load("k"), Err(CacheError::Corrupt { .. })));
}

#[test]
fn test_load_renamed_file_is_corrupt() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path());
    let path = cache.save("original", &volumetric_metadata()).unwrap();
    fs::rename(&path, dir.path().join("copy.json")).unwrap();

    let err = cache.load("copy").unwrap_err();
    assert!(matches!(err, CacheError::Corrupt { ref reason, .. } if reason.contains("original")));
}

#[test]
fn test_remove() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path());
    cache.save("k", &volumetric_metadata()).unwrap();
    assert!(cache.remove("k").unwrap());
    assert!(!cache.remove("k").unwrap());
    assert!(matches!(cache.load("k"), Err(CacheError::Miss { .. })));
}

#[test]
fn test_invalid_key_never_touches_disk() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path().join("cache"));
    let err = cache.save("../outside", &volumetric_metadata()).unwrap_err();
    assert!(matches!(err, CacheError::InvalidKey { .. }));
    assert!(!dir.path().join("cache").exists());
    assert!(!dir.path().join("outside.json").exists());
}

#[test]
fn test_generated_keys_are_usable() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("func.nii");
    fs::write(&input, b"not really nifti").unwrap();
    let cache = Cache::new(dir.path().join("cache"));

    let derived = derive_key(&[&input]).unwrap();
    cache.save(&derived, &volumetric_metadata()).unwrap();
    cache.save(session_key(), &volumetric_metadata()).unwrap();
    assert!(cache.contains(&derived));
    assert!(cache.contains(session_key()));
}

#[test]
fn test_non_finite_metadata_never_reaches_disk() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path());
    let mut metadata = volumetric_metadata();
    metadata.time_series[0].range = Some(ValueRange::new(0.25, f64::INFINITY));

    let err = cache.save("k", &metadata).unwrap_err();
    assert!(matches!(err, CacheError::NonFinite { field: "time_series", .. }));
    assert!(matches!(cache.load("k"), Err(CacheError::Miss { .. })));
}

fn finite() -> impl Strategy<Value = f64> {
    use proptest::num::f64::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
    (POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO).prop_filter("finite", |v| v.is_finite())
}

fn range() -> impl Strategy<Value = ValueRange> {
    (finite(), finite()).prop_map(|(a, b)| ValueRange::new(a.min(b), a.max(b)))
}

fn task(frames: usize) -> impl Strategy<Value = TaskSummary> {
    (
        finite(),
        finite(),
        prop::collection::vec(finite(), frames),
        prop::collection::vec(
            (
                "[a-z]{1,8}",
                prop::collection::vec(finite(), frames),
                prop::collection::vec(finite(), frames),
            ),
            1..3,
        ),
    )
        .prop_map(|(tr, slicetime_ref, frame_times, conditions)| TaskSummary {
            tr,
            slicetime_ref,
            frame_times,
            conditions: conditions
                .into_iter()
                .map(|(label, block, hrf)| ConditionRegressor { label, block, hrf })
                .collect(),
        })
}

fn surface_metadata() -> impl Strategy<Value = ViewerMetadata> {
    prop::collection::vec(prop::option::of(range()), 1..20).prop_flat_map(|frame_ranges| {
        let frames = frame_ranges.len();
        (
            Just(frame_ranges),
            prop::option::of((1usize..200_000, 0usize..400_000)),
            prop::collection::vec(("[a-z_]{1,12}", prop::option::of(range())), 0..4),
            prop::option::of(task(frames)),
        )
    })
    .prop_map(|(frame_ranges, right, series, task)| {
        let left = HemisphereInfo {
            vertices: 32_492,
            faces: 64_980,
        };
        let right = right.map(|(vertices, faces)| HemisphereInfo { vertices, faces });
        ViewerMetadata {
            modality: Modality::Surface,
            timepoints: frame_ranges.len(),
            global_range: ValueRange::union_all(frame_ranges.iter().flatten().copied()),
            dimensions: Dimensions::Surface {
                left: Some(left),
                right,
            },
            time_series: series
                .into_iter()
                .map(|(label, range)| TimeSeriesSummary {
                    label,
                    length: frame_ranges.len(),
                    range,
                })
                .collect(),
            frame_ranges,
            anat_input: false,
            mask_input: false,
            left_input: true,
            right_input: right.is_some(),
            task,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(metadata in surface_metadata()) {
        let dir = tempdir().unwrap();
        let cache = Cache::new(dir.path());
        cache.save("prop", &metadata).unwrap();
        prop_assert_eq!(cache.load("prop").unwrap(), metadata);
    }
}

//! Integration tests for the load pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use fviz_cli::pipeline::{CacheTarget, LoadInputs, run_load};
use fviz_ingest::IngestOptions;
use fviz_model::{Dimensions, FileRole, Modality};
use fviz_persistence::Cache;
use tempfile::tempdir;

/// Write a NIfTI-1 file of `f32` voxels, first axis varying fastest.
fn write_nifti(dir: &Path, name: &str, shape: &[usize], voxels: &[f32]) -> PathBuf {
    let mut bytes = vec![0u8; 352];
    bytes[0..4].copy_from_slice(&348i32.to_le_bytes());
    bytes[40..42].copy_from_slice(&(shape.len() as i16).to_le_bytes());
    for axis in 0..7 {
        let length = shape.get(axis).copied().unwrap_or(1) as i16;
        bytes[42 + axis * 2..44 + axis * 2].copy_from_slice(&length.to_le_bytes());
    }
    bytes[70..72].copy_from_slice(&16i16.to_le_bytes());
    bytes[72..74].copy_from_slice(&32i16.to_le_bytes());
    for axis in 0..8 {
        bytes[76 + axis * 4..80 + axis * 4].copy_from_slice(&1f32.to_le_bytes());
    }
    bytes[108..112].copy_from_slice(&352f32.to_le_bytes());
    bytes[112..116].copy_from_slice(&1f32.to_le_bytes());
    bytes[344..348].copy_from_slice(b"n+1\0");
    for value in voxels {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

/// 2×2×2 functional run with `timepoints` frames; frame `t` holds `v + 10t`.
fn write_func(dir: &Path, timepoints: usize) -> PathBuf {
    let voxels: Vec<f32> = (0..timepoints)
        .flat_map(|t| (0..8).map(move |v| (v + 10 * t) as f32))
        .collect();
    write_nifti(dir, "func.nii", &[2, 2, 2, timepoints], &voxels)
}

/// Functional run whose voxels and frames have no exact binary representation.
fn write_fractional_func(dir: &Path, timepoints: usize) -> PathBuf {
    let voxels: Vec<f32> = (0..timepoints)
        .flat_map(|t| (0..8).map(move |v| v as f32 * 0.1 + t as f32 * 0.3))
        .collect();
    write_nifti(dir, "func.nii", &[2, 2, 2, timepoints], &voxels)
}

fn write_series(dir: &Path, name: &str, length: usize) -> PathBuf {
    let text: String = (0..length).map(|i| format!("{}\n", i as f64 * 0.5)).collect();
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn inputs(dir: &Path, timepoints: usize, series_length: usize) -> LoadInputs {
    let task = dir.join("events.csv");
    fs::write(&task, "onset,duration,trial_type\n0,2,faces\n4,2,houses\n").unwrap();
    LoadInputs {
        imaging: vec![(FileRole::NiftiFunc, write_func(dir, timepoints))],
        time_series: vec![write_series(dir, "motion.txt", series_length)],
        task_design: Some(task),
        tr: Some(2.0),
        ..LoadInputs::default()
    }
}

#[test]
fn test_load_caches_metadata() {
    let dir = tempdir().unwrap();
    let cache = Cache::new(dir.path().join("cache"));
    let target = CacheTarget {
        cache: cache.clone(),
        key: Some("run-01".to_string()),
    };

    let inputs = inputs(dir.path(), 4, 4);
    let outcome = run_load(&inputs, IngestOptions::default(), Some(&target)).unwrap();
    let metadata = &outcome.metadata;
    assert_eq!(metadata.modality, Modality::Volumetric);
    assert_eq!(metadata.timepoints, 4);
    assert_eq!(metadata.dimensions, Dimensions::Volumetric { x: 2, y: 2, z: 2 });
    assert_eq!(metadata.time_series_labels(), vec!["motion"]);
    assert_eq!(metadata.condition_labels(), vec!["faces", "houses"]);

    let (key, path) = outcome.cached.unwrap();
    assert_eq!(key, "run-01");
    assert!(path.exists());
    assert_eq!(&cache.load("run-01").unwrap(), metadata);
}

#[test]
fn test_cached_metadata_is_bit_exact() {
    let dir = tempdir().unwrap();
    let series = dir.path().join("pulse.txt");
    let text: String = (0..10).map(|i| format!("{}\n", f64::from(i) / 3.0)).collect();
    fs::write(&series, text).unwrap();
    let task = dir.path().join("events.tsv");
    fs::write(&task, "onset\tduration\ttrial_type\n1.3\t2.7\tfaces\n9.1\t3.3\thouses\n")
        .unwrap();
    let inputs = LoadInputs {
        imaging: vec![(FileRole::NiftiFunc, write_fractional_func(dir.path(), 10))],
        time_series: vec![series],
        task_design: Some(task),
        tr: Some(2.1),
        slicetime_ref: Some(0.3),
        ..LoadInputs::default()
    };
    let cache = Cache::new(dir.path().join("cache"));
    let target = CacheTarget {
        cache: cache.clone(),
        key: Some("fractional".to_string()),
    };

    let outcome = run_load(&inputs, IngestOptions::default(), Some(&target)).unwrap();
    let loaded = cache.load("fractional").unwrap();
    assert_eq!(loaded, outcome.metadata);

    let task = loaded.task.unwrap();
    assert!(task.conditions[0].hrf.iter().any(|value| value.fract() != 0.0));
}

#[test]
fn test_derived_key_is_stable() {
    let dir = tempdir().unwrap();
    let target = CacheTarget {
        cache: Cache::new(dir.path().join("cache")),
        key: None,
    };
    let inputs = inputs(dir.path(), 3, 3);

    let first = run_load(&inputs, IngestOptions::default(), Some(&target)).unwrap();
    let second = run_load(&inputs, IngestOptions::default(), Some(&target)).unwrap();
    let (first_key, _) = first.cached.unwrap();
    let (second_key, _) = second.cached.unwrap();
    assert!(first_key.starts_with("fviz-"));
    assert_eq!(first_key, second_key);
}

#[test]
fn test_failed_load_writes_nothing() {
    let dir = tempdir().unwrap();
    let cache_dir = dir.path().join("cache");
    let target = CacheTarget {
        cache: Cache::new(&cache_dir),
        key: Some("run-01".to_string()),
    };

    let inputs = inputs(dir.path(), 4, 5);
    let err = run_load(&inputs, IngestOptions::default(), Some(&target)).unwrap_err();
    assert!(format!("{err:#}").contains("motion"));
    assert!(!cache_dir.exists());
}

#[test]
fn test_load_without_cache() {
    let dir = tempdir().unwrap();
    let outcome = run_load(&inputs(dir.path(), 2, 2), IngestOptions::default(), None).unwrap();
    assert!(outcome.cached.is_none());
    assert_eq!(outcome.metadata.timepoints, 2);
}

//! Fixture writers shared by the ingestion tests.

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::write::{GzEncoder, ZlibEncoder};
use ndarray::{ArrayD, IxDyn};

const NIFTI_HEADER_SIZE: usize = 348;
const NIFTI_VOX_OFFSET: usize = 352;
const NIFTI_FLOAT32: i16 = 16;

/// Encode a single-file NIfTI-1 image with `f32` voxels.
pub fn nifti_bytes(data: &ArrayD<f32>) -> Vec<u8> {
    let mut bytes = vec![0u8; NIFTI_VOX_OFFSET];
    let put_i16 = |bytes: &mut Vec<u8>, offset: usize, value: i16| {
        bytes[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    };
    let put_f32 = |bytes: &mut Vec<u8>, offset: usize, value: f32| {
        bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
    };

    bytes[0..4].copy_from_slice(&(NIFTI_HEADER_SIZE as i32).to_le_bytes());

    let shape = data.shape();
    put_i16(&mut bytes, 40, shape.len() as i16);
    for axis in 0..7 {
        let length = shape.get(axis).copied().unwrap_or(1);
        put_i16(&mut bytes, 42 + axis * 2, length as i16);
    }
    put_i16(&mut bytes, 70, NIFTI_FLOAT32);
    put_i16(&mut bytes, 72, 32);

    put_f32(&mut bytes, 76, 1.0);
    for axis in 1..8 {
        put_f32(&mut bytes, 76 + axis * 4, if axis <= 3 { 2.0 } else { 1.0 });
    }
    put_f32(&mut bytes, 108, NIFTI_VOX_OFFSET as f32);
    put_f32(&mut bytes, 112, 1.0);
    bytes[344..348].copy_from_slice(b"n+1\0");

    // Voxels are stored with the first axis varying fastest.
    for value in data.t().iter() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

pub fn write_nifti(dir: &Path, name: &str, data: &ArrayD<f32>) -> PathBuf {
    let path = dir.join(name);
    let bytes = nifti_bytes(data);
    if name.ends_with(".gz") {
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(&bytes).unwrap();
        encoder.finish().unwrap();
    } else {
        std::fs::write(&path, bytes).unwrap();
    }
    path
}

/// 4-D functional volume whose voxel values encode their position.
pub fn func_volume(spatial: [usize; 3], timepoints: usize) -> ArrayD<f32> {
    let [x, y, z] = spatial;
    ArrayD::from_shape_fn(IxDyn(&[x, y, z, timepoints]), |index| {
        (index[0] + 10 * index[1] + 100 * index[2]) as f32 + 1000.0 * index[3] as f32
    })
}

/// 3-D volume filled with `value`.
pub fn filled_volume(spatial: [usize; 3], value: f32) -> ArrayD<f32> {
    ArrayD::from_elem(IxDyn(&spatial), value)
}

/// Binary mask selecting voxels with `x < split`.
pub fn half_mask(spatial: [usize; 3], split: usize) -> ArrayD<f32> {
    ArrayD::from_shape_fn(IxDyn(&spatial), |index| if index[0] < split { 1.0 } else { 0.0 })
}

fn gifti_document(arrays: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE GIFTI SYSTEM "http://www.nitrc.org/frs/download.php/115/gifti.dtd">
<GIFTI Version="1.0" NumberOfDataArrays="{}">
<MetaData/>
<LabelTable/>
{}
</GIFTI>
"#,
        arrays.len(),
        arrays.join("\n")
    )
}

/// Functional GIfTI with one ASCII-encoded 1-D array per frame.
pub fn write_func_gifti(dir: &Path, name: &str, frames: &[Vec<f32>]) -> PathBuf {
    let arrays: Vec<String> = frames
        .iter()
        .map(|frame| {
            let values: Vec<String> = frame.iter().map(f32::to_string).collect();
            format!(
                r#"<DataArray Intent="NIFTI_INTENT_TIME_SERIES" DataType="NIFTI_TYPE_FLOAT32" ArrayIndexingOrder="RowMajorOrder" Dimensionality="1" Dim0="{}" Encoding="ASCII" Endian="LittleEndian" ExternalFileName="" ExternalFileOffset="">
<MetaData/>
<Data>{}</Data>
</DataArray>"#,
                frame.len(),
                values.join(" ")
            )
        })
        .collect();
    let path = dir.join(name);
    std::fs::write(&path, gifti_document(&arrays)).unwrap();
    path
}

/// Frames with `vertices` values each.
pub fn surface_frames(frames: usize, vertices: usize) -> Vec<Vec<f32>> {
    (0..frames)
        .map(|t| (0..vertices).map(|v| (t * vertices + v) as f32 * 0.5).collect())
        .collect()
}

/// Mesh GIfTI: a triangle fan over `vertices` points.
///
/// Coordinates are compressed base64 float32; faces are base64 int32.
pub fn write_mesh_gifti(dir: &Path, name: &str, vertices: usize) -> PathBuf {
    let coords: Vec<u8> = (0..vertices)
        .flat_map(|i| [i as f32, (i * 2) as f32, 1.0])
        .flat_map(f32::to_le_bytes)
        .collect();
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&coords).unwrap();
    let coords = encoder.finish().unwrap();

    let face_count = vertices.saturating_sub(2);
    let faces: Vec<u8> = (0..face_count)
        .flat_map(|i| [0i32, (i + 1) as i32, (i + 2) as i32])
        .flat_map(i32::to_le_bytes)
        .collect();

    let arrays = vec![
        format!(
            r#"<DataArray Intent="NIFTI_INTENT_POINTSET" DataType="NIFTI_TYPE_FLOAT32" ArrayIndexingOrder="RowMajorOrder" Dimensionality="2" Dim0="{vertices}" Dim1="3" Encoding="GZipBase64Binary" Endian="LittleEndian" ExternalFileName="" ExternalFileOffset="">
<MetaData/>
<Data>{}</Data>
</DataArray>"#,
            STANDARD.encode(coords)
        ),
        format!(
            r#"<DataArray Intent="NIFTI_INTENT_TRIANGLE" DataType="NIFTI_TYPE_INT32" ArrayIndexingOrder="RowMajorOrder" Dimensionality="2" Dim0="{face_count}" Dim1="3" Encoding="Base64Binary" Endian="LittleEndian" ExternalFileName="" ExternalFileOffset="">
<MetaData/>
<Data>{}</Data>
</DataArray>"#,
            STANDARD.encode(faces)
        ),
    ];
    let path = dir.join(name);
    std::fs::write(&path, gifti_document(&arrays)).unwrap();
    path
}

pub fn write_text(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// One value per line.
pub fn series_text(length: usize) -> String {
    (0..length).map(|i| format!("{}\n", i as f64 * 0.25)).collect()
}

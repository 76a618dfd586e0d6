//! GIfTI XML loading.
//!
//! Supports inline data arrays in `ASCII`, `Base64Binary` and
//! `GZipBase64Binary` encodings. External binary files are rejected.

use std::io::Read;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::{GzDecoder, ZlibDecoder};
use fviz_model::{GiftiDataArray, GiftiImage};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{IngestError, Result};

const DEFAULT_INTENT: &str = "NIFTI_INTENT_NONE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataType {
    Uint8,
    Int8,
    Int16,
    Int32,
    Float32,
    Float64,
}

impl DataType {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "NIFTI_TYPE_UINT8" => Some(Self::Uint8),
            "NIFTI_TYPE_INT8" => Some(Self::Int8),
            "NIFTI_TYPE_INT16" => Some(Self::Int16),
            "NIFTI_TYPE_INT32" => Some(Self::Int32),
            "NIFTI_TYPE_FLOAT32" => Some(Self::Float32),
            "NIFTI_TYPE_FLOAT64" => Some(Self::Float64),
            _ => None,
        }
    }

    fn width(self) -> usize {
        match self {
            Self::Uint8 | Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Int32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    fn decode(self, bytes: &[u8], big_endian: bool) -> f64 {
        macro_rules! read {
            ($ty:ty, $n:literal) => {{
                let mut buf = [0u8; $n];
                buf.copy_from_slice(bytes);
                if big_endian {
                    <$ty>::from_be_bytes(buf) as f64
                } else {
                    <$ty>::from_le_bytes(buf) as f64
                }
            }};
        }
        match self {
            Self::Uint8 => f64::from(bytes[0]),
            Self::Int8 => f64::from(bytes[0] as i8),
            Self::Int16 => read!(i16, 2),
            Self::Int32 => read!(i32, 4),
            Self::Float32 => read!(f32, 4),
            Self::Float64 => read!(f64, 8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Ascii,
    Base64,
    GzipBase64,
}

/// Attributes of a `<DataArray>` element.
#[derive(Debug)]
struct ArrayHeader {
    intent: String,
    data_type: DataType,
    encoding: Encoding,
    big_endian: bool,
    column_major: bool,
    dims: Vec<usize>,
}

/// Read a GIfTI file from disk.
pub fn read_gifti(path: &Path) -> Result<GiftiImage> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let image = parse_gifti(&text).map_err(|message| IngestError::GiftiParse {
        path: path.to_path_buf(),
        message,
    })?;
    tracing::debug!(
        path = %path.display(),
        arrays = image.darrays.len(),
        "loaded GIfTI image"
    );
    Ok(image)
}

/// Parse a GIfTI document held in memory.
pub fn parse_gifti(text: &str) -> std::result::Result<GiftiImage, String> {
    let mut reader = Reader::from_str(text);
    let mut seen_root = false;
    let mut darrays = Vec::new();
    let mut header: Option<ArrayHeader> = None;
    let mut payload: Option<String> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"GIFTI" => seen_root = true,
                b"DataArray" => header = Some(parse_header(&e)?),
                b"Data" if header.is_some() => payload = Some(String::new()),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"GIFTI" => seen_root = true,
                b"DataArray" => {
                    let empty = parse_header(&e)?;
                    darrays.push(decode_array(&empty, "")?);
                }
                b"Data" => {
                    if let Some(current) = header.as_ref() {
                        darrays.push(decode_array(current, "")?);
                        header = None;
                    }
                }
                _ => {}
            },
            Event::Text(t) => {
                if let Some(buf) = payload.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::CData(t) => {
                if let Some(buf) = payload.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"Data" => {
                    if let (Some(current), Some(buf)) = (header.as_ref(), payload.take()) {
                        darrays.push(decode_array(current, &buf)?);
                        header = None;
                    }
                }
                b"DataArray" => header = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err("missing <GIFTI> root element".to_string());
    }
    Ok(GiftiImage::new(darrays))
}

fn parse_header(element: &BytesStart<'_>) -> std::result::Result<ArrayHeader, String> {
    let mut intent = DEFAULT_INTENT.to_string();
    let mut data_type = None;
    let mut encoding = Encoding::Ascii;
    let mut big_endian = false;
    let mut column_major = false;
    let mut dimensionality = None;
    let mut dim_values: Vec<(usize, usize)> = Vec::new();

    for attribute in element.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attribute.value).trim().to_string();

        match key.as_str() {
            "Intent" => intent = value,
            "DataType" => {
                data_type = Some(
                    DataType::parse(&value)
                        .ok_or_else(|| format!("unsupported DataType '{value}'"))?,
                );
            }
            "Encoding" => {
                encoding = match value.as_str() {
                    "ASCII" => Encoding::Ascii,
                    "Base64Binary" => Encoding::Base64,
                    "GZipBase64Binary" => Encoding::GzipBase64,
                    "ExternalFileBinary" => {
                        return Err("external binary data arrays are not supported".to_string());
                    }
                    other => return Err(format!("unknown Encoding '{other}'")),
                };
            }
            "Endian" => big_endian = value == "BigEndian",
            "ArrayIndexingOrder" => column_major = value == "ColumnMajorOrder",
            "Dimensionality" => {
                dimensionality = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid Dimensionality '{value}'"))?,
                );
            }
            _ => {
                if let Some(index) = key.strip_prefix("Dim").and_then(|i| i.parse().ok()) {
                    let length = value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid {key} '{value}'"))?;
                    dim_values.push((index, length));
                }
            }
        }
    }

    let data_type = data_type.ok_or("DataArray is missing DataType")?;
    let dimensionality = dimensionality.ok_or("DataArray is missing Dimensionality")?;
    let mut dims = vec![None; dimensionality];
    for (index, length) in dim_values {
        if let Some(slot) = dims.get_mut(index) {
            *slot = Some(length);
        }
    }
    let dims = dims
        .into_iter()
        .enumerate()
        .map(|(i, d)| d.ok_or_else(|| format!("DataArray is missing Dim{i}")))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(ArrayHeader {
        intent,
        data_type,
        encoding,
        big_endian,
        column_major,
        dims,
    })
}

fn decode_array(
    header: &ArrayHeader,
    payload: &str,
) -> std::result::Result<GiftiDataArray, String> {
    let expected: usize = header.dims.iter().product();
    let values = match header.encoding {
        Encoding::Ascii => payload
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| format!("invalid ASCII value '{token}'"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?,
        Encoding::Base64 => decode_binary(header, &decode_base64(payload)?)?,
        Encoding::GzipBase64 => decode_binary(header, &inflate(&decode_base64(payload)?)?)?,
    };

    if values.len() != expected {
        return Err(format!(
            "DataArray declares {expected} values but contains {}",
            values.len()
        ));
    }

    let data = if header.column_major && header.dims.len() > 1 {
        to_row_major(&values, &header.dims)
    } else {
        values
    };

    Ok(GiftiDataArray::new(header.intent.clone(), header.dims.clone(), data))
}

fn decode_base64(payload: &str) -> std::result::Result<Vec<u8>, String> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| format!("invalid base64 data: {e}"))
}

/// Decompress zlib data; gzip-wrapped payloads are accepted too.
fn inflate(bytes: &[u8]) -> std::result::Result<Vec<u8>, String> {
    let mut out = Vec::new();
    let result = if bytes.starts_with(&[0x1f, 0x8b]) {
        GzDecoder::new(bytes).read_to_end(&mut out)
    } else {
        ZlibDecoder::new(bytes).read_to_end(&mut out)
    };
    result.map_err(|e| format!("invalid compressed data: {e}"))?;
    Ok(out)
}

fn decode_binary(header: &ArrayHeader, bytes: &[u8]) -> std::result::Result<Vec<f64>, String> {
    let width = header.data_type.width();
    if bytes.len() % width != 0 {
        return Err(format!(
            "binary payload of {} bytes is not a multiple of the element size {width}",
            bytes.len()
        ));
    }
    Ok(bytes
        .chunks_exact(width)
        .map(|chunk| header.data_type.decode(chunk, header.big_endian))
        .collect())
}

/// Reorder column-major values into row-major order.
fn to_row_major(values: &[f64], dims: &[usize]) -> Vec<f64> {
    let mut out = vec![0.0; values.len()];
    let mut index = vec![0usize; dims.len()];
    for (row_major_pos, slot) in out.iter_mut().enumerate() {
        // Unravel the row-major position into a multi-index.
        let mut rest = row_major_pos;
        for axis in (0..dims.len()).rev() {
            index[axis] = rest % dims[axis];
            rest /= dims[axis];
        }
        // Ravel the same multi-index in column-major order.
        let mut column_major_pos = 0;
        for axis in (0..dims.len()).rev() {
            column_major_pos = column_major_pos * dims[axis] + index[axis];
        }
        *slot = values[column_major_pos];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(arrays: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE GIFTI SYSTEM "http://www.nitrc.org/frs/download.php/115/gifti.dtd">
<GIFTI Version="1.0" NumberOfDataArrays="1">
  <MetaData/>
  <LabelTable/>
{arrays}
</GIFTI>"#
        )
    }

    #[test]
    fn test_ascii_array() {
        let xml = document(
            r#"<DataArray Intent="NIFTI_INTENT_NONE" DataType="NIFTI_TYPE_FLOAT32"
                ArrayIndexingOrder="RowMajorOrder" Dimensionality="1" Dim0="3"
                Encoding="ASCII" Endian="LittleEndian" ExternalFileName="" ExternalFileOffset="">
              <MetaData/>
              <Data>1.5 -2 3e1</Data>
            </DataArray>"#,
        );
        let image = parse_gifti(&xml).unwrap();
        assert_eq!(image.darrays.len(), 1);
        assert_eq!(image.darrays[0].dims, vec![3]);
        assert_eq!(image.darrays[0].data, vec![1.5, -2.0, 30.0]);
    }

    #[test]
    fn test_base64_int32_column_major() {
        let values: [i32; 6] = [0, 3, 1, 4, 2, 5];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let xml = document(&format!(
            r#"<DataArray Intent="NIFTI_INTENT_TRIANGLE" DataType="NIFTI_TYPE_INT32"
                ArrayIndexingOrder="ColumnMajorOrder" Dimensionality="2" Dim0="2" Dim1="3"
                Encoding="Base64Binary" Endian="LittleEndian">
              <Data>{}</Data>
            </DataArray>"#,
            STANDARD.encode(bytes)
        ));
        let image = parse_gifti(&xml).unwrap();
        assert_eq!(image.darrays[0].data, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_big_endian_float64() {
        let bytes: Vec<u8> = [0.25f64, 8.0].iter().flat_map(|v| v.to_be_bytes()).collect();
        let xml = document(&format!(
            r#"<DataArray DataType="NIFTI_TYPE_FLOAT64" Dimensionality="1" Dim0="2"
                Encoding="Base64Binary" Endian="BigEndian"><Data>{}</Data></DataArray>"#,
            STANDARD.encode(bytes)
        ));
        let image = parse_gifti(&xml).unwrap();
        assert_eq!(image.darrays[0].data, vec![0.25, 8.0]);
        assert_eq!(image.darrays[0].intent, DEFAULT_INTENT);
    }

    #[test]
    fn test_rejects_external_file() {
        let xml = document(
            r#"<DataArray DataType="NIFTI_TYPE_FLOAT32" Dimensionality="1" Dim0="2"
                Encoding="ExternalFileBinary" ExternalFileName="data.bin"><Data/></DataArray>"#,
        );
        let err = parse_gifti(&xml).unwrap_err();
        assert!(err.contains("external"));
    }

    #[test]
    fn test_rejects_count_mismatch() {
        let xml = document(
            r#"<DataArray DataType="NIFTI_TYPE_FLOAT32" Dimensionality="1" Dim0="4"
                Encoding="ASCII"><Data>1 2 3</Data></DataArray>"#,
        );
        let err = parse_gifti(&xml).unwrap_err();
        assert!(err.contains("declares 4 values"));
    }

    #[test]
    fn test_rejects_non_gifti_document() {
        assert!(parse_gifti("<html><body/></html>").is_err());
    }

    #[test]
    fn test_to_row_major_2d() {
        // Column-major 2x3: columns are (1,4), (2,5), (3,6).
        let values = [1.0, 4.0, 2.0, 5.0, 3.0, 6.0];
        assert_eq!(to_row_major(&values, &[2, 3]), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}

//! GIfTI containers and the surface types derived from them.
//!
//! A [`GiftiImage`] is the raw decoded file: a list of data arrays with their
//! intent and shape. Validation runs against this form; once it passes, the
//! image is converted into a [`SurfaceFunc`] (one 1-D frame per timepoint) or a
//! [`SurfaceMesh`] (vertex coordinates + triangle topology).

/// Intent code for vertex coordinate arrays.
pub const INTENT_POINTSET: &str = "NIFTI_INTENT_POINTSET";

/// Intent code for triangle topology arrays.
pub const INTENT_TRIANGLE: &str = "NIFTI_INTENT_TRIANGLE";

/// A single decoded GIfTI data array.
///
/// Values are stored row-major regardless of the on-disk indexing order.
#[derive(Debug, Clone, PartialEq)]
pub struct GiftiDataArray {
    /// NIfTI intent code (e.g., `NIFTI_INTENT_POINTSET`).
    pub intent: String,
    /// Axis lengths (`Dim0`, `Dim1`, ...).
    pub dims: Vec<usize>,
    /// Decoded values.
    pub data: Vec<f64>,
}

impl GiftiDataArray {
    pub fn new(intent: impl Into<String>, dims: Vec<usize>, data: Vec<f64>) -> Self {
        Self {
            intent: intent.into(),
            dims,
            data,
        }
    }

    /// Convenience constructor for a 1-D array.
    pub fn vector(data: Vec<f64>) -> Self {
        Self::new("NIFTI_INTENT_NONE", vec![data.len()], data)
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn is_intent(&self, intent: &str) -> bool {
        self.intent == intent
    }

    /// Rows of a 2-D array with three columns.
    fn triples(&self) -> Option<impl Iterator<Item = &[f64]>> {
        match self.dims.as_slice() {
            [rows, 3] if self.data.len() == rows * 3 => Some(self.data.chunks_exact(3)),
            _ => None,
        }
    }
}

/// A decoded GIfTI file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GiftiImage {
    pub darrays: Vec<GiftiDataArray>,
}

impl GiftiImage {
    pub fn new(darrays: Vec<GiftiDataArray>) -> Self {
        Self { darrays }
    }
}

/// Functional surface data: one value per vertex for each timepoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceFunc {
    frames: Vec<Vec<f32>>,
}

impl SurfaceFunc {
    pub fn new(frames: Vec<Vec<f32>>) -> Self {
        Self { frames }
    }

    /// Build from a GIfTI image whose data arrays are all 1-D.
    pub fn from_gifti(image: &GiftiImage) -> Option<Self> {
        if image.darrays.is_empty() || image.darrays.iter().any(|d| d.ndim() != 1) {
            return None;
        }
        let frames = image
            .darrays
            .iter()
            .map(|d| d.data.iter().map(|&v| v as f32).collect())
            .collect();
        Some(Self { frames })
    }

    pub fn frames(&self) -> &[Vec<f32>] {
        &self.frames
    }

    pub fn timepoints(&self) -> usize {
        self.frames.len()
    }

    /// Vertex count of the first frame (0 when there are no frames).
    pub fn vertex_count(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }
}

/// Surface mesh geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    vertices: Vec<[f32; 3]>,
    faces: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Build from a two-array GIfTI image.
    ///
    /// The coordinate and topology arrays are picked by intent when present,
    /// otherwise by position (coordinates first). Returns `None` when the
    /// arrays are not N×3 or a face references a missing vertex.
    pub fn from_gifti(image: &GiftiImage) -> Option<Self> {
        let [first, second] = image.darrays.as_slice() else {
            return None;
        };
        let swapped = first.is_intent(INTENT_TRIANGLE) || second.is_intent(INTENT_POINTSET);
        let (coords, topology) = if swapped {
            (second, first)
        } else {
            (first, second)
        };

        let vertices: Vec<[f32; 3]> = coords
            .triples()?
            .map(|row| [row[0] as f32, row[1] as f32, row[2] as f32])
            .collect();

        let mut faces = Vec::new();
        for row in topology.triples()? {
            let mut face = [0u32; 3];
            for (slot, &value) in face.iter_mut().zip(row) {
                if value < 0.0 || value.fract() != 0.0 || value as usize >= vertices.len() {
                    return None;
                }
                *slot = value as u32;
            }
            faces.push(face);
        }

        Some(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

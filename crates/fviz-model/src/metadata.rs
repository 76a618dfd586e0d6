//! Viewer metadata projection.
//!
//! [`ViewerMetadata`] is everything the presentation layer and the state cache
//! need to know about a session without touching voxel or vertex arrays:
//! dimensions, value ranges for color scaling, auxiliary labels, and task
//! regressors. Its size depends on the number of timepoints and conditions,
//! never on the size of the imaging files.

use serde::{Deserialize, Serialize};

use crate::auxiliary::ConditionRegressor;
use crate::modality::Modality;

/// Closed value interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range over the finite `values`; NaN and ±inf are skipped. `None` when
    /// nothing is left.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        values
            .into_iter()
            .map(Into::into)
            .filter(|v: &f64| v.is_finite())
            .fold(None, |acc: Option<Self>, v| match acc {
                None => Some(Self::new(v, v)),
                Some(range) => Some(Self::new(range.min.min(v), range.max.max(v))),
            })
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Union over a sequence of ranges.
    pub fn union_all<I: IntoIterator<Item = Self>>(ranges: I) -> Option<Self> {
        ranges.into_iter().reduce(Self::union)
    }
}

/// Mesh size of one hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HemisphereInfo {
    pub vertices: usize,
    pub faces: usize,
}

/// Spatial layout of the active data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dimensions {
    Volumetric {
        x: usize,
        y: usize,
        z: usize,
    },
    Surface {
        left: Option<HemisphereInfo>,
        right: Option<HemisphereInfo>,
    },
}

/// Summary of one attached time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesSummary {
    pub label: String,
    pub length: usize,
    pub range: Option<ValueRange>,
}

/// Task design timing and regressors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub tr: f64,
    pub slicetime_ref: f64,
    pub frame_times: Vec<f64>,
    pub conditions: Vec<ConditionRegressor>,
}

impl TaskSummary {
    pub fn condition_labels(&self) -> Vec<&str> {
        self.conditions.iter().map(|c| c.label.as_str()).collect()
    }
}

/// Read-only projection of a viewer session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerMetadata {
    pub modality: Modality,
    /// Number of volumes or frames.
    pub timepoints: usize,
    pub dimensions: Dimensions,
    /// Range over every timepoint (in-mask voxels only when a mask is present).
    pub global_range: Option<ValueRange>,
    /// One range per volume or frame.
    pub frame_ranges: Vec<Option<ValueRange>>,
    #[serde(default)]
    pub anat_input: bool,
    #[serde(default)]
    pub mask_input: bool,
    #[serde(default)]
    pub left_input: bool,
    #[serde(default)]
    pub right_input: bool,
    #[serde(default)]
    pub time_series: Vec<TimeSeriesSummary>,
    #[serde(default)]
    pub task: Option<TaskSummary>,
}

impl ViewerMetadata {
    pub fn time_series_labels(&self) -> Vec<&str> {
        self.time_series.iter().map(|t| t.label.as_str()).collect()
    }

    pub fn condition_labels(&self) -> Vec<&str> {
        self.task
            .as_ref()
            .map(TaskSummary::condition_labels)
            .unwrap_or_default()
    }

    /// Spatial dims for volumetric sessions.
    pub fn spatial_dims(&self) -> Option<[usize; 3]> {
        match self.dimensions {
            Dimensions::Volumetric { x, y, z } => Some([x, y, z]),
            Dimensions::Surface { .. } => None,
        }
    }
}

//! Snapshot envelope stored in each cache file.

use chrono::{DateTime, Utc};
use fviz_model::{ValueRange, ViewerMetadata};
use serde::{Deserialize, Serialize};

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A cached viewer metadata projection.
///
/// Only the metadata is stored, never voxel or vertex arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub schema_version: u32,
    pub key: String,
    pub saved_at: DateTime<Utc>,
    pub metadata: ViewerMetadata,
}

impl CacheSnapshot {
    pub fn new(key: impl Into<String>, metadata: ViewerMetadata) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            key: key.into(),
            saved_at: Utc::now(),
            metadata,
        }
    }
}

/// Version probe read before the full envelope.
#[derive(Deserialize)]
pub(crate) struct SchemaProbe {
    pub schema_version: u32,
}

/// Name of the first metadata field holding NaN or ±inf, if any.
///
/// JSON has no encoding for non-finite numbers, so such a snapshot could be
/// written but never read back.
pub(crate) fn first_non_finite(metadata: &ViewerMetadata) -> Option<&'static str> {
    let range_ok = |range: &ValueRange| range.min.is_finite() && range.max.is_finite();
    let all_finite = |values: &[f64]| values.iter().all(|v| v.is_finite());

    if !metadata.global_range.as_ref().is_none_or(range_ok) {
        return Some("global_range");
    }
    if !metadata.frame_ranges.iter().flatten().all(range_ok) {
        return Some("frame_ranges");
    }
    if !metadata
        .time_series
        .iter()
        .all(|series| series.range.as_ref().is_none_or(range_ok))
    {
        return Some("time_series");
    }
    if let Some(task) = &metadata.task {
        if !(task.tr.is_finite() && task.slicetime_ref.is_finite()) {
            return Some("task timing");
        }
        if !all_finite(&task.frame_times) {
            return Some("frame_times");
        }
        if !task
            .conditions
            .iter()
            .all(|condition| all_finite(&condition.block) && all_finite(&condition.hrf))
        {
            return Some("task regressors");
        }
    }
    None
}

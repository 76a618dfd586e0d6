//! Auxiliary data attached to a viewer session: time series and task design.

use serde::{Deserialize, Serialize};

/// Condition name used when a task design has no `trial_type` column.
pub const IMPLICIT_CONDITION: &str = "task";

/// One labelled time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    pub label: String,
    pub values: Vec<f64>,
}

/// Ordered label → series mapping.
///
/// Labels are unique; iteration follows insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    entries: Vec<TimeSeriesEntry>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series.
    ///
    /// An existing label keeps its position and has its values replaced; the
    /// previous values are returned.
    pub fn insert(&mut self, label: impl Into<String>, values: Vec<f64>) -> Option<Vec<f64>> {
        let label = label.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.label == label) {
            return Some(std::mem::replace(&mut entry.values, values));
        }
        self.entries.push(TimeSeriesEntry { label, values });
        None
    }

    /// Insert every series of `other`, in its order.
    pub fn merge(&mut self, other: TimeSeries) {
        for entry in other.entries {
            self.insert(entry.label, entry.values);
        }
    }

    pub fn get(&self, label: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.values.as_slice())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSeriesEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Vec<f64>)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (String, Vec<f64>)>>(iter: I) -> Self {
        let mut series = Self::new();
        for (label, values) in iter {
            series.insert(label, values);
        }
        series
    }
}

/// A single task event row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEvent {
    /// Onset in seconds (non-negative).
    pub onset: f64,
    /// Duration in seconds (non-negative).
    pub duration: f64,
    /// Value of the `trial_type` column, if the column exists.
    pub trial_type: Option<String>,
}

impl TaskEvent {
    /// Condition this event belongs to.
    pub fn condition(&self) -> &str {
        self.trial_type.as_deref().unwrap_or(IMPLICIT_CONDITION)
    }
}

/// Parsed task design table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDesign {
    pub events: Vec<TaskEvent>,
}

impl TaskDesign {
    pub fn new(events: Vec<TaskEvent>) -> Self {
        Self { events }
    }

    /// Distinct conditions in order of first appearance.
    pub fn conditions(&self) -> Vec<String> {
        let mut conditions: Vec<String> = Vec::new();
        for event in &self.events {
            let condition = event.condition();
            if !conditions.iter().any(|c| c == condition) {
                conditions.push(condition.to_string());
            }
        }
        conditions
    }

    /// Events belonging to `condition`.
    pub fn events_for<'a>(&'a self, condition: &'a str) -> impl Iterator<Item = &'a TaskEvent> {
        self.events.iter().filter(move |e| e.condition() == condition)
    }
}

/// Block and hemodynamic regressors for one condition, sampled at frame times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionRegressor {
    pub label: String,
    pub block: Vec<f64>,
    pub hrf: Vec<f64>,
}

/// Frame-aligned task regressors for every condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRegressors {
    /// Repetition time in seconds.
    pub tr: f64,
    /// Slice-time reference as a fraction of TR.
    pub slicetime_ref: f64,
    /// `tr * (i + slicetime_ref)` for each frame.
    pub frame_times: Vec<f64>,
    pub conditions: Vec<ConditionRegressor>,
}

impl TaskRegressors {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.conditions.iter().map(|c| c.label.as_str())
    }

    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }
}

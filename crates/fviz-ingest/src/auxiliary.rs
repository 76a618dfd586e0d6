//! Time series and task design loading, plus task regressor construction.

use std::path::Path;

use fviz_model::{ConditionRegressor, FileRole, TaskDesign, TaskEvent, TaskRegressors};
use fviz_signal::{ConditionEvents, HrfModel, compute_regressor};
use fviz_validate::{
    REQUIRED_TASK_COLUMNS, Rule, validate_task_event_timing, validate_task_ext,
    validate_task_header_duplicates, validate_task_header_required_cols,
    validate_task_slicetime, validate_task_tr, validate_ts_ext, validate_ts_fmri_length,
    validate_ts_numeric, validate_ts_single_col, validate_ts_task_length,
};
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::readers::{Delimiter, check_file_size, read_rows, validate_encoding};
use crate::request::{IngestOptions, TaskDesignInput, TimeSeriesInput, file_name};

/// Frame acquisition times: `tr * (i + slicetime_ref)` for each frame.
pub fn frame_times(tr: f64, slicetime_ref: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| tr * (i as f64 + slicetime_ref)).collect()
}

fn read_table(path: &Path, options: &IngestOptions) -> Result<Vec<Vec<String>>> {
    check_file_size(path, options.max_table_file_size)?;
    validate_encoding(path)?;
    read_rows(path, Delimiter::from_extension(path))
}

/// Load one single-column numeric series and check it against the
/// functional temporal length.
pub fn load_time_series(
    input: &TimeSeriesInput,
    temporal_length: usize,
    options: &IngestOptions,
) -> Result<Vec<f64>> {
    let path = input.path.as_path();
    let name = file_name(path);
    if !validate_ts_ext(&name) {
        return Err(IngestError::validation(
            FileRole::TimeSeries,
            Rule::TimeSeriesExtension,
            name,
        ));
    }

    let mut rows = read_table(path, options)?;
    if input.has_header && !rows.is_empty() {
        rows.remove(0);
    }
    if !validate_ts_task_length(&rows) {
        return Err(IngestError::validation(
            FileRole::TimeSeries,
            Rule::TableNotEmpty,
            name,
        ));
    }

    let mut values = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if !validate_ts_single_col(row) {
            return Err(IngestError::validation(
                FileRole::TimeSeries,
                Rule::TimeSeriesSingleColumn,
                format!("{name} row {}: {} fields", index + 1, row.len()),
            ));
        }
        let cell = row.first().map(String::as_str).unwrap_or_default();
        let value = cell
            .parse::<f64>()
            .ok()
            .filter(|_| validate_ts_numeric(cell))
            .ok_or_else(|| {
                IngestError::validation(
                    FileRole::TimeSeries,
                    Rule::TimeSeriesNumeric,
                    format!("{name} row {}: '{cell}'", index + 1),
                )
            })?;
        values.push(value);
    }

    if !validate_ts_fmri_length(temporal_length, &values) {
        return Err(IngestError::LengthMismatch {
            path: path.to_path_buf(),
            expected: temporal_length,
            found: values.len(),
        });
    }

    debug!(
        path = %path.display(),
        label = %input.effective_label(),
        length = values.len(),
        "loaded time series"
    );
    Ok(values)
}

/// Parse a task design table (`.csv` or `.tsv`) into events.
///
/// The first row is always the header; column names are matched
/// case-insensitively and columns other than onset, duration and
/// trial_type are ignored.
pub fn load_task_design(input: &TaskDesignInput, options: &IngestOptions) -> Result<TaskDesign> {
    let path = input.path.as_path();
    let name = file_name(path);
    if !validate_task_ext(&name) {
        return Err(IngestError::validation(
            FileRole::TaskDesign,
            Rule::TaskExtension,
            name,
        ));
    }
    if !validate_task_tr(input.tr) {
        return Err(IngestError::validation(
            FileRole::TaskDesign,
            Rule::TaskTr,
            input.tr.to_string(),
        ));
    }
    if !validate_task_slicetime(input.slicetime_ref) {
        return Err(IngestError::validation(
            FileRole::TaskDesign,
            Rule::TaskSlicetime,
            input.slicetime_ref.to_string(),
        ));
    }

    let rows = read_table(path, options)?;
    let Some((header, records)) = rows.split_first() else {
        return Err(IngestError::validation(
            FileRole::TaskDesign,
            Rule::TableNotEmpty,
            name,
        ));
    };
    if !validate_task_header_required_cols(header, REQUIRED_TASK_COLUMNS) {
        return Err(IngestError::validation(
            FileRole::TaskDesign,
            Rule::TaskRequiredColumns,
            header.join(","),
        ));
    }
    if !validate_task_header_duplicates(header, REQUIRED_TASK_COLUMNS) {
        return Err(IngestError::validation(
            FileRole::TaskDesign,
            Rule::TaskDuplicateColumns,
            header.join(","),
        ));
    }
    if !validate_ts_task_length(records) {
        return Err(IngestError::validation(
            FileRole::TaskDesign,
            Rule::TableNotEmpty,
            name,
        ));
    }

    let column = |wanted: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };
    // Both required columns were checked above.
    let onset_idx = column("onset").unwrap_or_default();
    let duration_idx = column("duration").unwrap_or_default();
    let trial_type_idx = column("trial_type");

    let mut events = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let row_number = index + 2;
        let timing = |idx: usize, field: &str| -> Result<f64> {
            let cell = record.get(idx).map(String::as_str).unwrap_or_default();
            if !validate_task_event_timing(cell) {
                return Err(IngestError::validation(
                    FileRole::TaskDesign,
                    Rule::TaskEventTiming,
                    format!("{name} row {row_number} {field}: '{cell}'"),
                ));
            }
            cell.parse::<f64>().map_err(|e| IngestError::TableParse {
                path: path.to_path_buf(),
                message: format!("row {row_number} {field}: {e}"),
            })
        };
        let onset = timing(onset_idx, "onset")?;
        let duration = timing(duration_idx, "duration")?;
        let trial_type = trial_type_idx.map(|idx| record.get(idx).cloned().unwrap_or_default());
        events.push(TaskEvent {
            onset,
            duration,
            trial_type,
        });
    }

    let design = TaskDesign::new(events);
    debug!(
        path = %path.display(),
        events = design.events.len(),
        conditions = design.conditions().len(),
        "loaded task design"
    );
    Ok(design)
}

/// Block and HRF regressors per condition, sampled at
/// `tr * (i + slicetime_ref)` for `temporal_length` frames.
pub fn build_task_regressors(
    design: &TaskDesign,
    tr: f64,
    slicetime_ref: f64,
    temporal_length: usize,
) -> Result<TaskRegressors> {
    let frame_times = frame_times(tr, slicetime_ref, temporal_length);

    let mut conditions = Vec::new();
    for label in design.conditions() {
        let events = design
            .events_for(&label)
            .fold(ConditionEvents::new(label.as_str()), |events, e| {
                events.with_event(e.onset, e.duration)
            });

        let compute = |model: HrfModel| {
            compute_regressor(&events, model, &frame_times)
                .map(|(values, _)| values)
                .map_err(|source| IngestError::Signal {
                    condition: label.clone(),
                    source,
                })
        };
        let block = compute(HrfModel::None)?;
        let hrf = compute(HrfModel::Glover)?;

        conditions.push(ConditionRegressor { label, block, hrf });
    }

    info!(
        tr,
        slicetime_ref,
        frames = frame_times.len(),
        conditions = conditions.len(),
        "computed task regressors"
    );

    Ok(TaskRegressors {
        tr,
        slicetime_ref,
        frame_times,
        conditions,
    })
}

//! Time series and task design table checks.

use std::sync::LazyLock;

use regex::Regex;

/// Columns every task design header must contain (case-insensitive).
pub const REQUIRED_TASK_COLUMNS: &[&str] = &["onset", "duration"];

/// Recognized optional task design columns.
pub const OPTIONAL_TASK_COLUMNS: &[&str] = &["trial_type"];

/// Signed decimal or scientific-notation real number.
static NUMERIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("Invalid numeric regex")
});

/// Every required column appears in the header, ignoring case.
pub fn validate_task_header_required_cols<S: AsRef<str>>(header: &[S], required: &[&str]) -> bool {
    required.iter().all(|column| {
        header
            .iter()
            .any(|h| h.as_ref().trim().eq_ignore_ascii_case(column))
    })
}

/// No required or optional column appears more than once, ignoring case.
pub fn validate_task_header_duplicates<S: AsRef<str>>(header: &[S], required: &[&str]) -> bool {
    required
        .iter()
        .chain(OPTIONAL_TASK_COLUMNS)
        .all(|column| {
            header
                .iter()
                .filter(|h| h.as_ref().trim().eq_ignore_ascii_case(column))
                .count()
                <= 1
        })
}

/// Repetition time is finite and strictly positive.
pub fn validate_task_tr(tr: f64) -> bool {
    tr.is_finite() && tr > 0.0
}

/// Slice-time reference lies in [0, 1].
pub fn validate_task_slicetime(slicetime_ref: f64) -> bool {
    (0.0..=1.0).contains(&slicetime_ref)
}

/// Onset or duration cell is a non-negative number.
pub fn validate_task_event_timing(value: &str) -> bool {
    let value = value.trim();
    validate_ts_numeric(value) && value.parse::<f64>().is_ok_and(|v| v >= 0.0)
}

/// Table has at least one row.
pub fn validate_ts_task_length<T>(rows: &[T]) -> bool {
    !rows.is_empty()
}

/// Row has at most one field.
pub fn validate_ts_single_col<S: AsRef<str>>(row: &[S]) -> bool {
    row.len() <= 1
}

/// Cell is a finite real number; signs and scientific notation are accepted.
///
/// Literals that overflow `f64` (`1e999`) are rejected.
pub fn validate_ts_numeric(value: &str) -> bool {
    let value = value.trim();
    NUMERIC_REGEX.is_match(value) && value.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Series length equals the functional temporal length.
pub fn validate_ts_fmri_length(fmri_len: usize, ts: &[f64]) -> bool {
    ts.len() == fmri_len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_rejects_special_values() {
        assert!(!validate_ts_numeric("NaN"));
        assert!(!validate_ts_numeric("inf"));
        assert!(!validate_ts_numeric("-"));
        assert!(!validate_ts_numeric("e5"));
    }

    #[test]
    fn test_numeric_rejects_overflow() {
        assert!(!validate_ts_numeric("1e999"));
        assert!(!validate_ts_numeric("-1e400"));
        assert!(validate_ts_numeric("1e308"));
        assert!(validate_ts_numeric("1e-400"));
    }

    #[test]
    fn test_tr_must_be_finite() {
        assert!(validate_task_tr(2.0));
        assert!(!validate_task_tr(0.0));
        assert!(!validate_task_tr(f64::INFINITY));
        assert!(!validate_task_tr(f64::NAN));
    }

    #[test]
    fn test_numeric_accepts_partial_decimals() {
        assert!(validate_ts_numeric(".5"));
        assert!(validate_ts_numeric("5."));
        assert!(validate_ts_numeric("+3"));
        assert!(validate_ts_numeric(" 2.5 "));
    }

    #[test]
    fn test_event_timing() {
        assert!(validate_task_event_timing("0"));
        assert!(validate_task_event_timing("12.5"));
        assert!(!validate_task_event_timing("-1"));
        assert!(!validate_task_event_timing("n/a"));
    }

    #[test]
    fn test_duplicates_case_insensitive() {
        assert!(!validate_task_header_duplicates(
            &["onset", "ONSET", "duration"],
            REQUIRED_TASK_COLUMNS
        ));
        assert!(!validate_task_header_duplicates(
            &["onset", "duration", "trial_type", "Trial_Type"],
            REQUIRED_TASK_COLUMNS
        ));
        assert!(validate_task_header_duplicates(
            &["onset", "duration", "response", "response"],
            REQUIRED_TASK_COLUMNS
        ));
    }
}

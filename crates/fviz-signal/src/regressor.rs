//! Event sampling, convolution and resampling to frame times.

use tracing::{debug, warn};

use crate::error::{Result, SignalError};
use crate::hrf::{HrfModel, linspace};

/// High-resolution samples per frame interval.
pub const OVERSAMPLING: usize = 50;

/// Earliest time (relative to the first frame) covered by the sampling grid.
pub const MIN_ONSET: f64 = -24.0;

/// Events of a single condition: parallel onsets, durations and amplitudes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionEvents {
    label: String,
    onsets: Vec<f64>,
    durations: Vec<f64>,
    amplitudes: Vec<f64>,
}

impl ConditionEvents {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Add an event.
    pub fn push(&mut self, onset: f64, duration: f64, amplitude: f64) {
        self.onsets.push(onset);
        self.durations.push(duration);
        self.amplitudes.push(amplitude);
    }

    /// Builder form of [`push`](Self::push) with unit amplitude.
    pub fn with_event(mut self, onset: f64, duration: f64) -> Self {
        self.push(onset, duration, 1.0);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn onsets(&self) -> &[f64] {
        &self.onsets
    }

    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }

    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }

    fn check_finite(&self) -> Result<()> {
        let fields = [
            ("onset", &self.onsets),
            ("duration", &self.durations),
            ("amplitude", &self.amplitudes),
        ];
        for (field, values) in fields {
            if let Some(index) = values.iter().position(|v| !v.is_finite()) {
                return Err(SignalError::NonFiniteEvent {
                    condition: self.label.clone(),
                    field,
                    index,
                });
            }
        }
        Ok(())
    }
}

/// Compute one regressor for `events` sampled at `frame_times`.
///
/// Events are laid out on a grid `OVERSAMPLING` times finer than the mean
/// frame interval, starting `MIN_ONSET` seconds before the first frame. The
/// boxcar is convolved with the model's kernel, truncated to the grid length
/// and linearly interpolated back onto the frame times.
///
/// Returns the regressor (one value per frame) and its column names.
pub fn compute_regressor(
    events: &ConditionEvents,
    hrf_model: HrfModel,
    frame_times: &[f64],
) -> Result<(Vec<f64>, Vec<String>)> {
    check_frame_times(frame_times)?;
    events.check_finite()?;

    let first = frame_times[0];
    let last = frame_times[frame_times.len() - 1];
    let tr = (last - first) / (frame_times.len() - 1) as f64;

    let (hr_regressor, hr_frame_times) = sample_condition(events, frame_times);
    let kernel = hrf_model.kernel(tr, OVERSAMPLING);
    let convolved = convolve_truncated(&hr_regressor, &kernel);
    let regressor = resample(&convolved, &hr_frame_times, frame_times);

    debug!(
        condition = events.label(),
        hrf = %hrf_model,
        events = events.len(),
        grid = hr_frame_times.len(),
        kernel = kernel.len(),
        "computed regressor"
    );

    Ok((regressor, vec![events.label().to_string()]))
}

fn check_frame_times(frame_times: &[f64]) -> Result<()> {
    if frame_times.len() < 2 {
        return Err(SignalError::TooFewFrames {
            found: frame_times.len(),
        });
    }
    if let Some(index) = frame_times.iter().position(|t| !t.is_finite()) {
        return Err(SignalError::UnorderedFrameTimes { index });
    }
    if let Some(index) = frame_times.windows(2).position(|w| w[1] <= w[0]) {
        return Err(SignalError::UnorderedFrameTimes { index: index + 1 });
    }
    Ok(())
}

/// Boxcar on the high-resolution grid, plus the grid itself.
fn sample_condition(events: &ConditionEvents, frame_times: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = frame_times.len() as f64;
    let first = frame_times[0];
    let last = frame_times[frame_times.len() - 1];
    let end = last * (1.0 + 1.0 / (n - 1.0));

    let n_hr = (n - 1.0) / (last - first) * (end - first - MIN_ONSET) * OVERSAMPLING as f64 + 1.0;
    let hr_frame_times = linspace(first + MIN_ONSET, end, n_hr.round_ties_even() as usize);
    let tmax = hr_frame_times.len();

    let mut regressor = vec![0.0; tmax];
    if tmax == 0 {
        return (regressor, hr_frame_times);
    }

    let window_start = first + MIN_ONSET;
    let early = events.onsets().iter().filter(|&&o| o < window_start).count();
    if early > 0 {
        warn!(
            condition = events.label(),
            events = early,
            window_start,
            "events start before the sampling window and will be clipped"
        );
    }

    let events_iter = events
        .onsets()
        .iter()
        .zip(events.durations())
        .zip(events.amplitudes());
    for ((&onset, &duration), &amplitude) in events_iter {
        let t_onset = search_sorted(&hr_frame_times, onset).min(tmax - 1);
        let mut t_offset = search_sorted(&hr_frame_times, onset + duration).min(tmax - 1);
        // Zero-length events still occupy one sample.
        if t_offset < tmax - 1 && t_offset == t_onset {
            t_offset += 1;
        }
        regressor[t_onset] += amplitude;
        regressor[t_offset] -= amplitude;
    }

    let mut running = 0.0;
    for value in &mut regressor {
        running += *value;
        *value = running;
    }

    (regressor, hr_frame_times)
}

/// Index of the first element `>= value` (left insertion point).
fn search_sorted(sorted: &[f64], value: f64) -> usize {
    sorted.partition_point(|&x| x < value)
}

/// Full convolution truncated to the signal length.
fn convolve_truncated(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    (0..signal.len())
        .map(|i| {
            kernel
                .iter()
                .take(i + 1)
                .enumerate()
                .map(|(k, h)| h * signal[i - k])
                .sum::<f64>()
        })
        .collect()
}

/// Linear interpolation of `(grid, values)` at `targets`.
fn resample(values: &[f64], grid: &[f64], targets: &[f64]) -> Vec<f64> {
    if grid.is_empty() {
        return vec![0.0; targets.len()];
    }
    targets
        .iter()
        .map(|&t| {
            let upper = search_sorted(grid, t);
            if upper == 0 {
                return values[0];
            }
            if upper >= grid.len() {
                return values[grid.len() - 1];
            }
            let lower = upper - 1;
            let span = grid[upper] - grid[lower];
            if span <= 0.0 {
                return values[upper];
            }
            let weight = (t - grid[lower]) / span;
            values[lower] + weight * (values[upper] - values[lower])
        })
        .collect()
}

//! Task regressors for fviz.
//!
//! Turns a condition's events (onset, duration, amplitude) into a regressor
//! sampled at the functional frame times, either as a plain boxcar
//! ([`HrfModel::None`]) or convolved with the canonical Glover response
//! ([`HrfModel::Glover`]).
//!
//! # Example
//!
//! ```ignore
//! use fviz_signal::{ConditionEvents, HrfModel, compute_regressor};
//!
//! let frame_times: Vec<f64> = (0..10).map(|i| 2.0 * (i as f64 + 0.5)).collect();
//! let events = ConditionEvents::new("faces").with_event(0.0, 10.0);
//! let (block, names) = compute_regressor(&events, HrfModel::None, &frame_times)?;
//! ```

mod error;
mod hrf;
mod regressor;

pub use error::{Result, SignalError};
pub use hrf::{HrfModel, glover_kernel};
pub use regressor::{ConditionEvents, MIN_ONSET, OVERSAMPLING, compute_regressor};

//! Hemodynamic response kernels.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kernel support in seconds.
const GLOVER_TIME_LENGTH: f64 = 32.0;
const GLOVER_DELAY: f64 = 6.0;
const GLOVER_UNDERSHOOT: f64 = 12.0;
const GLOVER_DISPERSION: f64 = 0.9;
const GLOVER_U_DISPERSION: f64 = 0.9;
const GLOVER_RATIO: f64 = 0.35;

/// Kernel applied to the sampled event train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HrfModel {
    /// Unit impulse; the regressor is the boxcar itself.
    None,
    /// Glover (1999) canonical gamma-difference response.
    Glover,
}

impl HrfModel {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Glover => "glover",
        }
    }

    /// Sampled kernel for the given sampling interval and oversampling factor.
    pub fn kernel(&self, tr: f64, oversampling: usize) -> Vec<f64> {
        match self {
            Self::None => {
                let mut kernel = vec![0.0; oversampling.max(1)];
                kernel[0] = 1.0;
                kernel
            }
            Self::Glover => glover_kernel(tr, oversampling),
        }
    }
}

impl fmt::Display for HrfModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Glover HRF on a grid of `tr / oversampling` seconds, normalized to unit sum.
pub fn glover_kernel(tr: f64, oversampling: usize) -> Vec<f64> {
    let dt = tr / oversampling as f64;
    let count = (GLOVER_TIME_LENGTH / dt).round_ties_even() as usize;

    let mut kernel: Vec<f64> = linspace(0.0, GLOVER_TIME_LENGTH, count)
        .into_iter()
        .map(|t| {
            let peak = gamma_pdf(t, GLOVER_DELAY / GLOVER_DISPERSION, dt, GLOVER_DISPERSION);
            let undershoot = gamma_pdf(
                t,
                GLOVER_UNDERSHOOT / GLOVER_U_DISPERSION,
                dt,
                GLOVER_U_DISPERSION,
            );
            peak - GLOVER_RATIO * undershoot
        })
        .collect();

    let total: f64 = kernel.iter().sum();
    if total != 0.0 {
        kernel.iter_mut().for_each(|v| *v /= total);
    }
    kernel
}

/// `count` evenly spaced points over `[start, stop]`, both ends included.
pub(crate) fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut points: Vec<f64> = (0..count).map(|i| start + step * i as f64).collect();
            points[count - 1] = stop;
            points
        }
    }
}

/// Gamma density with location and scale.
fn gamma_pdf(t: f64, shape: f64, loc: f64, scale: f64) -> f64 {
    let x = (t - loc) / scale;
    if x <= 0.0 {
        return 0.0;
    }
    ((shape - 1.0) * x.ln() - x - ln_gamma(shape)).exp() / scale
}

#[allow(clippy::excessive_precision)]
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function (Lanczos, g = 7).
fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        return (PI / (PI * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let series = LANCZOS[1..]
        .iter()
        .enumerate()
        .fold(LANCZOS[0], |acc, (i, c)| acc + c / (x + i as f64 + 1.0));
    let t = x + 7.5;
    0.5 * (2.0 * PI).ln() + (x + 0.5) * t.ln() - t + series.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ln_gamma_factorials() {
        assert_relative_eq!(ln_gamma(1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(ln_gamma(5.0), 24.0_f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(ln_gamma(0.5), PI.sqrt().ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_glover_kernel_shape() {
        let kernel = glover_kernel(2.0, 50);
        assert_eq!(kernel.len(), 800);
        assert_relative_eq!(kernel.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_eq!(kernel[0], 0.0);

        // Peak near 5 s, undershoot after 10 s.
        let (peak, _) = kernel
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
        let peak_time = peak as f64 * 32.0 / 799.0;
        assert!((4.0..6.5).contains(&peak_time), "peak at {peak_time}");
        assert!(kernel[400] < 0.0);
    }

    #[test]
    fn test_delta_kernel() {
        let kernel = HrfModel::None.kernel(2.0, 50);
        assert_eq!(kernel.len(), 50);
        assert_eq!(kernel[0], 1.0);
        assert!(kernel[1..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_linspace_endpoints() {
        let points = linspace(-23.0, 21.0, 5);
        assert_eq!(points, vec![-23.0, -12.0, -1.0, 10.0, 21.0]);
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
    }
}

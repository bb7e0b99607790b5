use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::shared::constants::{HF_BAND_HZ, LF_BAND_HZ};
use crate::shared::metrics::{Metric, Undetermined};

use super::ibi::IbiSeries;

/// Spectral power of the interval series in the low- and high-frequency
/// bands, and their ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyDomainMetrics {
    pub lf_power: Metric,
    pub hf_power: Metric,
    pub lf_hf_ratio: Metric,
}

impl FrequencyDomainMetrics {
    pub fn undetermined(reason: Undetermined) -> Self {
        let m = Metric::Undetermined(reason);
        Self {
            lf_power: m,
            hf_power: m,
            lf_hf_ratio: m,
        }
    }

    /// The series is treated as uniformly sampled at its mean interval.
    pub fn compute(ibi: &IbiSeries) -> Self {
        if ibi.len() < 2 {
            return Self::undetermined(Undetermined::TooFewIntervals);
        }
        let spacing = match ibi.mean() {
            Some(m) if m > 0.0 => m,
            _ => return Self::undetermined(Undetermined::NonPositiveMeanInterval),
        };

        let power = power_spectrum(ibi.as_slice());
        let freqs = bin_frequencies(power.len(), spacing);
        let lf = band_power(&power, &freqs, LF_BAND_HZ);
        let hf = band_power(&power, &freqs, HF_BAND_HZ);

        let lf_hf_ratio = if hf > 0.0 {
            Metric::finite(lf / hf)
        } else {
            Metric::Undetermined(Undetermined::ZeroHighFrequencyPower)
        };
        Self {
            lf_power: Metric::finite(lf),
            hf_power: Metric::finite(hf),
            lf_hf_ratio,
        }
    }
}

/// |X[k]|² of the unnormalised forward DFT.
pub fn power_spectrum(values: &[f64]) -> Vec<f64> {
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(values.len());
    let mut buf: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buf);
    buf.iter().map(|c| c.norm_sqr()).collect()
}

/// Frequency of each DFT bin for `n` samples spaced `spacing` seconds apart.
///
/// Bins `0..=(n-1)/2` are non-negative; the rest map to `k - n`.
pub fn bin_frequencies(n: usize, spacing: f64) -> Vec<f64> {
    let scale = 1.0 / (n as f64 * spacing);
    let positive_end = (n - 1) / 2;
    (0..n)
        .map(|k| {
            if k <= positive_end {
                k as f64 * scale
            } else {
                (k as f64 - n as f64) * scale
            }
        })
        .collect()
}

/// Sum of power over bins with `low <= f < high`.
fn band_power(power: &[f64], freqs: &[f64], (low, high): (f64, f64)) -> f64 {
    power
        .iter()
        .zip(freqs)
        .filter(|(_, &f)| f >= low && f < high)
        .map(|(p, _)| p)
        .sum()
}

use crate::shared::metrics::{Metric, Undetermined};
use crate::signal::domain::peak_detector::{find_peaks, PeakCriteria};

/// Outcome of the sliding-window pass.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowedHeartRate {
    pub avg_heart_rate: Metric,
    /// Rate of each window that produced one, in window order.
    pub window_rates: Vec<f64>,
    pub windows_evaluated: usize,
}

/// Estimates heart rate as the mean of per-window beat rates.
///
/// Short windows tolerate drift and motion better than one pass over the
/// whole capture; a window contributes only if it holds at least two beats.
pub struct WindowedEstimator {
    fps: f64,
    window_length: usize,
    step_size: usize,
    min_peak_distance: usize,
    height_fraction: f64,
}

impl WindowedEstimator {
    pub fn new(
        fps: f64,
        window_length: usize,
        step_size: usize,
        min_peak_distance: usize,
        height_fraction: f64,
    ) -> Self {
        Self {
            fps,
            window_length: window_length.max(1),
            step_size: step_size.max(1),
            min_peak_distance,
            height_fraction,
        }
    }

    pub fn estimate(&self, smoothed: &[f64]) -> WindowedHeartRate {
        if smoothed.len() < self.window_length {
            log::warn!(
                "Smoothed signal length ({}) is less than window length ({}); no heart rate",
                smoothed.len(),
                self.window_length
            );
        }

        let mut window_rates = Vec::new();
        let mut windows_evaluated = 0;
        let starts = (0..=smoothed.len().saturating_sub(self.window_length))
            .step_by(self.step_size)
            .take_while(|&s| s + self.window_length <= smoothed.len());

        for start in starts {
            windows_evaluated += 1;
            let segment = &smoothed[start..start + self.window_length];
            let Some(criteria) = self.criteria_for(segment) else {
                continue;
            };
            let peaks = find_peaks(segment, &criteria);
            if peaks.len() < 2 {
                continue;
            }
            if let Some(rate) = rate_from_peaks(&peaks, self.fps) {
                window_rates.push(rate);
            }
        }

        let avg_heart_rate = if window_rates.is_empty() {
            Metric::Undetermined(Undetermined::NoValidWindow)
        } else {
            Metric::finite(window_rates.iter().sum::<f64>() / window_rates.len() as f64)
        };
        log::debug!(
            "{} of {windows_evaluated} windows produced a rate",
            window_rates.len()
        );

        WindowedHeartRate {
            avg_heart_rate,
            window_rates,
            windows_evaluated,
        }
    }

    /// Peak criteria for one window, or `None` for a flat-zero window.
    ///
    /// A flat non-zero window gets spacing only, since every sample would
    /// meet a height threshold anyway.
    fn criteria_for(&self, segment: &[f64]) -> Option<PeakCriteria> {
        let (min, max) = segment
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min == max {
            if max == 0.0 {
                return None;
            }
            return Some(PeakCriteria::spacing_only(self.min_peak_distance));
        }
        Some(PeakCriteria::with_height(
            self.min_peak_distance,
            max * self.height_fraction,
        ))
    }
}

/// Mean instantaneous rate in beats per minute over consecutive peak pairs.
///
/// Returns `None` for fewer than two peaks, a non-positive sample rate, or
/// a non-positive or non-finite result.
pub fn rate_from_peaks(peaks: &[usize], fps: f64) -> Option<f64> {
    if peaks.len() < 2 || fps <= 0.0 {
        return None;
    }
    let rates: Vec<f64> = peaks
        .windows(2)
        .map(|pair| 60.0 / ((pair[1] - pair[0]) as f64 / fps))
        .collect();
    let rate = rates.iter().sum::<f64>() / rates.len() as f64;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

use crate::signal::domain::peak_detector::{find_peaks, PeakCriteria};

/// Detects beats once over the whole filtered signal.
///
/// The height threshold is `height_fraction` of the global maximum, or 0
/// when the signal never rises above zero.
pub fn detect_beats(filtered: &[f64], min_distance: usize, height_fraction: f64) -> Vec<usize> {
    let max = filtered.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_height = if max > 0.0 { max * height_fraction } else { 0.0 };
    find_peaks(filtered, &PeakCriteria::with_height(min_distance, min_height))
}

/// Interbeat intervals in seconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IbiSeries {
    intervals: Vec<f64>,
}

impl IbiSeries {
    /// Differences between consecutive peak indices, converted to seconds.
    ///
    /// Empty for fewer than two peaks or a non-positive sample rate.
    pub fn from_peaks(peaks: &[usize], fps: f64) -> Self {
        if peaks.len() < 2 || fps <= 0.0 {
            return Self::default();
        }
        let intervals = peaks
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) as f64 / fps)
            .collect();
        Self { intervals }
    }

    pub fn from_intervals(intervals: Vec<f64>) -> Self {
        Self { intervals }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.intervals.is_empty() {
            return None;
        }
        Some(self.intervals.iter().sum::<f64>() / self.intervals.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_evenly_spaced_peaks() {
        let ibi = IbiSeries::from_peaks(&[2, 10, 18, 26], 10.0);
        assert_eq!(ibi.len(), 3);
        for &v in ibi.as_slice() {
            assert_relative_eq!(v, 0.8);
        }
        assert_relative_eq!(ibi.mean().unwrap(), 0.8);
    }

    #[test]
    fn test_single_peak_is_empty() {
        assert!(IbiSeries::from_peaks(&[7], 10.0).is_empty());
        assert!(IbiSeries::from_peaks(&[], 10.0).mean().is_none());
    }

    #[test]
    fn test_non_positive_fps_is_empty() {
        assert!(IbiSeries::from_peaks(&[1, 5, 9], 0.0).is_empty());
        assert!(IbiSeries::from_peaks(&[1, 5, 9], -3.0).is_empty());
    }

    #[test]
    fn test_detect_beats_uses_global_height() {
        // 0.5 is below 0.6 x 2.0, so only the tall peaks survive.
        let x = [0.0, 2.0, 0.0, 0.5, 0.0, 2.0, 0.0];
        assert_eq!(detect_beats(&x, 1, 0.6), vec![1, 5]);
    }

    #[test]
    fn test_detect_beats_on_non_positive_signal() {
        // Height 0 admits nothing below zero.
        let x = [-3.0, -1.0, -3.0, -2.0, -3.0];
        assert!(detect_beats(&x, 1, 0.6).is_empty());
        assert!(detect_beats(&[0.0; 10], 1, 0.6).is_empty());
    }
}

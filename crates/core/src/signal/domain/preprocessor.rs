use super::signal_filter::SignalFilter;

/// Band-limited pulse signal at the two resolutions the estimators use.
#[derive(Clone, Debug, PartialEq)]
pub struct PreprocessedSignal {
    /// Detrended and band-pass filtered; same length as the input.
    pub filtered: Vec<f64>,
    /// `filtered` after the moving average; shorter by `window - 1`
    /// unless smoothing was skipped.
    pub smoothed: Vec<f64>,
}

/// Detrend → band-pass → moving average.
pub struct Preprocessor {
    filter: Box<dyn SignalFilter>,
    smoothing_window: usize,
}

impl Preprocessor {
    pub fn new(filter: Box<dyn SignalFilter>, smoothing_window: usize) -> Self {
        Self {
            filter,
            smoothing_window: smoothing_window.max(1),
        }
    }

    pub fn process(&self, raw: &[f64]) -> PreprocessedSignal {
        let detrended = detrend(raw);
        let filtered = self.filter.apply(&detrended);
        let smoothed = if filtered.len() < self.smoothing_window {
            log::warn!(
                "Filtered signal length ({}) is less than smoothing window ({}); skipping smoothing",
                filtered.len(),
                self.smoothing_window
            );
            filtered.clone()
        } else {
            moving_average(&filtered, self.smoothing_window)
        };
        PreprocessedSignal { filtered, smoothed }
    }
}

/// Subtracts the least-squares line through `(i, signal[i])`.
pub fn detrend(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = signal.iter().sum::<f64>() / n as f64;
    let t_mean = (n - 1) as f64 / 2.0;

    let (mut cov, mut var) = (0.0, 0.0);
    for (i, &x) in signal.iter().enumerate() {
        let dt = i as f64 - t_mean;
        cov += dt * (x - mean);
        var += dt * dt;
    }
    let slope = if var > 0.0 { cov / var } else { 0.0 };

    signal
        .iter()
        .enumerate()
        .map(|(i, &x)| x - mean - slope * (i as f64 - t_mean))
        .collect()
}

/// Mean over each full window of `window` samples ("valid" convolution).
///
/// Returns the input unchanged when `window` is 0 or longer than the signal.
pub fn moving_average(signal: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || window > signal.len() {
        return signal.to_vec();
    }
    signal
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::domain::signal_filter::PassthroughFilter;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_detrend_removes_line() {
        let x: Vec<f64> = (0..10).map(|i| 3.0 + 0.5 * i as f64).collect();
        for v in detrend(&x) {
            assert_relative_eq!(v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_detrend_constant_is_exactly_zero() {
        assert!(detrend(&[100.0; 40]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_detrend_keeps_oscillation_around_zero() {
        let x: Vec<f64> = (0..20)
            .map(|i| 10.0 + 0.2 * i as f64 + if i % 2 == 0 { 1.0 } else { -1.0 })
            .collect();
        let d = detrend(&x);
        let mean = d.iter().sum::<f64>() / d.len() as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        assert!(d[0] > 0.0 && d[1] < 0.0);
    }

    #[test]
    fn test_detrend_short_inputs() {
        assert!(detrend(&[]).is_empty());
        assert_eq!(detrend(&[5.0]), vec![0.0]);
    }

    #[test]
    fn test_moving_average_valid_mode() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&x, 3), vec![2.0, 3.0, 4.0]);
    }

    #[rstest]
    #[case::zero_window(0)]
    #[case::window_longer_than_signal(6)]
    fn test_moving_average_passthrough(#[case] window: usize) {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(moving_average(&x, window), x.to_vec());
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let x = [1.0, -2.0, 3.0];
        assert_eq!(moving_average(&x, 1), x.to_vec());
    }

    #[test]
    fn test_process_lengths() {
        let pre = Preprocessor::new(Box::new(PassthroughFilter), 3);
        let out = pre.process(&[1.0, 5.0, 2.0, 7.0, 3.0, 8.0]);
        assert_eq!(out.filtered.len(), 6);
        assert_eq!(out.smoothed.len(), 4);
    }

    #[test]
    fn test_process_skips_smoothing_for_short_signal() {
        let pre = Preprocessor::new(Box::new(PassthroughFilter), 10);
        let out = pre.process(&[1.0, 5.0, 2.0]);
        assert_eq!(out.smoothed, out.filtered);
    }
}

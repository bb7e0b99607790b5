/// Constraints a local maximum must satisfy to count as a beat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeakCriteria {
    /// Minimum index distance between kept peaks.
    pub min_distance: usize,
    /// Peaks lower than this are dropped.
    pub min_height: Option<f64>,
}

impl PeakCriteria {
    pub fn spacing_only(min_distance: usize) -> Self {
        Self {
            min_distance,
            min_height: None,
        }
    }

    pub fn with_height(min_distance: usize, min_height: f64) -> Self {
        Self {
            min_distance,
            min_height: Some(min_height),
        }
    }
}

/// Finds peak indices in ascending order.
///
/// A peak is a sample higher than its left neighbour and higher than the
/// first different sample to its right; a flat top reports its middle
/// sample (rounded down). The first and last samples are never peaks.
/// When two peaks are closer than `min_distance`, the taller one wins.
pub fn find_peaks(signal: &[f64], criteria: &PeakCriteria) -> Vec<usize> {
    let mut peaks = local_maxima(signal);
    if let Some(min_height) = criteria.min_height {
        peaks.retain(|&i| signal[i] >= min_height);
    }
    if criteria.min_distance > 1 && peaks.len() > 1 {
        peaks = enforce_distance(signal, &peaks, criteria.min_distance);
    }
    peaks
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

fn enforce_distance(x: &[f64], peaks: &[usize], min_distance: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    let mut keep = vec![true; peaks.len()];
    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < min_distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < min_distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_simple_peaks() {
        let x = [0.0, 1.0, 0.0, 2.0, 0.0, 1.5, 0.0];
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(1)), vec![1, 3, 5]);
    }

    #[rstest]
    #[case::rising_end(&[0.0, 1.0, 2.0, 3.0])]
    #[case::falling_start(&[3.0, 2.0, 1.0, 0.0])]
    #[case::constant(&[4.0, 4.0, 4.0, 4.0])]
    #[case::too_short(&[0.0, 1.0])]
    #[case::empty(&[])]
    fn test_no_interior_peaks(#[case] x: &[f64]) {
        assert!(find_peaks(x, &PeakCriteria::spacing_only(1)).is_empty());
    }

    #[test]
    fn test_plateau_reports_middle_rounded_down() {
        let x = [0.0, 2.0, 2.0, 2.0, 2.0, 0.0];
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(1)), vec![2]);
        let x = [0.0, 2.0, 2.0, 2.0, 0.0];
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(1)), vec![2]);
    }

    #[test]
    fn test_plateau_reaching_the_end_is_not_a_peak() {
        let x = [0.0, 2.0, 2.0, 2.0];
        assert!(find_peaks(&x, &PeakCriteria::spacing_only(1)).is_empty());
    }

    #[test]
    fn test_step_up_then_down_plateau() {
        let x = [0.0, 1.0, 1.0, 3.0, 0.0];
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(1)), vec![3]);
    }

    #[test]
    fn test_height_threshold_is_inclusive() {
        let x = [0.0, 1.0, 0.0, 2.0, 0.0, 1.5, 0.0];
        assert_eq!(find_peaks(&x, &PeakCriteria::with_height(1, 1.5)), vec![3, 5]);
    }

    #[test]
    fn test_distance_keeps_tallest() {
        let x = [0.0, 1.0, 0.0, 3.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        // 1 and 5 are within 3 of the tallest (3); 9 is far enough away.
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(3)), vec![3, 9]);
    }

    #[test]
    fn test_distance_equal_to_spacing_keeps_both() {
        let x = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(2)), vec![1, 3]);
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(3)).len(), 1);
    }

    #[test]
    fn test_distance_tie_prefers_later_peak() {
        let x = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(find_peaks(&x, &PeakCriteria::spacing_only(3)), vec![3]);
    }

    #[test]
    fn test_sampled_cosine_peaks_once_per_cycle() {
        let x: Vec<f64> = (0..60)
            .map(|i| (2.0 * std::f64::consts::PI * (i as f64 - 5.0) / 10.0).cos())
            .collect();
        let peaks = find_peaks(&x, &PeakCriteria::with_height(3, 0.6));
        assert_eq!(peaks, vec![5, 15, 25, 35, 45, 55]);
    }
}

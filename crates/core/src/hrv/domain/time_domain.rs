use crate::shared::metrics::{Metric, Undetermined};

use super::ibi::IbiSeries;

/// SDNN, RMSSD and the beat stability index derived from RMSSD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeDomainMetrics {
    pub sdnn: Metric,
    pub rmssd: Metric,
    pub bsi: Metric,
}

impl TimeDomainMetrics {
    pub fn undetermined(reason: Undetermined) -> Self {
        let m = Metric::Undetermined(reason);
        Self {
            sdnn: m,
            rmssd: m,
            bsi: m,
        }
    }

    pub fn compute(ibi: &IbiSeries) -> Self {
        let rmssd = rmssd(ibi);
        Self {
            sdnn: sdnn(ibi),
            rmssd,
            bsi: bsi(rmssd),
        }
    }
}

/// Population standard deviation of the intervals.
pub fn sdnn(ibi: &IbiSeries) -> Metric {
    let Some(mean) = ibi.mean() else {
        return Metric::Undetermined(Undetermined::TooFewIntervals);
    };
    let values = ibi.as_slice();
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Metric::finite(variance.sqrt())
}

/// Root mean square of successive interval differences.
pub fn rmssd(ibi: &IbiSeries) -> Metric {
    let values = ibi.as_slice();
    if values.len() < 2 {
        return Metric::Undetermined(Undetermined::TooFewIntervals);
    }
    let sum_sq: f64 = values.windows(2).map(|d| (d[1] - d[0]).powi(2)).sum();
    Metric::finite((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Reciprocal of RMSSD; a perfectly regular rhythm has none.
pub fn bsi(rmssd: Metric) -> Metric {
    match rmssd {
        Metric::Value(v) if v > 0.0 => Metric::finite(1.0 / v),
        Metric::Value(_) => Metric::Undetermined(Undetermined::ZeroRmssd),
        undetermined => undetermined,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_regular_rhythm() {
        let ibi = IbiSeries::from_intervals(vec![0.5; 5]);
        let m = TimeDomainMetrics::compute(&ibi);
        assert_eq!(m.sdnn, Metric::Value(0.0));
        assert_eq!(m.rmssd, Metric::Value(0.0));
        assert_eq!(m.bsi, Metric::Undetermined(Undetermined::ZeroRmssd));
        assert_eq!(m.bsi.or_zero(), 0.0);
    }

    #[test]
    fn test_known_values() {
        let ibi = IbiSeries::from_intervals(vec![0.8, 1.0, 0.8, 1.0]);
        // population std of {0.8, 1.0} = 0.1
        assert_relative_eq!(sdnn(&ibi).value().unwrap(), 0.1, epsilon = 1e-12);
        // every successive difference is 0.2
        let r = rmssd(&ibi);
        assert_relative_eq!(r.value().unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(bsi(r).value().unwrap(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_interval() {
        let ibi = IbiSeries::from_intervals(vec![0.9]);
        assert_eq!(sdnn(&ibi), Metric::Value(0.0));
        assert_eq!(
            rmssd(&ibi),
            Metric::Undetermined(Undetermined::TooFewIntervals)
        );
        assert_eq!(
            bsi(rmssd(&ibi)),
            Metric::Undetermined(Undetermined::TooFewIntervals)
        );
    }

    #[test]
    fn test_empty_series() {
        let m = TimeDomainMetrics::compute(&IbiSeries::default());
        assert_eq!(m, TimeDomainMetrics::undetermined(Undetermined::TooFewIntervals));
    }
}

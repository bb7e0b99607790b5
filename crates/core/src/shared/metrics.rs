use serde::Serialize;

/// Why a metric could not be computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Undetermined {
    /// Fewer than three usable intensity samples.
    TooFewSamples,
    /// No analysis window produced a positive heart rate.
    NoValidWindow,
    /// Fewer than two beats found in the filtered signal.
    TooFewPeaks,
    /// Fewer than two interbeat intervals.
    TooFewIntervals,
    ZeroRmssd,
    NonPositiveMeanInterval,
    ZeroHighFrequencyPower,
    NonFinite,
}

/// A computed value or the reason it is missing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Value(f64),
    Undetermined(Undetermined),
}

impl Metric {
    /// Wraps `value`, turning NaN and infinities into `Undetermined`.
    pub fn finite(value: f64) -> Self {
        if value.is_finite() {
            Metric::Value(value)
        } else {
            Metric::Undetermined(Undetermined::NonFinite)
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(*v),
            Metric::Undetermined(_) => None,
        }
    }

    pub fn reason(&self) -> Option<Undetermined> {
        match self {
            Metric::Value(_) => None,
            Metric::Undetermined(r) => Some(*r),
        }
    }

    /// Collapses to the external representation: finite and non-negative,
    /// with 0 standing in for "undetermined".
    pub fn or_zero(&self) -> f64 {
        match self {
            Metric::Value(v) if v.is_finite() && *v > 0.0 => *v,
            _ => 0.0,
        }
    }
}

/// Final estimate handed to callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MetricsResult {
    pub avg_heart_rate: f64,
    pub sdnn: f64,
    pub rmssd: f64,
    pub bsi: f64,
    pub lf_hf_ratio: f64,
}

impl MetricsResult {
    pub fn is_all_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Tagged metrics plus the intermediate counts that explain them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EstimationReport {
    pub avg_heart_rate: Metric,
    pub sdnn: Metric,
    pub rmssd: Metric,
    pub bsi: Metric,
    pub lf_hf_ratio: Metric,
    pub lf_power: Metric,
    pub hf_power: Metric,
    pub sample_count: usize,
    pub smoothed_len: usize,
    pub windows_evaluated: usize,
    pub windows_accepted: usize,
    pub global_peak_count: usize,
}

impl EstimationReport {
    /// Report for input too short to analyse: every metric carries `reason`.
    pub fn undetermined(reason: Undetermined, sample_count: usize) -> Self {
        let m = Metric::Undetermined(reason);
        Self {
            avg_heart_rate: m,
            sdnn: m,
            rmssd: m,
            bsi: m,
            lf_hf_ratio: m,
            lf_power: m,
            hf_power: m,
            sample_count,
            smoothed_len: 0,
            windows_evaluated: 0,
            windows_accepted: 0,
            global_peak_count: 0,
        }
    }

    pub fn to_result(&self) -> MetricsResult {
        MetricsResult {
            avg_heart_rate: self.avg_heart_rate.or_zero(),
            sdnn: self.sdnn.or_zero(),
            rmssd: self.rmssd.or_zero(),
            bsi: self.bsi.or_zero(),
            lf_hf_ratio: self.lf_hf_ratio.or_zero(),
        }
    }
}

impl From<&EstimationReport> for MetricsResult {
    fn from(report: &EstimationReport) -> Self {
        report.to_result()
    }
}

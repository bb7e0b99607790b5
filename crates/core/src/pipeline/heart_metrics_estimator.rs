use ndarray::Array2;

use crate::heart_rate::domain::windowed_estimator::WindowedEstimator;
use crate::hrv::domain::frequency_domain::FrequencyDomainMetrics;
use crate::hrv::domain::ibi::{detect_beats, IbiSeries};
use crate::hrv::domain::time_domain::TimeDomainMetrics;
use crate::shared::metrics::{EstimationReport, MetricsResult, Undetermined};
use crate::shared::parameters::EstimatorParameters;
use crate::signal::domain::preprocessor::Preprocessor;
use crate::signal::domain::signal_assembler::{assemble, has_enough_samples};
use crate::signal::infrastructure::filter_factory::create_bandpass;

/// Forehead crops to heart rate and HRV.
///
/// ```text
/// ROIs -> mean intensity -> detrend -> band-pass -+-> moving average -> windowed HR
///                                                 +-> global beats -> IBI -> SDNN / RMSSD / BSI / LF:HF
/// ```
///
/// Configured once; `estimate*` take `&self` and keep no state between
/// calls, so one instance can serve many threads.
pub struct HeartMetricsEstimator {
    params: EstimatorParameters,
    preprocessor: Preprocessor,
    windowed: WindowedEstimator,
}

impl HeartMetricsEstimator {
    pub fn new(params: EstimatorParameters) -> Self {
        let params = params.repaired();
        let preprocessor = Preprocessor::new(create_bandpass(&params), params.smoothing_window());
        let windowed = WindowedEstimator::new(
            params.fps,
            params.window_length(),
            params.step_size(),
            params.min_peak_distance(),
            params.peak_height_fraction,
        );
        Self {
            params,
            preprocessor,
            windowed,
        }
    }

    pub fn parameters(&self) -> &EstimatorParameters {
        &self.params
    }

    pub fn estimate(&self, rois: &[Array2<u8>]) -> MetricsResult {
        self.estimate_report(rois).to_result()
    }

    pub fn estimate_report(&self, rois: &[Array2<u8>]) -> EstimationReport {
        if !has_enough_samples(rois.len()) {
            log::warn!("Only {} frames supplied; need at least 3", rois.len());
            return EstimationReport::undetermined(Undetermined::TooFewSamples, 0);
        }
        self.estimate_signal(&assemble(rois))
    }

    /// Runs from already-assembled intensity samples.
    pub fn estimate_signal(&self, raw: &[f64]) -> EstimationReport {
        if !has_enough_samples(raw.len()) {
            log::warn!("Only {} usable samples; need at least 3", raw.len());
            return EstimationReport::undetermined(Undetermined::TooFewSamples, raw.len());
        }

        let signal = self.preprocessor.process(raw);
        let heart_rate = self.windowed.estimate(&signal.smoothed);

        let beats = detect_beats(
            &signal.filtered,
            self.params.min_peak_distance(),
            self.params.peak_height_fraction,
        );
        let (time, frequency) = if beats.len() < 2 {
            log::warn!("Found {} beats in the filtered signal; HRV undetermined", beats.len());
            (
                TimeDomainMetrics::undetermined(Undetermined::TooFewPeaks),
                FrequencyDomainMetrics::undetermined(Undetermined::TooFewPeaks),
            )
        } else {
            let ibi = IbiSeries::from_peaks(&beats, self.params.fps);
            (
                TimeDomainMetrics::compute(&ibi),
                FrequencyDomainMetrics::compute(&ibi),
            )
        };

        let report = EstimationReport {
            avg_heart_rate: heart_rate.avg_heart_rate,
            sdnn: time.sdnn,
            rmssd: time.rmssd,
            bsi: time.bsi,
            lf_hf_ratio: frequency.lf_hf_ratio,
            lf_power: frequency.lf_power,
            hf_power: frequency.hf_power,
            sample_count: raw.len(),
            smoothed_len: signal.smoothed.len(),
            windows_evaluated: heart_rate.windows_evaluated,
            windows_accepted: heart_rate.window_rates.len(),
            global_peak_count: beats.len(),
        };
        log::debug!("{report:?}");
        report
    }
}

/// One-shot estimate from forehead crops captured at `fps`.
pub fn estimate(frames: &[Array2<u8>], fps: f64) -> MetricsResult {
    HeartMetricsEstimator::new(EstimatorParameters::new(fps)).estimate(frames)
}

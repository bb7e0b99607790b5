use crate::shared::parameters::EstimatorParameters;
use crate::signal::domain::signal_filter::{PassthroughFilter, SignalFilter};

use super::butterworth_bandpass::ButterworthBandpass;

/// Creates the heart-band filter for the configured sampling rate.
///
/// When the band cannot be represented at this rate (cutoffs outside
/// `(0, Nyquist)` or inverted), the signal is passed through unfiltered so
/// the estimate degrades instead of failing.
pub fn create_bandpass(params: &EstimatorParameters) -> Box<dyn SignalFilter> {
    match ButterworthBandpass::design(
        params.filter_order,
        params.band_low_hz,
        params.band_high_hz,
        params.fps,
    ) {
        Some(filter) => {
            log::debug!(
                "Band-pass {}-{} Hz, order {} at {} fps",
                params.band_low_hz,
                params.band_high_hz,
                params.filter_order,
                params.fps
            );
            Box::new(filter)
        }
        None => {
            log::warn!(
                "Bandpass filter: invalid cutoffs ({}, {}) Hz for fs {}; passing signal through",
                params.band_low_hz,
                params.band_high_hz,
                params.fps
            );
            Box::new(PassthroughFilter)
        }
    }
}

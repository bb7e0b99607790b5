use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    BANDPASS_ORDER, DEFAULT_FPS, HEART_BAND_HIGH_HZ, HEART_BAND_LOW_HZ, PEAK_HEIGHT_FRACTION,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Immutable estimator configuration.
///
/// Sample counts (window, stride, peak spacing, smoothing) are derived from
/// `fps` so the same parameters describe the same physical durations at any
/// frame rate. Unusable values are repaired by [`EstimatorParameters::repaired`]
/// rather than reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorParameters {
    pub fps: f64,
    /// Analysis window length in seconds.
    pub window_multiplier: f64,
    /// Window stride in seconds.
    pub step_multiplier: f64,
    pub band_low_hz: f64,
    pub band_high_hz: f64,
    pub filter_order: usize,
    pub peak_height_fraction: f64,
}

impl Default for EstimatorParameters {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            window_multiplier: 2.0,
            step_multiplier: 1.0,
            band_low_hz: HEART_BAND_LOW_HZ,
            band_high_hz: HEART_BAND_HIGH_HZ,
            filter_order: BANDPASS_ORDER,
            peak_height_fraction: PEAK_HEIGHT_FRACTION,
        }
    }
}

impl EstimatorParameters {
    /// Default parameters at the given frame rate, repaired.
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            ..Self::default()
        }
        .repaired()
    }

    pub fn with_multipliers(mut self, window_multiplier: f64, step_multiplier: f64) -> Self {
        self.window_multiplier = window_multiplier;
        self.step_multiplier = step_multiplier;
        self.repaired()
    }

    /// Loads parameters from a JSON file; missing keys take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(params.repaired())
    }

    /// Replaces a non-positive fps and degenerate window/stride settings
    /// with safe defaults.
    pub fn repaired(mut self) -> Self {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            log::error!(
                "FPS ({}) must be positive. Defaulting to {DEFAULT_FPS}.",
                self.fps
            );
            self.fps = DEFAULT_FPS;
        }
        if !(self.window_multiplier.is_finite() && self.fps * self.window_multiplier >= 0.5) {
            log::warn!(
                "Window multiplier {} gives an empty window; using 2 s",
                self.window_multiplier
            );
            self.window_multiplier = 2.0;
        }
        if !(self.step_multiplier.is_finite() && self.fps * self.step_multiplier >= 0.5) {
            log::warn!(
                "Step multiplier {} gives an empty stride; using 1 s",
                self.step_multiplier
            );
            self.step_multiplier = 1.0;
        }
        if !(0.0..=1.0).contains(&self.peak_height_fraction) {
            log::warn!(
                "Peak height fraction {} outside [0, 1]; using {PEAK_HEIGHT_FRACTION}",
                self.peak_height_fraction
            );
            self.peak_height_fraction = PEAK_HEIGHT_FRACTION;
        }
        if self.filter_order == 0 {
            self.filter_order = BANDPASS_ORDER;
        }
        self
    }

    pub fn window_length(&self) -> usize {
        samples_for(self.fps * self.window_multiplier)
    }

    pub fn step_size(&self) -> usize {
        samples_for(self.fps * self.step_multiplier)
    }

    /// Minimum spacing between detected beats: a third of a second,
    /// i.e. at most 180 BPM.
    pub fn min_peak_distance(&self) -> usize {
        samples_for(self.fps / 3.0)
    }

    pub fn smoothing_window(&self) -> usize {
        samples_for(self.fps / 3.0)
    }
}

fn samples_for(value: f64) -> usize {
    (value.round() as usize).max(1)
}

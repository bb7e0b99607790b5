/// Sampling rate assumed when a configured fps is unusable.
pub const DEFAULT_FPS: f64 = 30.0;

/// Frame rate the browser capture loop samples at.
pub const CAPTURE_FPS: f64 = 10.0;

/// Physiological pass-band: 30-180 BPM.
pub const HEART_BAND_LOW_HZ: f64 = 0.5;
pub const HEART_BAND_HIGH_HZ: f64 = 3.0;

pub const BANDPASS_ORDER: usize = 5;

/// Peak height threshold as a fraction of the local maximum.
pub const PEAK_HEIGHT_FRACTION: f64 = 0.6;

/// HRV spectral bands in Hz, lower bound inclusive.
pub const LF_BAND_HZ: (f64, f64) = (0.04, 0.15);
pub const HF_BAND_HZ: (f64, f64) = (0.15, 0.4);

/// Fewer valid forehead crops than this and the estimate is not attempted.
pub const MIN_VALID_FRAMES: usize = 30;

/// Upper bound on frames consumed per estimate.
pub const MAX_FRAMES: usize = 100;

/// Index of the green plane in RGB pixel data.
pub const GREEN_CHANNEL: usize = 1;

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

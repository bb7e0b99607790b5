use ndarray::Array2;

/// Minimum sample count for a linear detrend to leave any signal behind.
pub const MIN_SAMPLES: usize = 3;

/// Reduces each forehead crop to its mean intensity, in capture order.
///
/// Empty crops contribute nothing; the remaining samples are assumed to be
/// equally spaced at the capture frame rate.
pub fn assemble(rois: &[Array2<u8>]) -> Vec<f64> {
    rois.iter()
        .filter(|roi| !roi.is_empty())
        .map(mean_intensity)
        .collect()
}

pub fn mean_intensity(roi: &Array2<u8>) -> f64 {
    let sum: u64 = roi.iter().map(|&v| v as u64).sum();
    sum as f64 / roi.len() as f64
}

pub fn has_enough_samples(len: usize) -> bool {
    len >= MIN_SAMPLES
}

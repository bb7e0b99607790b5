use std::path::PathBuf;

/// Describes a frame sequence once it has been opened.
///
/// Still-image sequences carry no timing, so `fps` is whatever the caller
/// captured at.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    pub source_path: Option<PathBuf>,
}

impl SequenceMetadata {
    /// Capture length in seconds, or 0 when fps is unknown.
    pub fn duration_secs(&self) -> f64 {
        if self.fps > 0.0 {
            self.total_frames as f64 / self.fps
        } else {
            0.0
        }
    }
}

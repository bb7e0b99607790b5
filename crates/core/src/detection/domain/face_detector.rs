use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Source of face bounding boxes.
///
/// Detection itself happens elsewhere; implementations only hand over the
/// boxes for each frame, which may require per-frame state, hence `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>>;
}

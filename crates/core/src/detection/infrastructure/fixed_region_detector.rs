use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

/// Reports the same face box for every frame, for a subject held still in
/// front of a fixed camera.
pub struct FixedRegionDetector {
    region: FaceRegion,
}

impl FixedRegionDetector {
    pub fn new(region: FaceRegion) -> Self {
        Self { region }
    }
}

impl FaceDetector for FixedRegionDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        Ok(vec![self.region])
    }
}

use ndarray::{s, Array2};
use thiserror::Error;

use crate::shared::constants::GREEN_CHANNEL;
use crate::shared::frame::Frame;
use crate::shared::region::{FaceRegion, ForeheadRoi};

/// Why a frame contributed no forehead sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum RoiRejection {
    #[error("no face detected")]
    NoFace,
    #[error("face box has non-positive dimensions")]
    InvalidFaceDimensions,
    #[error("forehead rectangle is degenerate")]
    DegenerateRoi,
    #[error("forehead crop lies outside the frame")]
    EmptyCrop,
    #[error("frame has fewer than two channels")]
    TooFewChannels,
    #[error("frame could not be decoded")]
    Unreadable,
}

/// Per-reason counts of discarded frames.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub accepted: usize,
    pub no_face: usize,
    pub invalid_face: usize,
    pub degenerate_roi: usize,
    pub empty_crop: usize,
    pub too_few_channels: usize,
    pub unreadable: usize,
}

impl ExtractionStats {
    pub fn record(&mut self, rejection: RoiRejection) {
        match rejection {
            RoiRejection::NoFace => self.no_face += 1,
            RoiRejection::InvalidFaceDimensions => self.invalid_face += 1,
            RoiRejection::DegenerateRoi => self.degenerate_roi += 1,
            RoiRejection::EmptyCrop => self.empty_crop += 1,
            RoiRejection::TooFewChannels => self.too_few_channels += 1,
            RoiRejection::Unreadable => self.unreadable += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.no_face
            + self.invalid_face
            + self.degenerate_roi
            + self.empty_crop
            + self.too_few_channels
            + self.unreadable
    }
}

/// Crops the forehead band of a detected face and keeps its green plane.
///
/// Green carries the strongest blood-volume pulse of the three RGB
/// channels. Any geometry problem rejects the single frame only.
pub struct ForeheadExtractor;

impl ForeheadExtractor {
    pub fn extract(frame: &Frame, face: Option<&FaceRegion>) -> Result<Array2<u8>, RoiRejection> {
        let face = face.ok_or(RoiRejection::NoFace)?;
        let roi = face.forehead().ok_or(RoiRejection::InvalidFaceDimensions)?;
        Self::crop_green(frame, &roi)
    }

    fn crop_green(frame: &Frame, roi: &ForeheadRoi) -> Result<Array2<u8>, RoiRejection> {
        if roi.is_degenerate() {
            return Err(RoiRejection::DegenerateRoi);
        }
        if (frame.channels() as usize) <= GREEN_CHANNEL {
            return Err(RoiRejection::TooFewChannels);
        }
        let (rows, cols) = roi
            .clamp_to(frame.width(), frame.height())
            .ok_or(RoiRejection::EmptyCrop)?;
        Ok(frame
            .as_ndarray()
            .slice(s![rows, cols, GREEN_CHANNEL])
            .to_owned())
    }
}

use std::path::{Path, PathBuf};
use std::time::Instant;

use ndarray::Array2;
use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::pipeline::heart_metrics_estimator::HeartMetricsEstimator;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::roi::domain::forehead_extractor::{ExtractionStats, ForeheadExtractor, RoiRejection};
use crate::shared::constants::{MAX_FRAMES, MIN_VALID_FRAMES};
use crate::shared::metrics::{EstimationReport, MetricsResult};
use crate::shared::video_metadata::SequenceMetadata;
use crate::signal::domain::signal_assembler::mean_intensity;
use crate::video::domain::frame_reader::FrameReader;

#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("failed to open {path}: {message}")]
    Open { path: PathBuf, message: String },
    #[error("not enough valid frames collected: {collected} of {required} required")]
    InsufficientFrames { collected: usize, required: usize },
}

/// Everything one run produced.
#[derive(Clone, Debug)]
pub struct VitalsReport {
    pub metadata: SequenceMetadata,
    pub frames_read: usize,
    pub extraction: ExtractionStats,
    pub estimation: EstimationReport,
}

impl VitalsReport {
    pub fn result(&self) -> MetricsResult {
        self.estimation.to_result()
    }
}

/// Capture-to-vitals pipeline: read → detect → crop forehead → gate → estimate.
///
/// Reads at most `max_frames` frames. Frames that fail to decode or have no
/// usable forehead are skipped; if fewer than `min_valid_frames` remain the run fails instead
/// of estimating from too little signal.
pub struct EstimateVitalsUseCase {
    reader: Box<dyn FrameReader>,
    detector: Box<dyn FaceDetector>,
    estimator: HeartMetricsEstimator,
    logger: Box<dyn PipelineLogger>,
    max_frames: usize,
    min_valid_frames: usize,
}

impl EstimateVitalsUseCase {
    pub fn new(
        reader: Box<dyn FrameReader>,
        detector: Box<dyn FaceDetector>,
        estimator: HeartMetricsEstimator,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            detector,
            estimator,
            logger,
            max_frames: MAX_FRAMES,
            min_valid_frames: MIN_VALID_FRAMES,
        }
    }

    pub fn with_frame_limits(mut self, max_frames: usize, min_valid_frames: usize) -> Self {
        self.max_frames = max_frames;
        self.min_valid_frames = min_valid_frames;
        self
    }

    pub fn execute(&mut self, input_path: &Path) -> Result<VitalsReport, VitalsError> {
        let metadata = self
            .reader
            .open(input_path)
            .map_err(|e| VitalsError::Open {
                path: input_path.to_path_buf(),
                message: e.to_string(),
            })?;
        let total = metadata.total_frames.min(self.max_frames);
        self.logger.info(&format!(
            "Reading up to {total} of {} frames ({}x{}, {:.1} s) at {} fps",
            metadata.total_frames,
            metadata.width,
            metadata.height,
            metadata.duration_secs(),
            self.estimator.parameters().fps
        ));

        let (rois, extraction, frames_read) = self.collect_rois(total);
        self.reader.close();

        if rois.len() < self.min_valid_frames {
            self.logger.summary();
            return Err(VitalsError::InsufficientFrames {
                collected: rois.len(),
                required: self.min_valid_frames,
            });
        }

        let start = Instant::now();
        let estimation = self.estimator.estimate_report(&rois);
        self.logger
            .timing("estimate", start.elapsed().as_secs_f64() * 1000.0);
        self.logger.summary();

        Ok(VitalsReport {
            metadata,
            frames_read,
            extraction,
            estimation,
        })
    }

    fn collect_rois(&mut self, total: usize) -> (Vec<Array2<u8>>, ExtractionStats, usize) {
        let mut rois = Vec::new();
        let mut stats = ExtractionStats::default();
        let mut frames_read = 0;

        for (i, frame) in self.reader.frames().take(self.max_frames).enumerate() {
            frames_read += 1;
            let start = Instant::now();

            let extracted = match frame {
                Ok(frame) => {
                    let face = match self.detector.detect(&frame) {
                        Ok(regions) => regions.into_iter().next(),
                        Err(e) => {
                            log::warn!("Face detection failed on frame {i}: {e}");
                            None
                        }
                    };
                    ForeheadExtractor::extract(&frame, face.as_ref())
                }
                Err(e) => {
                    log::warn!("Frame {i} could not be read: {e}");
                    Err(RoiRejection::Unreadable)
                }
            };
            match extracted {
                Ok(roi) => {
                    stats.accepted += 1;
                    self.logger.metric("roi_mean", mean_intensity(&roi));
                    rois.push(roi);
                }
                Err(rejection) => {
                    stats.record(rejection);
                    self.logger.rejection(i, &rejection.to_string());
                }
            }
            self.logger
                .timing("extract", start.elapsed().as_secs_f64() * 1000.0);
            self.logger.progress(i + 1, total);
        }

        if stats.rejected() > 0 {
            log::warn!(
                "{} of {frames_read} frames had no usable forehead region ({} without a face, {} unreadable)",
                stats.rejected(),
                stats.no_face,
                stats.unreadable
            );
        }
        (rois, stats, frames_read)
    }
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

#[derive(Debug, Error)]
pub enum RegionFileError {
    #[error("failed to read region file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid region file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RegionEntry {
    frame: usize,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

/// Replays face boxes produced by an external detector and saved as JSON:
///
/// ```json
/// [{"frame": 0, "x": 120, "y": 80, "w": 200, "h": 240}, ...]
/// ```
///
/// Boxes are matched to frames by [`Frame::index`]. A frame with no entry
/// has no face; a frame with several keeps them in file order.
pub struct RegionFileDetector {
    regions: HashMap<usize, Vec<FaceRegion>>,
}

impl RegionFileDetector {
    pub fn from_file(path: &Path) -> Result<Self, RegionFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegionFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| RegionFileError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<RegionEntry> = serde_json::from_str(text)?;
        let mut regions: HashMap<usize, Vec<FaceRegion>> = HashMap::new();
        for e in entries {
            regions
                .entry(e.frame)
                .or_default()
                .push(FaceRegion::new(e.x, e.y, e.w, e.h));
        }
        log::info!("Loaded face regions for {} frames", regions.len());
        Ok(Self { regions })
    }

    pub fn frame_count(&self) -> usize {
        self.regions.len()
    }
}

impl FaceDetector for RegionFileDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceRegion>, Box<dyn std::error::Error>> {
        Ok(self.regions.get(&frame.index()).cloned().unwrap_or_default())
    }
}

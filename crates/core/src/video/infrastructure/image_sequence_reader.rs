use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::SequenceMetadata;
use crate::video::domain::frame_reader::FrameReader;

#[derive(Debug, Error)]
pub enum FrameReadError {
    #[error("failed to list frames in {path}: {source}")]
    List {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no image frames found in {0}")]
    Empty(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("decoded {path} has inconsistent dimensions: {source}")]
    Shape {
        path: PathBuf,
        source: ndarray::ShapeError,
    },
    #[error("image sequence reader: not opened")]
    NotOpened,
}

/// Adapts a directory of still images to the [`FrameReader`] interface.
///
/// Files are taken in file-name order, so captures should be named with
/// zero-padded indices (`frame_0001.png`, ...). Each image is decoded to
/// RGB8 lazily as the iterator advances.
pub struct ImageSequenceReader {
    fps: f64,
    paths: Option<Vec<PathBuf>>,
}

impl ImageSequenceReader {
    pub fn new(fps: f64) -> Self {
        Self { fps, paths: None }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn list_images(dir: &Path) -> Result<Vec<PathBuf>, FrameReadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| FrameReadError::List {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| FrameReadError::List {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn decode(path: &Path, index: usize) -> Result<Frame, FrameReadError> {
    let img = image::open(path)
        .map_err(|source| FrameReadError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    let (width, height) = img.dimensions();
    Frame::new(img.into_raw(), width, height, 3, index).map_err(|source| FrameReadError::Shape {
        path: path.to_path_buf(),
        source,
    })
}

impl FrameReader for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<SequenceMetadata, Box<dyn std::error::Error>> {
        let paths = list_images(path)?;
        let first = paths
            .first()
            .ok_or_else(|| FrameReadError::Empty(path.to_path_buf()))?;
        let (width, height) =
            image::image_dimensions(first).map_err(|source| FrameReadError::Decode {
                path: first.clone(),
                source,
            })?;

        log::debug!("Found {} frames in {}", paths.len(), path.display());
        let metadata = SequenceMetadata {
            width,
            height,
            fps: self.fps,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        self.paths = Some(paths);
        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(paths) = self.paths.take() else {
            return Box::new(std::iter::once(Err(FrameReadError::NotOpened.into())));
        };
        Box::new(
            paths
                .into_iter()
                .enumerate()
                .map(|(i, p)| decode(&p, i).map_err(Into::into)),
        )
    }

    fn close(&mut self) {
        self.paths = None;
    }
}

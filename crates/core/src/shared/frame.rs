use ndarray::{Array3, ArrayView3, ShapeError};

/// A single captured camera frame: interleaved pixel bytes in row-major
/// order, shaped `(height, width, channels)`.
///
/// Frames are owned by the caller; the estimator only borrows them long
/// enough to cut out the forehead region.
#[derive(Clone, Debug)]
pub struct Frame {
    pixels: Array3<u8>,
    index: usize,
}

impl Frame {
    /// Wraps raw bytes. Fails when `data.len() != width * height * channels`.
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        index: usize,
    ) -> Result<Self, ShapeError> {
        let pixels = Array3::from_shape_vec(
            (height as usize, width as usize, channels as usize),
            data,
        )?;
        Ok(Self { pixels, index })
    }

    pub fn from_array(pixels: Array3<u8>, index: usize) -> Self {
        Self { pixels, index }
    }

    pub fn width(&self) -> u32 {
        self.pixels.shape()[1] as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.shape()[0] as u32
    }

    pub fn channels(&self) -> u8 {
        self.pixels.shape()[2] as u8
    }

    /// Position of the frame in the capture sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }
}

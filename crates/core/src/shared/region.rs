use serde::{Deserialize, Serialize};

/// Face bounding box reported by an external detector, in pixel coordinates.
///
/// Coordinates may lie partially outside the frame; cropping clamps them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceRegion {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn has_positive_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Forehead band: middle third horizontally, from 1/8 to 1/4 of the
    /// face height vertically.
    ///
    /// Returns `None` when the box has no area or its corners overflow `i32`.
    pub fn forehead(&self) -> Option<ForeheadRoi> {
        if !self.has_positive_size() {
            return None;
        }
        let (w, h) = (self.width, self.height);
        Some(ForeheadRoi {
            x1: self.x.checked_add(w / 3)?,
            y1: self.y.checked_add(h / 8)?,
            x2: self.x.checked_add(w - w / 3)?,
            y2: self.y.checked_add(h / 4)?,
        })
    }
}

/// Half-open pixel rectangle `[x1, x2) x [y1, y2)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeheadRoi {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ForeheadRoi {
    pub fn is_degenerate(&self) -> bool {
        self.x1 >= self.x2 || self.y1 >= self.y2
    }

    /// Intersects the rectangle with a `width x height` frame.
    ///
    /// Returns `(row_range, col_range)` as `usize` bounds, or `None` if the
    /// intersection is empty.
    pub fn clamp_to(
        &self,
        width: u32,
        height: u32,
    ) -> Option<(std::ops::Range<usize>, std::ops::Range<usize>)> {
        let clamp = |v: i32, max: u32| v.clamp(0, max as i32) as usize;
        let rows = clamp(self.y1, height)..clamp(self.y2, height);
        let cols = clamp(self.x1, width)..clamp(self.x2, width);
        if rows.is_empty() || cols.is_empty() {
            None
        } else {
            Some((rows, cols))
        }
    }
}

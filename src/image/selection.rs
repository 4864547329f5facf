//! Selection rectangles used to cut templates out of a source raster.

use crate::image::Raster;
use crate::util::{ConvMatchError, ConvMatchResult};

/// Smallest template side accepted when a selection is confirmed.
pub const MIN_SELECTION_SIZE: usize = 3;

/// Axis-aligned rectangle in raster coordinates.
///
/// A selection built by [`Selection::from_drag`] always lies inside the
/// image it was built for; the minimum size is only enforced by
/// [`Selection::confirm`], so an in-progress drag may be smaller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Selection {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds the rectangle spanned by a drag from `start` to `end`.
    ///
    /// Both corners are inclusive. The drag must start inside the image
    /// (otherwise `None`); the end may lie anywhere. Both corners are clamped
    /// into the image before the size is taken, so the rectangle never
    /// extends past the start corner.
    pub fn from_drag(
        start: (i64, i64),
        end: (i64, i64),
        img_width: usize,
        img_height: usize,
    ) -> Option<Self> {
        if img_width == 0 || img_height == 0 {
            return None;
        }
        let (img_w, img_h) = (img_width as i64, img_height as i64);
        if start.0 < 0 || start.0 >= img_w || start.1 < 0 || start.1 >= img_h {
            return None;
        }

        let x0 = start.0.min(end.0).clamp(0, img_w - 1);
        let x1 = start.0.max(end.0).clamp(0, img_w - 1);
        let y0 = start.1.min(end.1).clamp(0, img_h - 1);
        let y1 = start.1.max(end.1).clamp(0, img_h - 1);

        Some(Self::new(
            x0 as usize,
            y0 as usize,
            (x1 - x0 + 1) as usize,
            (y1 - y0 + 1) as usize,
        ))
    }

    /// Accepts the selection if both sides reach [`MIN_SELECTION_SIZE`].
    pub fn confirm(self) -> ConvMatchResult<Self> {
        if self.width < MIN_SELECTION_SIZE || self.height < MIN_SELECTION_SIZE {
            return Err(ConvMatchError::SelectionTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_SELECTION_SIZE,
            });
        }
        Ok(self)
    }

    /// Copies the selected pixels out of `source`.
    pub fn extract(&self, source: &Raster) -> ConvMatchResult<Raster> {
        source.extract_region(self.x, self.y, self.width, self.height)
    }
}

//! Single-channel luminosity planes used by template matching.
//!
//! Values are `0.299 R + 0.587 G + 0.114 B` stored as `f32` without rounding;
//! the metric kernels widen them to `f64` while accumulating.

use crate::image::Raster;
use crate::util::math::luminosity;

/// Owned contiguous luminosity plane.
#[derive(Clone, Debug, PartialEq)]
pub struct LumaPlane {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl LumaPlane {
    /// Converts every pixel of `raster` to its luminosity.
    pub fn from_raster(raster: &Raster) -> Self {
        let data = raster
            .as_bytes()
            .chunks_exact(4)
            .map(|px| luminosity(px[0], px[1], px[2]) as f32)
            .collect();
        Self {
            data,
            width: raster.width(),
            height: raster.height(),
        }
    }

    /// Returns the plane width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the plane height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the luminosity values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Copies the `width x height` patch at `(x, y)` in row-major order.
    ///
    /// Returns `None` when the patch does not fit inside the plane.
    pub fn patch(&self, x: usize, y: usize, width: usize, height: usize) -> Option<Vec<f32>> {
        if x.checked_add(width)? > self.width || y.checked_add(height)? > self.height {
            return None;
        }
        let mut out = Vec::with_capacity(width * height);
        for row in y..y + height {
            out.extend_from_slice(&self.row(row)?[x..x + width]);
        }
        Some(out)
    }
}

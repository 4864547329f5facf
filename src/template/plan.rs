//! Precomputed template statistics.

use crate::image::luma::LumaPlane;
use crate::image::Raster;

/// Luminosity plane of a template plus its mean and population standard
/// deviation.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplatePlan {
    luma: LumaPlane,
    mean: f64,
    std_dev: f64,
}

impl TemplatePlan {
    /// Builds a plan from an RGBA template.
    pub fn from_raster(tpl: &Raster) -> Self {
        Self::from_luma(LumaPlane::from_raster(tpl))
    }

    /// Builds a plan from an existing luminosity plane.
    pub fn from_luma(luma: LumaPlane) -> Self {
        let mean = mean(luma.as_slice());
        let std_dev = std_dev(luma.as_slice(), mean);
        Self {
            luma,
            mean,
            std_dev,
        }
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.luma.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.luma.height()
    }

    /// Number of template pixels.
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Always false; rasters are never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Luminosity values in row-major order.
    pub fn values(&self) -> &[f32] {
        self.luma.as_slice()
    }

    /// Mean luminosity.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation of the luminosity.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

/// Arithmetic mean accumulated in `f64`.
pub(crate) fn mean(values: &[f32]) -> f64 {
    let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
    sum / values.len() as f64
}

/// Population standard deviation around a known mean.
pub(crate) fn std_dev(values: &[f32], mean: f64) -> f64 {
    let mut variance = 0.0f64;
    for &v in values {
        let diff = f64::from(v) - mean;
        variance += diff * diff;
    }
    (variance / values.len() as f64).sqrt()
}

//! Per-pixel point operations.
//!
//! Each operation maps one source pixel to one output pixel without looking
//! at neighbours. The full-image functions and [`calculate_at_pixel`] run the
//! same [`PointOp::map`], so the traced result always equals the matching
//! pixel of [`apply`]. Alpha is preserved in every operation.

use crate::image::{Raster, Rgba};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{clamp, luminosity, round_channel};
use crate::util::ConvMatchResult;

mod formula;

/// Channel reduction used by grayscale conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrayscaleMethod {
    /// `0.299 R + 0.587 G + 0.114 B`.
    #[default]
    Luminosity,
    /// `(R + G + B) / 3`.
    Average,
    /// `(max(R, G, B) + min(R, G, B)) / 2`.
    Lightness,
}

impl GrayscaleMethod {
    /// Unrounded gray level of `pixel`.
    pub fn gray(self, pixel: Rgba) -> f64 {
        let (r, g, b) = (pixel.r, pixel.g, pixel.b);
        match self {
            GrayscaleMethod::Luminosity => luminosity(r, g, b),
            GrayscaleMethod::Average => (f64::from(r) + f64::from(g) + f64::from(b)) / 3.0,
            GrayscaleMethod::Lightness => {
                let max = r.max(g).max(b);
                let min = r.min(g).min(b);
                (f64::from(max) + f64::from(min)) / 2.0
            }
        }
    }
}

/// A point operation together with its parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointOp {
    /// Gray level replicated to R, G and B.
    Grayscale { method: GrayscaleMethod },
    /// Adds `amount` to each color channel, saturating at 0 and 255.
    Brightness { amount: i32 },
    /// Scales each color channel around mid-gray 128 by `factor`.
    Contrast { factor: f64 },
    /// White when the unrounded luminosity is strictly above `threshold`.
    Threshold { threshold: f64 },
    /// `255 - channel` for R, G and B.
    Invert,
}

impl Default for PointOp {
    fn default() -> Self {
        PointOp::Grayscale {
            method: GrayscaleMethod::default(),
        }
    }
}

impl PointOp {
    /// Brightness at its neutral amount of 0.
    pub const DEFAULT_BRIGHTNESS: PointOp = PointOp::Brightness { amount: 0 };
    /// Contrast at its neutral factor of 1.
    pub const DEFAULT_CONTRAST: PointOp = PointOp::Contrast { factor: 1.0 };
    /// Threshold at mid-gray 128.
    pub const DEFAULT_THRESHOLD: PointOp = PointOp::Threshold { threshold: 128.0 };

    /// Stable snake_case name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            PointOp::Grayscale { .. } => "grayscale",
            PointOp::Brightness { .. } => "brightness",
            PointOp::Contrast { .. } => "contrast",
            PointOp::Threshold { .. } => "threshold",
            PointOp::Invert => "invert",
        }
    }

    /// Applies the operation to one pixel.
    pub fn map(&self, pixel: Rgba) -> Rgba {
        let a = pixel.a;
        match *self {
            PointOp::Grayscale { method } => {
                let gray = round_channel(method.gray(pixel));
                Rgba::new(gray, gray, gray, a)
            }
            PointOp::Brightness { amount } => {
                let shift = |c: u8| clamp(i32::from(c).saturating_add(amount), 0, 255) as u8;
                Rgba::new(shift(pixel.r), shift(pixel.g), shift(pixel.b), a)
            }
            PointOp::Contrast { factor } => {
                let stretch = |c: u8| round_channel((f64::from(c) - 128.0) * factor + 128.0);
                Rgba::new(stretch(pixel.r), stretch(pixel.g), stretch(pixel.b), a)
            }
            PointOp::Threshold { threshold } => {
                let value = if luminosity(pixel.r, pixel.g, pixel.b) > threshold {
                    255
                } else {
                    0
                };
                Rgba::new(value, value, value, a)
            }
            PointOp::Invert => Rgba::new(255 - pixel.r, 255 - pixel.g, 255 - pixel.b, a),
        }
    }
}

/// Input, output and a readable formula of one point-operation evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct PointTrace {
    pub input: Rgba,
    pub result: Rgba,
    /// Formula with the actual operands substituted.
    pub formula: String,
}

/// Applies `op` to every pixel of `source`.
pub fn apply(source: &Raster, op: &PointOp) -> Raster {
    let (width, height) = (source.width(), source.height());
    let _span = trace_span!("point_op", op = op.name(), width = width, height = height).entered();

    let mut out = source.blank_like();
    for y in 0..height {
        for x in 0..width {
            out.put(x, y, op.map(source.pixel(x, y)));
        }
    }
    trace_event!("point_op_done", pixels = width * height);
    out
}

/// Re-evaluates `op` at `(x, y)` and explains the arithmetic.
pub fn calculate_at_pixel(
    source: &Raster,
    op: &PointOp,
    x: usize,
    y: usize,
) -> ConvMatchResult<PointTrace> {
    let input = source
        .get_pixel(x, y)
        .ok_or_else(|| source.point_out_of_bounds(x, y))?;
    let result = op.map(input);
    Ok(PointTrace {
        input,
        result,
        formula: formula::describe(op, input, result),
    })
}

/// Grayscale conversion with the given method.
pub fn to_grayscale(source: &Raster, method: GrayscaleMethod) -> Raster {
    apply(source, &PointOp::Grayscale { method })
}

/// Brightness shift by `amount`.
pub fn adjust_brightness(source: &Raster, amount: i32) -> Raster {
    apply(source, &PointOp::Brightness { amount })
}

/// Contrast stretch by `factor` around 128.
pub fn adjust_contrast(source: &Raster, factor: f64) -> Raster {
    apply(source, &PointOp::Contrast { factor })
}

/// Binary threshold on luminosity.
pub fn apply_threshold(source: &Raster, threshold: f64) -> Raster {
    apply(source, &PointOp::Threshold { threshold })
}

/// Color inversion.
pub fn invert_colors(source: &Raster) -> Raster {
    apply(source, &PointOp::Invert)
}

//! Dense 2D convolution with zero-padded borders.
//!
//! For every output pixel `(x, y)` the engine sums
//! `source[x + kx - offset, y + ky - offset] * kernel[ky][kx]` over all taps,
//! independently for R, G and B. Taps that fall outside the image are
//! skipped entirely; they add nothing to the sum and produce no trace entry.
//! Alpha is copied from the source pixel at `(x, y)`.
//!
//! The full pass and [`calculate_at_pixel`] share one accumulation routine,
//! so the traced result at a coordinate always equals the corresponding
//! pixel of [`apply_kernel`].

use crate::image::{Position, Raster, Rgb, Rgba};
use crate::kernel::{Kernel, Preset};
use crate::trace::{trace_event, trace_span};
use crate::util::math::round_channel;
use crate::util::ConvMatchResult;

/// One in-bounds tap of a traced convolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConvolutionTap {
    /// Source pixel under the tap.
    pub pixel: Rgba,
    /// Weight applied to it, after normalization.
    pub kernel_value: f64,
    /// Source coordinate of the tap.
    pub position: Position,
}

/// Arithmetic of one output pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvolutionTrace {
    /// Rounded and clamped output channels.
    pub result: Rgb,
    /// In-bounds taps in kernel row-major order.
    pub steps: Vec<ConvolutionTap>,
    /// Kernel that was applied (normalized if requested).
    pub kernel: Kernel,
}

/// Convolves every pixel of `source` with `kernel`.
pub fn apply_kernel(source: &Raster, kernel: &Kernel, normalize: bool) -> Raster {
    let (width, height) = (source.width(), source.height());
    let _span = trace_span!(
        "convolve",
        width = width,
        height = height,
        kernel_size = kernel.size(),
        normalize = normalize
    )
    .entered();

    let kernel = kernel.prepared(normalize);
    let mut out = source.blank_like();
    for y in 0..height {
        for x in 0..width {
            let sums = accumulate(source, &kernel, x, y, |_| {});
            out.put(x, y, to_pixel(sums).with_alpha(source.pixel(x, y).a));
        }
    }

    trace_event!("convolve_done", taps = kernel.size() * kernel.size());
    out
}

/// Recomputes one output pixel of [`apply_kernel`] and records every tap.
///
/// Fails with `OutOfBounds` when `(x, y)` is not a pixel of `source`.
pub fn calculate_at_pixel(
    source: &Raster,
    kernel: &Kernel,
    x: usize,
    y: usize,
    normalize: bool,
) -> ConvMatchResult<ConvolutionTrace> {
    if !source.contains(x, y) {
        return Err(source.point_out_of_bounds(x, y));
    }
    Ok(trace_at(source, &kernel.prepared(normalize), x, y))
}

/// Traced accumulation with an already prepared kernel and an in-bounds
/// coordinate.
pub(crate) fn trace_at(source: &Raster, kernel: &Kernel, x: usize, y: usize) -> ConvolutionTrace {
    let mut steps = Vec::with_capacity(kernel.size() * kernel.size());
    let sums = accumulate(source, kernel, x, y, |tap| steps.push(tap));
    ConvolutionTrace {
        result: to_pixel(sums),
        steps,
        kernel: kernel.clone(),
    }
}

/// Gradient magnitude `sqrt(gx^2 + gy^2)` of the two fixed Sobel kernels,
/// per channel.
///
/// Uses the same zero-padding rule as [`apply_kernel`]. No normalization is
/// involved.
pub fn apply_sobel_combined(source: &Raster) -> Raster {
    let (width, height) = (source.width(), source.height());
    let _span = trace_span!("sobel_combined", width = width, height = height).entered();

    let sobel_x = Preset::SobelHorizontal.kernel();
    let sobel_y = Preset::SobelVertical.kernel();
    let mut out = source.blank_like();
    for y in 0..height {
        for x in 0..width {
            let gx = accumulate(source, &sobel_x, x, y, |_| {});
            let gy = accumulate(source, &sobel_y, x, y, |_| {});
            let mut magnitude = [0.0f64; 3];
            for (m, (a, b)) in magnitude.iter_mut().zip(gx.iter().zip(gy.iter())) {
                *m = (a * a + b * b).sqrt();
            }
            out.put(x, y, to_pixel(magnitude).with_alpha(source.pixel(x, y).a));
        }
    }
    trace_event!("sobel_combined_done", pixels = width * height);
    out
}

fn accumulate(
    source: &Raster,
    kernel: &Kernel,
    x: usize,
    y: usize,
    mut visit: impl FnMut(ConvolutionTap),
) -> [f64; 3] {
    let size = kernel.size();
    let offset = kernel.offset();
    let weights = kernel.weights();
    let mut sums = [0.0f64; 3];

    for ky in 0..size {
        let Some(py) = (y + ky).checked_sub(offset) else {
            continue;
        };
        if py >= source.height() {
            continue;
        }
        for kx in 0..size {
            let Some(px) = (x + kx).checked_sub(offset) else {
                continue;
            };
            if px >= source.width() {
                continue;
            }
            let pixel = source.pixel(px, py);
            let kernel_value = weights[ky * size + kx];
            sums[0] += f64::from(pixel.r) * kernel_value;
            sums[1] += f64::from(pixel.g) * kernel_value;
            sums[2] += f64::from(pixel.b) * kernel_value;
            visit(ConvolutionTap {
                pixel,
                kernel_value,
                position: Position::new(px, py),
            });
        }
    }
    sums
}

fn to_pixel(sums: [f64; 3]) -> Rgb {
    Rgb::new(
        round_channel(sums[0]),
        round_channel(sums[1]),
        round_channel(sums[2]),
    )
}

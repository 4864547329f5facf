//! Closed dispatch over every engine.
//!
//! An [`Operation`] carries the engine choice together with its parameters.
//! [`process`] runs the full-image pass and [`trace_at`] the traced single-point
//! path for the same operation.

use crate::convolve::{self, ConvolutionTrace};
use crate::image::Raster;
use crate::kernel::Kernel;
use crate::metric::Metric;
use crate::point::{self, PointOp, PointTrace};
use crate::search::{self, MatchTrace};
use crate::util::ConvMatchResult;

/// Engine selection plus parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Generic convolution with an optional normalization step.
    Convolve { kernel: Kernel, normalize: bool },
    /// Sobel gradient magnitude with the fixed 3x3 kernels.
    SobelCombined,
    /// Per-pixel operation.
    Point(PointOp),
    /// Template matching heat map.
    Match { template: Raster, metric: Metric },
}

impl Operation {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Convolve { .. } => "convolve",
            Operation::SobelCombined => "sobel_combined",
            Operation::Point(op) => op.name(),
            Operation::Match { metric, .. } => metric.name(),
        }
    }
}

/// Trace returned by [`trace_at`].
#[derive(Clone, Debug, PartialEq)]
pub enum OperationTrace {
    Convolution(ConvolutionTrace),
    Point(PointTrace),
    Match(MatchTrace),
}

/// Runs the full-image pass of `op` over `source`.
pub fn process(source: &Raster, op: &Operation) -> ConvMatchResult<Raster> {
    match op {
        Operation::Convolve { kernel, normalize } => {
            Ok(convolve::apply_kernel(source, kernel, *normalize))
        }
        Operation::SobelCombined => Ok(convolve::apply_sobel_combined(source)),
        Operation::Point(op) => Ok(point::apply(source, op)),
        Operation::Match { template, metric } => {
            search::match_template(source, template, *metric)
        }
    }
}

/// Traces `op` at `(x, y)`.
///
/// Sobel has no traced path and yields `Ok(None)`. Point and convolution
/// traces fail with `OutOfBounds` outside the source; template offsets
/// outside the valid grid yield the invalid-position sentinel.
pub fn trace_at(
    source: &Raster,
    op: &Operation,
    x: usize,
    y: usize,
) -> ConvMatchResult<Option<OperationTrace>> {
    let trace = match op {
        Operation::Convolve { kernel, normalize } => OperationTrace::Convolution(
            convolve::calculate_at_pixel(source, kernel, x, y, *normalize)?,
        ),
        Operation::SobelCombined => return Ok(None),
        Operation::Point(op) => OperationTrace::Point(point::calculate_at_pixel(source, op, x, y)?),
        Operation::Match { template, metric } => {
            OperationTrace::Match(search::match_at_offset(source, template, *metric, x, y))
        }
    };
    Ok(Some(trace))
}

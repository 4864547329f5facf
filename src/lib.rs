//! ConvMatch runs dense convolution, per-pixel point operations and template
//! matching over RGBA rasters, and can explain any single output value.
//!
//! Every engine has two entry points: a full-image pass that returns a new
//! [`Raster`], and a traced single-point path that recomputes one output
//! value together with the arithmetic behind it. Both paths share the same
//! accumulation code, so a traced value always equals the corresponding
//! pixel of the full pass. The [`progressive`] passes build on the traced
//! paths to fill an output buffer one coordinate at a time.
//!
//! Engines are single-threaded and perform no I/O. Decoding and encoding
//! image files is available behind the `image-io` feature, and the `tracing`
//! feature emits spans around every full-image pass.

pub mod candidate;
pub mod convolve;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod metric;
pub mod operation;
pub mod point;
pub mod progressive;
pub mod search;
pub mod template;
mod trace;
pub mod util;

pub use candidate::{MatchFilter, MatchPeak};
pub use convolve::{ConvolutionTap, ConvolutionTrace};
pub use crate::image::selection::{Selection, MIN_SELECTION_SIZE};
pub use crate::image::{Position, Raster, Rgb, Rgba};
pub use kernel::{Kernel, Preset};
pub use metric::Metric;
pub use operation::{process, trace_at, Operation, OperationTrace};
pub use point::{GrayscaleMethod, PointOp, PointTrace};
pub use progressive::{ConvolutionPass, MatchPass, Step};
pub use search::{MatchTap, MatchTrace, ScoreMap, TemplateBounds};
pub use util::{ConvMatchError, ConvMatchResult};

pub use convolve::apply_kernel as convolve;
pub use convolve::apply_sobel_combined as convolve_sobel_combined;
pub use convolve::calculate_at_pixel as convolve_at_point;
pub use crate::image::extract_region;
pub use point::apply as apply_point_op;
pub use point::calculate_at_pixel as point_op_at_pixel;
pub use search::{match_at_offset, match_template};

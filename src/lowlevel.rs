//! Low-level building blocks for custom matching pipelines.
//!
//! These expose the luminosity planes, template statistics and metric
//! kernels behind [`crate::ScoreMap`]. Reusing one plane across several
//! metrics or templates avoids repeating the luminosity conversion.

pub use crate::image::luma::LumaPlane;
pub use crate::metric::scalar::{NccScalar, SadScalar, SsdScalar};
pub use crate::metric::{ncc_display, valid_grid, MetricKernel};
pub use crate::template::TemplatePlan;
pub use crate::util::math::{luminosity, round_channel};

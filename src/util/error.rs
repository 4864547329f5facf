//! Error types for convmatch.

use thiserror::Error;

/// Result alias for convmatch operations.
pub type ConvMatchResult<T> = std::result::Result<T, ConvMatchError>;

/// Errors raised by the raster primitives and the processing engines.
///
/// A failing full-image pass never yields a partial raster. Degenerate
/// numeric cases (flat NCC windows, zero-sum kernels, constant SSD/SAD
/// score grids) are not errors; they resolve to documented fallback values.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConvMatchError {
    /// Raster dimensions are zero or overflow the address space.
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The RGBA byte buffer does not hold exactly `width * height * 4` bytes.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },
    /// A region or coordinate falls outside the raster.
    #[error(
        "region out of bounds: x={x}, y={y}, width={width}, height={height}, image={img_width}x{img_height}"
    )]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The kernel matrix is empty, ragged, non-square or even-sized.
    #[error("invalid kernel: {reason}")]
    InvalidKernel { reason: &'static str },
    /// The template is larger than the source in at least one dimension.
    #[error(
        "template {template_width}x{template_height} does not fit in source {img_width}x{img_height}"
    )]
    InvalidTemplateSize {
        template_width: usize,
        template_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A confirmed selection is smaller than the minimum template size.
    #[error("selection {width}x{height} is smaller than the {min}x{min} minimum")]
    SelectionTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    /// Decoding or encoding an image file failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}

//! RGBA rasters, luminosity planes and region helpers.
//!
//! `Raster` owns a row-major buffer of interleaved 8-bit RGBA samples with
//! `data.len() == width * height * 4`. Every engine reads its input through
//! a shared reference and returns a freshly allocated output, so no buffer is
//! aliased across engine calls. Accessors are bounds-checked and return
//! `Option`/`Result`; the crate-internal fast paths index directly after the
//! caller has established the coordinate is in range.

use crate::util::{ConvMatchError, ConvMatchResult};

pub mod luma;
pub mod selection;
pub mod synth;

#[cfg(feature = "image-io")]
pub mod io;

/// One RGBA pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Builds a pixel from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray pixel with all color channels set to `value`.
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value, 255)
    }

    /// Drops the alpha channel.
    pub const fn rgb(self) -> Rgb {
        Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color channels of a pixel without alpha.
///
/// Converting into [`Rgba`] yields an opaque pixel, which is how
/// [`Raster::set_pixel`] treats writes that omit alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Builds a color from its three channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attaches an explicit alpha value.
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba::new(self.r, self.g, self.b, a)
    }
}

impl From<Rgb> for Rgba {
    fn from(value: Rgb) -> Self {
        value.with_alpha(255)
    }
}

/// Pixel coordinate in a raster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Owned RGBA8 raster in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Creates a fully transparent black raster.
    pub fn new(width: usize, height: usize) -> ConvMatchResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            data: vec![0u8; len],
            width,
            height,
        })
    }

    /// Creates a raster with every pixel set to `pixel`.
    pub fn filled(width: usize, height: usize, pixel: Rgba) -> ConvMatchResult<Self> {
        let len = byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..width * height {
            data.extend_from_slice(&[pixel.r, pixel.g, pixel.b, pixel.a]);
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Wraps an interleaved RGBA buffer, validating its length.
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> ConvMatchResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(ConvMatchError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Transparent black raster with the same dimensions as `self`.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            data: vec![0u8; self.data.len()],
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the interleaved RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster and returns its RGBA bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns true when `(x, y)` addresses a pixel of this raster.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        self.contains(x, y).then(|| self.pixel(x, y))
    }

    /// Writes `pixel` at `(x, y)`; an [`Rgb`] argument is stored opaque.
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: impl Into<Rgba>) -> ConvMatchResult<()> {
        if !self.contains(x, y) {
            return Err(self.point_out_of_bounds(x, y));
        }
        self.put(x, y, pixel.into());
        Ok(())
    }

    /// Copies the `width x height` region at `(x, y)` into a new raster.
    ///
    /// Bounds are validated before dimensions, so a zero-sized region that
    /// starts inside the raster reports `InvalidDimensions`.
    pub fn extract_region(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> ConvMatchResult<Raster> {
        let out_of_bounds = ConvMatchError::OutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }
        if width == 0 || height == 0 {
            return Err(ConvMatchError::InvalidDimensions { width, height });
        }

        let mut data = Vec::with_capacity(width * height * 4);
        for row in y..end_y {
            let start = (row * self.width + x) * 4;
            data.extend_from_slice(&self.data[start..start + width * 4]);
        }
        Raster::from_rgba(data, width, height)
    }

    /// Unchecked read; callers guarantee `(x, y)` is in bounds.
    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> Rgba {
        let idx = (y * self.width + x) * 4;
        Rgba::new(
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Unchecked write; callers guarantee `(x, y)` is in bounds.
    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, pixel: Rgba) {
        let idx = (y * self.width + x) * 4;
        self.data[idx] = pixel.r;
        self.data[idx + 1] = pixel.g;
        self.data[idx + 2] = pixel.b;
        self.data[idx + 3] = pixel.a;
    }

    pub(crate) fn point_out_of_bounds(&self, x: usize, y: usize) -> ConvMatchError {
        ConvMatchError::OutOfBounds {
            x,
            y,
            width: 1,
            height: 1,
            img_width: self.width,
            img_height: self.height,
        }
    }
}

/// Free-function form of [`Raster::extract_region`].
pub fn extract_region(
    source: &Raster,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> ConvMatchResult<Raster> {
    source.extract_region(x, y, width, height)
}

fn byte_len(width: usize, height: usize) -> ConvMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(ConvMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(4))
        .ok_or(ConvMatchError::InvalidDimensions { width, height })
}

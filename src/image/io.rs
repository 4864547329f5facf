//! Loading and exporting rasters via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Loaded images are
//! capped at [`MAX_LOAD_SIZE`] on either side; PNG export is lossless so
//! engine outputs round-trip exactly.

use crate::image::Raster;
use crate::util::{ConvMatchError, ConvMatchResult};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;

/// Largest side length kept when decoding an image from disk.
pub const MAX_LOAD_SIZE: usize = 512;

/// Working-size menu offered to the presentation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageSize {
    /// 32x32, small enough to follow every pixel of an animation.
    #[default]
    Tiny,
    /// 64x64.
    Small,
    /// 128x128.
    Medium,
    /// 256x256.
    Large,
    /// Keep the loaded dimensions.
    Original,
}

impl ImageSize {
    /// Square side length of the target box, `None` for [`ImageSize::Original`].
    pub fn target(self) -> Option<usize> {
        match self {
            ImageSize::Tiny => Some(32),
            ImageSize::Small => Some(64),
            ImageSize::Medium => Some(128),
            ImageSize::Large => Some(256),
            ImageSize::Original => None,
        }
    }
}

/// Converts a decoded image to an RGBA raster.
pub fn raster_from_dynamic(img: &DynamicImage) -> ConvMatchResult<Raster> {
    let rgba = img.to_rgba8();
    raster_from_rgba_image(rgba)
}

/// Converts a raster into an `image` RGBA buffer.
pub fn raster_to_rgba_image(raster: &Raster) -> ConvMatchResult<RgbaImage> {
    let width = dim_u32(raster.width())?;
    let height = dim_u32(raster.height())?;
    RgbaImage::from_raw(width, height, raster.as_bytes().to_vec()).ok_or_else(|| {
        ConvMatchError::ImageIo {
            reason: "raster buffer does not match its dimensions".to_string(),
        }
    })
}

/// Decodes an image from disk, converting to RGBA and downscaling to fit
/// within [`MAX_LOAD_SIZE`].
pub fn load_raster<P: AsRef<Path>>(path: P) -> ConvMatchResult<Raster> {
    let img = image::open(path).map_err(|err| ConvMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    let (width, height) = (img.width() as usize, img.height() as usize);
    let (fit_w, fit_h) = fit_within(width, height, MAX_LOAD_SIZE, MAX_LOAD_SIZE);
    if (fit_w, fit_h) == (width, height) {
        return raster_from_dynamic(&img);
    }
    let resized = img.resize_exact(dim_u32(fit_w)?, dim_u32(fit_h)?, FilterType::Triangle);
    raster_from_dynamic(&resized)
}

/// Writes `raster` as a PNG file.
pub fn save_png<P: AsRef<Path>>(raster: &Raster, path: P) -> ConvMatchResult<()> {
    let img = raster_to_rgba_image(raster)?;
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|err| ConvMatchError::ImageIo {
            reason: err.to_string(),
        })
}

/// Dimensions after shrinking `width x height` to fit the box, never
/// enlarging and preserving aspect ratio with floor rounding. Sides never
/// drop below one pixel.
pub fn fit_within(width: usize, height: usize, max_w: usize, max_h: usize) -> (usize, usize) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    (
        ((width as f64 * scale).floor() as usize).max(1),
        ((height as f64 * scale).floor() as usize).max(1),
    )
}

/// Rescales `raster` to fit the menu's square box, up or down, with
/// nearest-neighbour sampling. `Original` returns an unchanged copy.
pub fn resize_to_target(raster: &Raster, size: ImageSize) -> ConvMatchResult<Raster> {
    let Some(target) = size.target() else {
        return Ok(raster.clone());
    };
    let (width, height) = (raster.width(), raster.height());
    let scale = (target as f64 / width as f64).min(target as f64 / height as f64);
    let new_w = ((width as f64 * scale).floor() as usize).max(1);
    let new_h = ((height as f64 * scale).floor() as usize).max(1);
    if (new_w, new_h) == (width, height) {
        return Ok(raster.clone());
    }

    let img = raster_to_rgba_image(raster)?;
    let resized = image::imageops::resize(&img, dim_u32(new_w)?, dim_u32(new_h)?, FilterType::Nearest);
    raster_from_rgba_image(resized)
}

fn raster_from_rgba_image(img: RgbaImage) -> ConvMatchResult<Raster> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Raster::from_rgba(img.into_raw(), width, height)
}

fn dim_u32(value: usize) -> ConvMatchResult<u32> {
    u32::try_from(value).map_err(|_| ConvMatchError::ImageIo {
        reason: format!("dimension {value} exceeds u32"),
    })
}

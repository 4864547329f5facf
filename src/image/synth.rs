//! Synthetic sample rasters.

use crate::image::{Raster, Rgba};
use crate::util::ConvMatchResult;

/// Red ramps left to right, green ramps top to bottom, blue is fixed at 128.
pub fn gradient(width: usize, height: usize) -> ConvMatchResult<Raster> {
    let mut out = Raster::new(width, height)?;
    for y in 0..height {
        let g = ramp(y, height);
        for x in 0..width {
            out.put(x, y, Rgba::new(ramp(x, width), g, 128, 255));
        }
    }
    Ok(out)
}

/// Black and white squares of side `square`; the top-left square is white.
pub fn checkerboard(width: usize, height: usize, square: usize) -> ConvMatchResult<Raster> {
    let square = square.max(1);
    let mut out = Raster::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let white = (x / square + y / square) % 2 == 0;
            out.put(x, y, Rgba::gray(if white { 255 } else { 0 }));
        }
    }
    Ok(out)
}

fn ramp(pos: usize, extent: usize) -> u8 {
    ((pos as f64 / extent as f64) * 255.0).round_ties_even() as u8
}

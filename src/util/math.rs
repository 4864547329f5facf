//! Numeric helpers shared by the engines.

/// Luminosity weight of the red channel.
pub const LUMA_R: f64 = 0.299;
/// Luminosity weight of the green channel.
pub const LUMA_G: f64 = 0.587;
/// Luminosity weight of the blue channel.
pub const LUMA_B: f64 = 0.114;

/// Clamps `value` into `[lo, hi]`.
///
/// Unlike `Ord::clamp` this accepts floats and never panics when `lo > hi`;
/// the upper bound wins in that case.
pub fn clamp<T: PartialOrd>(value: T, lo: T, hi: T) -> T {
    let lower = if value < lo { lo } else { value };
    if lower > hi {
        hi
    } else {
        lower
    }
}

/// Rounds half away from zero and clamps into the 8-bit channel range.
pub fn round_channel(value: f64) -> u8 {
    clamp(value.round(), 0.0, 255.0) as u8
}

/// Perceptual luminosity `0.299 R + 0.587 G + 0.114 B`, unrounded.
pub fn luminosity(r: u8, g: u8, b: u8) -> f64 {
    LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b)
}

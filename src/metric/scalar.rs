//! Scalar kernels for score evaluation.

use crate::image::luma::LumaPlane;
use crate::metric::{fits, MetricKernel};
use crate::template::TemplatePlan;

/// Scalar zero-mean normalized cross-correlation.
pub struct NccScalar;

/// Scalar sum of squared differences.
pub struct SsdScalar;

/// Scalar sum of absolute differences.
pub struct SadScalar;

/// Intermediate NCC quantities of one placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NccParts {
    pub(crate) patch_mean: f64,
    pub(crate) patch_std: f64,
    pub(crate) score: f64,
}

impl NccScalar {
    /// Computes patch statistics and the NCC score. Callers guarantee the
    /// placement fits.
    ///
    /// A flat patch or a flat template scores exactly `0`.
    pub(crate) fn parts(image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> NccParts {
        let n = tpl.len() as f64;

        let mut sum = 0.0f64;
        for_each_pair(image, tpl, x, y, |v, _| sum += v);
        let patch_mean = sum / n;

        let mut variance = 0.0f64;
        for_each_pair(image, tpl, x, y, |v, _| {
            let diff = v - patch_mean;
            variance += diff * diff;
        });
        let patch_std = (variance / n).sqrt();

        let tpl_mean = tpl.mean();
        let tpl_std = tpl.std_dev();
        let score = if patch_std > 0.0 && tpl_std > 0.0 {
            let mut correlation = 0.0f64;
            for_each_pair(image, tpl, x, y, |v, t| {
                correlation += (v - patch_mean) * (t - tpl_mean);
            });
            correlation / (patch_std * tpl_std * n)
        } else {
            0.0
        };

        NccParts {
            patch_mean,
            patch_std,
            score,
        }
    }
}

impl MetricKernel for NccScalar {
    fn score_at(image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> f64 {
        if !fits(image, tpl, x, y) {
            return 0.0;
        }
        Self::parts(image, tpl, x, y).score
    }
}

impl MetricKernel for SsdScalar {
    fn score_at(image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> f64 {
        if !fits(image, tpl, x, y) {
            return 0.0;
        }
        let mut sse = 0.0f64;
        for_each_pair(image, tpl, x, y, |v, t| {
            let diff = v - t;
            sse += diff * diff;
        });
        sse
    }
}

impl MetricKernel for SadScalar {
    fn score_at(image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> f64 {
        if !fits(image, tpl, x, y) {
            return 0.0;
        }
        let mut sad = 0.0f64;
        for_each_pair(image, tpl, x, y, |v, t| sad += (v - t).abs());
        sad
    }
}

/// Visits `(source, template)` luminosity pairs of a placement in template
/// row-major order, widened to `f64`.
#[inline]
fn for_each_pair(
    image: &LumaPlane,
    tpl: &TemplatePlan,
    x: usize,
    y: usize,
    mut f: impl FnMut(f64, f64),
) {
    let tpl_width = tpl.width();
    let values = tpl.values();
    let img = image.as_slice();
    let img_width = image.width();
    for ty in 0..tpl.height() {
        let start = (y + ty) * img_width + x;
        let img_row = &img[start..start + tpl_width];
        let tpl_row = &values[ty * tpl_width..(ty + 1) * tpl_width];
        for (&v, &t) in img_row.iter().zip(tpl_row) {
            f(f64::from(v), f64::from(t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MetricKernel, NccScalar, SadScalar, SsdScalar};
    use crate::image::luma::LumaPlane;
    use crate::image::{Raster, Rgba};
    use crate::template::TemplatePlan;

    fn gray_raster(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> Raster {
        let mut img = Raster::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, Rgba::gray(f(x, y))).unwrap();
            }
        }
        img
    }

    #[test]
    fn kernels_match_bruteforce_on_patches() {
        let image = gray_raster(7, 6, |x, y| ((x * 17 + y * 9 + x * y) & 0xFF) as u8);
        let tpl = gray_raster(3, 2, |x, y| ((x * 5 + y * 11 + x * y) & 0xFF) as u8);
        let plane = LumaPlane::from_raster(&image);
        let plan = TemplatePlan::from_raster(&tpl);
        let t: Vec<f64> = plan.values().iter().map(|&v| f64::from(v)).collect();
        let n = t.len() as f64;
        let t_mean = t.iter().sum::<f64>() / n;
        let t_std = (t.iter().map(|v| (v - t_mean).powi(2)).sum::<f64>() / n).sqrt();

        for y in 0..=4 {
            for x in 0..=4 {
                let p: Vec<f64> = plane
                    .patch(x, y, 3, 2)
                    .unwrap()
                    .iter()
                    .map(|&v| f64::from(v))
                    .collect();
                let ssd: f64 = p.iter().zip(&t).map(|(a, b)| (a - b) * (a - b)).sum();
                let sad: f64 = p.iter().zip(&t).map(|(a, b)| (a - b).abs()).sum();
                let p_mean = p.iter().sum::<f64>() / n;
                let p_std = (p.iter().map(|v| (v - p_mean).powi(2)).sum::<f64>() / n).sqrt();
                let corr: f64 = p
                    .iter()
                    .zip(&t)
                    .map(|(a, b)| (a - p_mean) * (b - t_mean))
                    .sum();
                let ncc = if p_std > 0.0 { corr / (p_std * t_std * n) } else { 0.0 };

                assert!((SsdScalar::score_at(&plane, &plan, x, y) - ssd).abs() < 1e-6);
                assert!((SadScalar::score_at(&plane, &plan, x, y) - sad).abs() < 1e-6);
                assert!((NccScalar::score_at(&plane, &plan, x, y) - ncc).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn flat_patch_scores_zero_ncc() {
        let image = Raster::filled(5, 5, Rgba::gray(40)).unwrap();
        let tpl = gray_raster(3, 3, |x, y| (x * 30 + y * 7) as u8);
        let plane = LumaPlane::from_raster(&image);
        let plan = TemplatePlan::from_raster(&tpl);
        assert_eq!(NccScalar::score_at(&plane, &plan, 1, 1), 0.0);
    }

    #[test]
    fn placements_outside_the_image_score_zero() {
        let image = gray_raster(4, 4, |x, y| (x * 40 + y) as u8);
        let tpl = gray_raster(3, 3, |x, _| (x * 10) as u8);
        let plane = LumaPlane::from_raster(&image);
        let plan = TemplatePlan::from_raster(&tpl);
        assert_eq!(SsdScalar::score_at(&plane, &plan, 2, 0), 0.0);
        assert_eq!(NccScalar::score_at(&plane, &plan, 0, 2), 0.0);
    }
}

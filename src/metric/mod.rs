//! Similarity metrics and their scalar kernels.
//!
//! A metric kernel scores one template placement over a luminosity plane.
//! The full pass and the traced single-offset path both go through
//! [`MetricKernel::score_at`], so raw scores agree exactly between them.

use crate::image::luma::LumaPlane;
use crate::template::TemplatePlan;
use crate::util::math::round_channel;
use crate::util::{ConvMatchError, ConvMatchResult};

pub(crate) mod scalar;

/// Similarity metric for template matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Zero-mean normalized cross-correlation in `[-1, 1]`, higher is better.
    #[default]
    Ncc,
    /// Sum of squared differences, lower is better.
    Ssd,
    /// Sum of absolute differences, lower is better.
    Sad,
}

impl Metric {
    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Ncc => "ncc",
            Metric::Ssd => "ssd",
            Metric::Sad => "sad",
        }
    }

    /// True when larger raw scores mean better matches.
    pub fn higher_is_better(self) -> bool {
        matches!(self, Metric::Ncc)
    }

    /// Raw score of the placement at `(x, y)`.
    pub fn score_at(self, image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> f64 {
        match self {
            Metric::Ncc => <scalar::NccScalar as MetricKernel>::score_at(image, tpl, x, y),
            Metric::Ssd => <scalar::SsdScalar as MetricKernel>::score_at(image, tpl, x, y),
            Metric::Sad => <scalar::SadScalar as MetricKernel>::score_at(image, tpl, x, y),
        }
    }

    /// Raw scores of every valid placement in row-major order.
    pub fn scan_full(self, image: &LumaPlane, tpl: &TemplatePlan) -> ConvMatchResult<Vec<f64>> {
        match self {
            Metric::Ncc => <scalar::NccScalar as MetricKernel>::scan_full(image, tpl),
            Metric::Ssd => <scalar::SsdScalar as MetricKernel>::scan_full(image, tpl),
            Metric::Sad => <scalar::SadScalar as MetricKernel>::scan_full(image, tpl),
        }
    }

    /// Display value that needs no knowledge of other placements.
    ///
    /// NCC maps `[-1, 1]` linearly onto `[0, 255]`, which is also what the
    /// full pass uses. SSD and SAD use fixed divisors (100 and 10), so their
    /// value here generally differs from the min/max-rescaled heat map and
    /// grows with mismatch instead of shrinking.
    pub fn display_fixed(self, score: f64) -> u8 {
        match self {
            Metric::Ncc => ncc_display(score),
            Metric::Ssd => round_channel(score / 100.0),
            Metric::Sad => round_channel(score / 10.0),
        }
    }
}

/// `round((score + 1) * 127.5)` clamped to `[0, 255]`.
pub fn ncc_display(score: f64) -> u8 {
    round_channel((score + 1.0) * 127.5)
}

/// Scoring kernel for one metric.
pub trait MetricKernel {
    /// Scores the placement with top-left corner `(x, y)`.
    ///
    /// Placements that do not fit inside `image` score `0.0`.
    fn score_at(image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> f64;

    /// Scores every placement of the valid grid, row by row.
    fn scan_full(image: &LumaPlane, tpl: &TemplatePlan) -> ConvMatchResult<Vec<f64>> {
        let (valid_w, valid_h) = valid_grid(image, tpl)?;
        let mut scores = Vec::with_capacity(valid_w * valid_h);
        for y in 0..valid_h {
            for x in 0..valid_w {
                scores.push(Self::score_at(image, tpl, x, y));
            }
        }
        Ok(scores)
    }
}

/// Size of the placement grid, `(W - w + 1, H - h + 1)`.
pub fn valid_grid(image: &LumaPlane, tpl: &TemplatePlan) -> ConvMatchResult<(usize, usize)> {
    let (img_width, img_height) = (image.width(), image.height());
    let (tpl_width, tpl_height) = (tpl.width(), tpl.height());
    if tpl_width > img_width || tpl_height > img_height {
        return Err(ConvMatchError::InvalidTemplateSize {
            template_width: tpl_width,
            template_height: tpl_height,
            img_width,
            img_height,
        });
    }
    Ok((img_width - tpl_width + 1, img_height - tpl_height + 1))
}

/// True when the template placed at `(x, y)` lies fully inside the image.
pub(crate) fn fits(image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> bool {
    x.checked_add(tpl.width())
        .is_some_and(|end| end <= image.width())
        && y.checked_add(tpl.height())
            .is_some_and(|end| end <= image.height())
}

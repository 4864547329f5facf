//! Dense scan over the valid offset grid.

use crate::candidate::{select_matches, MatchFilter, MatchPeak};
use crate::image::luma::LumaPlane;
use crate::image::{Raster, Rgba};
use crate::metric::{ncc_display, valid_grid, Metric};
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::util::math::round_channel;
use crate::util::ConvMatchResult;

/// Raw and displayed scores of one full matching pass.
///
/// Scores are stored row-major over the valid grid
/// `[0, W - w + 1) x [0, H - h + 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMap {
    metric: Metric,
    img_width: usize,
    img_height: usize,
    valid_width: usize,
    valid_height: usize,
    scores: Vec<f64>,
    min: f64,
    max: f64,
}

impl ScoreMap {
    /// Scores every valid offset of `template` over `source`.
    ///
    /// Fails with `InvalidTemplateSize` when the template is wider or taller
    /// than the source.
    pub fn compute(source: &Raster, template: &Raster, metric: Metric) -> ConvMatchResult<Self> {
        let image = LumaPlane::from_raster(source);
        let tpl = TemplatePlan::from_raster(template);
        Self::from_planes(&image, &tpl, metric)
    }

    /// Scores every valid offset using precomputed luminosity planes.
    pub fn from_planes(
        image: &LumaPlane,
        tpl: &TemplatePlan,
        metric: Metric,
    ) -> ConvMatchResult<Self> {
        let (valid_width, valid_height) = valid_grid(image, tpl)?;
        let _span = trace_span!(
            "match_template",
            metric = metric.name(),
            valid_width = valid_width,
            valid_height = valid_height
        )
        .entered();

        let scores = metric.scan_full(image, tpl)?;
        let (min, max) = scores
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });

        trace_event!("match_template_done", min = min, max = max);
        Ok(Self {
            metric,
            img_width: image.width(),
            img_height: image.height(),
            valid_width,
            valid_height,
            scores,
            min,
            max,
        })
    }

    /// Metric the scores were computed with.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Number of valid offsets per row.
    pub fn valid_width(&self) -> usize {
        self.valid_width
    }

    /// Number of valid offset rows.
    pub fn valid_height(&self) -> usize {
        self.valid_height
    }

    /// Raw scores in row-major order over the valid grid.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Smallest raw score of the pass.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest raw score of the pass.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Raw score at offset `(x, y)`, or `None` outside the valid grid.
    pub fn score(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.valid_width || y >= self.valid_height {
            return None;
        }
        self.scores.get(y * self.valid_width + x).copied()
    }

    /// Displayed heat-map value at offset `(x, y)`; brighter is better.
    ///
    /// NCC maps `[-1, 1]` onto `[0, 255]`. SSD and SAD are rescaled with the
    /// pass minimum and maximum, then inverted; when every score is equal the
    /// value is 255.
    pub fn display_value(&self, x: usize, y: usize) -> Option<u8> {
        self.score(x, y).map(|score| self.display(score))
    }

    fn display(&self, score: f64) -> u8 {
        match self.metric {
            Metric::Ncc => ncc_display(score),
            Metric::Ssd | Metric::Sad => {
                let normalized = if self.max > self.min {
                    (score - self.min) / (self.max - self.min) * 255.0
                } else {
                    0.0
                };
                round_channel(255.0 - normalized)
            }
        }
    }

    /// Renders the heat map at source size.
    ///
    /// Offsets of the valid grid carry their displayed value in R, G and B;
    /// the remaining pixels are black. Alpha is 255 everywhere.
    pub fn heat_map(&self) -> ConvMatchResult<Raster> {
        let mut out = Raster::filled(self.img_width, self.img_height, Rgba::gray(0))?;
        for y in 0..self.valid_height {
            for x in 0..self.valid_width {
                let value = self.display(self.scores[y * self.valid_width + x]);
                out.put(x, y, Rgba::gray(value));
            }
        }
        Ok(out)
    }

    /// Every offset with its raw score and displayed value, row-major.
    pub fn peaks(&self) -> impl Iterator<Item = MatchPeak> + '_ {
        self.scores.iter().enumerate().map(move |(idx, &score)| MatchPeak {
            x: idx % self.valid_width,
            y: idx / self.valid_width,
            value: self.display(score),
            score,
        })
    }

    /// Best offsets by displayed value, filtered and truncated by `filter`.
    pub fn best_matches(&self, filter: &MatchFilter) -> Vec<MatchPeak> {
        select_matches(self.peaks(), filter)
    }
}

/// Full matching pass rendered as a heat map of source size.
pub fn match_template(source: &Raster, template: &Raster, metric: Metric) -> ConvMatchResult<Raster> {
    ScoreMap::compute(source, template, metric)?.heat_map()
}

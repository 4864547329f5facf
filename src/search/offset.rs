//! Single-offset recomputation with a per-pixel trace.

use crate::image::luma::LumaPlane;
use crate::image::{Position, Raster};
use crate::metric::scalar::NccScalar;
use crate::metric::{fits, Metric};
use crate::template::TemplatePlan;

const INVALID_POSITION: &str = "Invalid position (template out of bounds)";

/// One source/template luminosity pair of a traced placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchTap {
    pub source_value: f32,
    pub template_value: f32,
    /// Source coordinate of the pair.
    pub position: Position,
}

/// Rectangle covered by the template at the traced offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TemplateBounds {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Score, display value and arithmetic of one template offset.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchTrace {
    /// Raw metric score.
    pub score: f64,
    /// Context-free display value, see [`Metric::display_fixed`].
    pub normalized_score: u8,
    /// Every template pixel in row-major order; empty for invalid offsets.
    pub steps: Vec<MatchTap>,
    pub formula: String,
    pub template_bounds: TemplateBounds,
}

impl MatchTrace {
    /// False when the offset put the template outside the source.
    pub fn is_valid(&self) -> bool {
        !self.steps.is_empty()
    }
}

/// Recomputes the score of `template` placed at `(x, y)` over `source`.
///
/// Offsets that push the template past the source edge do not fail; they
/// return a zero score, zero display value and no steps.
pub fn match_at_offset(
    source: &Raster,
    template: &Raster,
    metric: Metric,
    x: usize,
    y: usize,
) -> MatchTrace {
    let image = LumaPlane::from_raster(source);
    let tpl = TemplatePlan::from_raster(template);
    trace_at(&image, &tpl, metric, x, y)
}

/// Traced evaluation over prepared planes.
pub(crate) fn trace_at(
    image: &LumaPlane,
    tpl: &TemplatePlan,
    metric: Metric,
    x: usize,
    y: usize,
) -> MatchTrace {
    let template_bounds = TemplateBounds {
        x,
        y,
        width: tpl.width(),
        height: tpl.height(),
    };
    if !fits(image, tpl, x, y) {
        return MatchTrace {
            score: 0.0,
            normalized_score: 0,
            steps: Vec::new(),
            formula: INVALID_POSITION.to_string(),
            template_bounds,
        };
    }

    let steps = collect_steps(image, tpl, x, y);
    let (score, formula) = match metric {
        Metric::Ncc => {
            let parts = NccScalar::parts(image, tpl, x, y);
            let formula = format!(
                "NCC = Σ[(src - μ_src)(tmpl - μ_tmpl)] / (σ_src × σ_tmpl × n)\n\
                 μ_src={:.2}, σ_src={:.2}\n\
                 μ_tmpl={:.2}, σ_tmpl={:.2}\n\
                 NCC = {:.4}",
                parts.patch_mean,
                parts.patch_std,
                tpl.mean(),
                tpl.std_dev(),
                parts.score
            );
            (parts.score, formula)
        }
        Metric::Ssd => {
            let score = metric.score_at(image, tpl, x, y);
            (score, format!("SSD = Σ(src_i - tmpl_i)² = {score:.2}"))
        }
        Metric::Sad => {
            let score = metric.score_at(image, tpl, x, y);
            (score, format!("SAD = Σ|src_i - tmpl_i| = {score:.2}"))
        }
    };

    MatchTrace {
        score,
        normalized_score: metric.display_fixed(score),
        steps,
        formula,
        template_bounds,
    }
}

fn collect_steps(image: &LumaPlane, tpl: &TemplatePlan, x: usize, y: usize) -> Vec<MatchTap> {
    let (tpl_width, tpl_height) = (tpl.width(), tpl.height());
    let values = tpl.values();
    let src = image.as_slice();
    let mut steps = Vec::with_capacity(tpl.len());
    for ty in 0..tpl_height {
        for tx in 0..tpl_width {
            let (px, py) = (x + tx, y + ty);
            steps.push(MatchTap {
                source_value: src[py * image.width() + px],
                template_value: values[ty * tpl_width + tx],
                position: Position::new(px, py),
            });
        }
    }
    steps
}

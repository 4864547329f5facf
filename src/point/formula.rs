//! Human-readable formulas for traced point operations.

use super::{GrayscaleMethod, PointOp};
use crate::image::Rgba;
use crate::util::math::luminosity;

pub(super) fn describe(op: &PointOp, input: Rgba, result: Rgba) -> String {
    let (r, g, b) = (input.r, input.g, input.b);
    match *op {
        PointOp::Grayscale { method } => match method {
            GrayscaleMethod::Luminosity => {
                format!("0.299×{r} + 0.587×{g} + 0.114×{b} = {}", result.r)
            }
            GrayscaleMethod::Average => format!("({r} + {g} + {b}) / 3 = {}", result.r),
            GrayscaleMethod::Lightness => {
                let max = r.max(g).max(b);
                let min = r.min(g).min(b);
                format!("(max {max} + min {min}) / 2 = {}", result.r)
            }
        },
        PointOp::Brightness { amount } => {
            let shift = if amount < 0 {
                format!("− {}", amount.unsigned_abs())
            } else {
                format!("+ {amount}")
            };
            format!("{} {shift} = {}", rgb(input), rgb(result))
        }
        PointOp::Contrast { factor } => {
            format!("({} − 128) × {factor} + 128 = {}", rgb(input), rgb(result))
        }
        PointOp::Threshold { threshold } => {
            let gray = luminosity(r, g, b);
            let cmp = if gray > threshold { ">" } else { "≤" };
            format!("gray({gray:.2}) {cmp} {threshold} → {}", result.r)
        }
        PointOp::Invert => format!("255 − {} = {}", rgb(input), rgb(result)),
    }
}

fn rgb(px: Rgba) -> String {
    format!("RGB({}, {}, {})", px.r, px.g, px.b)
}

#[cfg(test)]
mod tests {
    use super::describe;
    use crate::image::Rgba;
    use crate::point::{GrayscaleMethod, PointOp};

    #[test]
    fn formulas_embed_operands() {
        let px = Rgba::new(10, 20, 30, 255);
        let op = PointOp::Brightness { amount: -5 };
        assert_eq!(
            describe(&op, px, op.map(px)),
            "RGB(10, 20, 30) − 5 = RGB(5, 15, 25)"
        );

        let op = PointOp::Grayscale {
            method: GrayscaleMethod::Average,
        };
        assert_eq!(describe(&op, px, op.map(px)), "(10 + 20 + 30) / 3 = 20");

        let op = PointOp::Grayscale {
            method: GrayscaleMethod::Lightness,
        };
        assert_eq!(describe(&op, px, op.map(px)), "(max 30 + min 10) / 2 = 20");

        let op = PointOp::Contrast { factor: 0.5 };
        assert_eq!(
            describe(&op, px, op.map(px)),
            "(RGB(10, 20, 30) − 128) × 0.5 + 128 = RGB(69, 74, 79)"
        );

        let op = PointOp::Threshold { threshold: 18.0 };
        assert_eq!(describe(&op, px, op.map(px)), "gray(18.15) > 18 → 255");

        let op = PointOp::Threshold { threshold: 20.0 };
        assert_eq!(describe(&op, px, op.map(px)), "gray(18.15) ≤ 20 → 0");
    }
}

//! Named kernels offered by the convolution menu.

use crate::kernel::Kernel;

/// Built-in kernel choices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    Identity,
    BoxBlur,
    GaussianBlur,
    Sharpen,
    EdgeDetect,
    SobelHorizontal,
    SobelVertical,
    Emboss,
}

impl Preset {
    /// Every preset in menu order.
    pub const ALL: [Preset; 8] = [
        Preset::Identity,
        Preset::BoxBlur,
        Preset::GaussianBlur,
        Preset::Sharpen,
        Preset::EdgeDetect,
        Preset::SobelHorizontal,
        Preset::SobelVertical,
        Preset::Emboss,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Identity => "Identity",
            Preset::BoxBlur => "Box Blur",
            Preset::GaussianBlur => "Gaussian Blur",
            Preset::Sharpen => "Sharpen",
            Preset::EdgeDetect => "Edge Detect",
            Preset::SobelHorizontal => "Sobel Horizontal",
            Preset::SobelVertical => "Sobel Vertical",
            Preset::Emboss => "Emboss",
        }
    }

    /// Whether the preset is meant to be applied with normalization.
    pub fn normalize(self) -> bool {
        matches!(self, Preset::BoxBlur | Preset::GaussianBlur)
    }

    /// Identity, box blur and gaussian blur scale to any odd size.
    pub fn is_scalable(self) -> bool {
        matches!(
            self,
            Preset::Identity | Preset::BoxBlur | Preset::GaussianBlur
        )
    }

    /// The 3x3 form of the preset.
    pub fn kernel(self) -> Kernel {
        let rows = match self {
            Preset::Identity => [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
            Preset::BoxBlur => [[1.0; 3]; 3],
            Preset::GaussianBlur => [[1.0, 2.0, 1.0], [2.0, 4.0, 2.0], [1.0, 2.0, 1.0]],
            Preset::Sharpen => [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
            Preset::EdgeDetect => [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]],
            Preset::SobelHorizontal => [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
            Preset::SobelVertical => [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]],
            Preset::Emboss => [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]],
        };
        Kernel::from_3x3(rows)
    }

    /// The preset at side length `size`.
    ///
    /// Size 3 always uses the literal matrix (so the 3x3 gaussian is the
    /// integer `1-2-1` kernel). Other sizes exist only for scalable presets
    /// and only when `size` is odd.
    pub fn at_size(self, size: usize) -> Option<Kernel> {
        if size == 3 {
            return Some(self.kernel());
        }
        match self {
            Preset::Identity => Kernel::identity(size).ok(),
            Preset::BoxBlur => Kernel::box_blur(size).ok(),
            Preset::GaussianBlur => Kernel::gaussian(size).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Preset;

    #[test]
    fn fixed_presets_only_exist_at_3x3() {
        assert!(Preset::Sharpen.at_size(5).is_none());
        assert!(Preset::Emboss.at_size(3).is_some());
        assert_eq!(Preset::BoxBlur.at_size(7).unwrap().size(), 7);
        assert!(Preset::Identity.at_size(4).is_none());
    }

    #[test]
    fn derivative_presets_sum_to_zero() {
        for preset in [
            Preset::EdgeDetect,
            Preset::SobelHorizontal,
            Preset::SobelVertical,
        ] {
            assert_eq!(preset.kernel().sum(), 0.0, "{}", preset.name());
        }
        assert_eq!(Preset::Sharpen.kernel().sum(), 1.0);
        assert_eq!(Preset::Emboss.kernel().sum(), 1.0);
    }
}

//! Square convolution kernels.
//!
//! A kernel is an odd-sized `N x N` matrix of real weights stored row-major.
//! Normalization divides every weight by the sum of all weights, except when
//! that sum is exactly `0` or `1`; the kernel is then used as is. The policy
//! is applied once per pass, independent of which taps land inside the image
//! at a given pixel, so averaging kernels darken image borders.

use crate::util::{ConvMatchError, ConvMatchResult};
use std::borrow::Cow;

mod presets;

pub use presets::Preset;

/// Odd-sized square weight matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Builds a kernel from its rows.
    pub fn new(rows: Vec<Vec<f64>>) -> ConvMatchResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(ConvMatchError::InvalidKernel { reason: "empty" });
        }
        if rows.iter().any(|row| row.len() != size) {
            return Err(ConvMatchError::InvalidKernel {
                reason: "not square",
            });
        }
        let weights = rows.into_iter().flatten().collect();
        Self::from_row_major(size, weights)
    }

    /// Builds a kernel from `size * size` row-major weights.
    pub fn from_row_major(size: usize, weights: Vec<f64>) -> ConvMatchResult<Self> {
        if size == 0 {
            return Err(ConvMatchError::InvalidKernel { reason: "empty" });
        }
        if size % 2 == 0 {
            return Err(ConvMatchError::InvalidKernel {
                reason: "side length must be odd",
            });
        }
        if size.checked_mul(size) != Some(weights.len()) {
            return Err(ConvMatchError::InvalidKernel {
                reason: "weight count does not match size",
            });
        }
        Ok(Self { size, weights })
    }

    /// Builds a 3x3 kernel from a literal matrix.
    pub fn from_3x3(rows: [[f64; 3]; 3]) -> Self {
        Self {
            size: 3,
            weights: rows.iter().flatten().copied().collect(),
        }
    }

    /// Side length of the kernel.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the anchor to the kernel border, `floor(size / 2)`.
    pub fn offset(&self) -> usize {
        self.size / 2
    }

    /// Weight at column `kx`, row `ky`.
    ///
    /// # Panics
    ///
    /// Panics if either index is not below [`Kernel::size`].
    pub fn weight(&self, kx: usize, ky: usize) -> f64 {
        assert!(kx < self.size && ky < self.size, "kernel tap out of range");
        self.weights[ky * self.size + kx]
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weights as a nested matrix, one `Vec` per row.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.weights
            .chunks_exact(self.size)
            .map(<[f64]>::to_vec)
            .collect()
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Returns the kernel divided by its weight sum, or an unchanged copy
    /// when the sum is exactly `0` or `1`.
    pub fn normalized(&self) -> Kernel {
        let sum = self.sum();
        if sum == 0.0 || sum == 1.0 {
            return self.clone();
        }
        Kernel {
            size: self.size,
            weights: self.weights.iter().map(|w| w / sum).collect(),
        }
    }

    /// The kernel a pass actually convolves with.
    pub(crate) fn prepared(&self, normalize: bool) -> Cow<'_, Kernel> {
        if normalize {
            Cow::Owned(self.normalized())
        } else {
            Cow::Borrowed(self)
        }
    }

    /// `N x N` kernel with a single `1` at the center.
    pub fn identity(size: usize) -> ConvMatchResult<Self> {
        let mut weights = vec![0.0; weight_count(size)?];
        let center = size / 2;
        if let Some(w) = weights.get_mut(center * size + center) {
            *w = 1.0;
        }
        Self::from_row_major(size, weights)
    }

    /// `N x N` kernel of ones; normalize it to get a box blur.
    pub fn box_blur(size: usize) -> ConvMatchResult<Self> {
        Self::from_row_major(size, vec![1.0; weight_count(size)?])
    }

    /// Unnormalized Gaussian with `sigma = size / 3` centered on the anchor.
    pub fn gaussian(size: usize) -> ConvMatchResult<Self> {
        let len = weight_count(size)?;
        let sigma = size as f64 / 3.0;
        let center = (size / 2) as f64;
        let denom = 2.0 * sigma * sigma;
        let mut weights = Vec::with_capacity(len);
        for i in 0..size {
            for j in 0..size {
                let dx = i as f64 - center;
                let dy = j as f64 - center;
                weights.push((-(dx * dx + dy * dy) / denom).exp());
            }
        }
        Self::from_row_major(size, weights)
    }
}

/// Number of weights of a generated `size x size` kernel.
///
/// Rejects zero, even and unallocatable sizes before anything is allocated.
fn weight_count(size: usize) -> ConvMatchResult<usize> {
    if size == 0 {
        return Err(ConvMatchError::InvalidKernel { reason: "empty" });
    }
    if size % 2 == 0 {
        return Err(ConvMatchError::InvalidKernel {
            reason: "side length must be odd",
        });
    }
    size
        .checked_mul(size)
        .filter(|&n| {
            n.checked_mul(std::mem::size_of::<f64>())
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        })
        .ok_or(ConvMatchError::InvalidKernel {
            reason: "side length too large",
        })
}

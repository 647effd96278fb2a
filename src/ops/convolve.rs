//! 2D convolution with odd-sized square kernels
//!
//! The whole buffer is snapshotted before any write so every output pixel
//! is computed from unfiltered neighbors. Intermediate sums are carried in
//! `f32`; results are rounded and clamped to `0..=255`.

use imgref::ImgVec;
use log::{debug, warn};
use rgb::alt::BGR8;

use crate::buffer::try_clone_slice;
use crate::error::BmpError;
use crate::pixel::clamp_u8;

/// An immutable `N`x`N` weight matrix.
///
/// Only odd `N` can be applied; applying an even-sized kernel leaves the
/// image untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel<const N: usize> {
    weights: [[f32; N]; N],
}

impl<const N: usize> Kernel<N> {
    /// Create a kernel from row-major weights (`weights[row][column]`).
    #[must_use]
    pub const fn new(weights: [[f32; N]; N]) -> Self {
        Kernel { weights }
    }

    pub const fn size(&self) -> usize {
        N
    }

    pub fn weights(&self) -> &[[f32; N]; N] {
        &self.weights
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f32 {
        self.weights.iter().flatten().sum()
    }
}

impl Kernel<3> {
    /// Uniform 3x3 mean.
    pub const BOX_BLUR: Kernel<3> = Kernel::new([[1.0 / 9.0; 3]; 3]);

    /// Binomial 3x3 approximation of a Gaussian.
    pub const GAUSSIAN_BLUR: Kernel<3> = Kernel::new([
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
        [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
        [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    ]);

    pub const SHARPEN: Kernel<3> = Kernel::new([
        [0.0, -1.0, 0.0],
        [-1.0, 5.0, -1.0],
        [0.0, -1.0, 0.0],
    ]);

    /// Laplacian-style edge detector; flat regions go to black.
    pub const OUTLINE: Kernel<3> = Kernel::new([
        [-1.0, -1.0, -1.0],
        [-1.0, 8.0, -1.0],
        [-1.0, -1.0, -1.0],
    ]);

    /// Diagonal relief, lit from the bottom right.
    pub const EMBOSS: Kernel<3> = Kernel::new([
        [-2.0, -1.0, 0.0],
        [-1.0, 1.0, 1.0],
        [0.0, 1.0, 2.0],
    ]);
}

/// What happens to the pixels within `N / 2` of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Leave the border unmodified; only pixels whose whole neighborhood is
    /// inside the image are recomputed.
    #[default]
    Skip,
    /// Recompute every pixel, reading out-of-range neighbors from the
    /// nearest edge sample.
    Clamp,
}

/// A pixel whose channels can be accumulated independently.
pub trait ConvolvePixel: Copy {
    type Acc: Copy + Default;

    fn accumulate(acc: &mut Self::Acc, px: Self, weight: f32);

    fn finish(acc: Self::Acc) -> Self;
}

impl ConvolvePixel for u8 {
    type Acc = f32;

    #[inline]
    fn accumulate(acc: &mut f32, px: u8, weight: f32) {
        *acc += f32::from(px) * weight;
    }

    #[inline]
    fn finish(acc: f32) -> u8 {
        clamp_u8(f64::from(acc))
    }
}

impl ConvolvePixel for BGR8 {
    type Acc = [f32; 3];

    #[inline]
    fn accumulate(acc: &mut [f32; 3], px: BGR8, weight: f32) {
        acc[0] += f32::from(px.b) * weight;
        acc[1] += f32::from(px.g) * weight;
        acc[2] += f32::from(px.r) * weight;
    }

    #[inline]
    fn finish(acc: [f32; 3]) -> BGR8 {
        BGR8 {
            b: clamp_u8(f64::from(acc[0])),
            g: clamp_u8(f64::from(acc[1])),
            r: clamp_u8(f64::from(acc[2])),
        }
    }
}

/// Neighbor coordinate `pos + k - n`, clamped into `0..len`.
#[inline]
fn neighbor(pos: usize, k: usize, n: usize, len: usize) -> usize {
    (pos + k).saturating_sub(n).min(len - 1)
}

/// Convolve `image` in place with `kernel`.
///
/// Even-sized kernels are ignored. The only failure is not being able to
/// allocate the snapshot, in which case the image is unchanged.
pub fn convolve<P: ConvolvePixel, const N: usize>(
    image: &mut ImgVec<P>,
    kernel: &Kernel<N>,
    edge: EdgePolicy,
) -> Result<(), BmpError> {
    if N % 2 == 0 {
        warn!("ignoring {N}x{N} kernel: size must be odd");
        return Ok(());
    }
    let n = N / 2;
    let (width, height, stride) = (image.width(), image.height(), image.stride());
    let (xs, ys) = match edge {
        EdgePolicy::Skip => (n..width.saturating_sub(n), n..height.saturating_sub(n)),
        EdgePolicy::Clamp => (0..width, 0..height),
    };
    if xs.is_empty() || ys.is_empty() {
        debug!("{width}x{height} image has no pixels to convolve with a {N}x{N} kernel");
        return Ok(());
    }
    debug!("convolving {width}x{height} image with {N}x{N} kernel ({edge:?})");

    let snapshot = try_clone_slice(image.buf())?;
    let out = image.buf_mut();

    for y in ys {
        for x in xs.clone() {
            let mut acc = P::Acc::default();
            for (ky, row) in kernel.weights.iter().enumerate() {
                let sy = neighbor(y, ky, n, height);
                for (kx, &weight) in row.iter().enumerate() {
                    let sx = neighbor(x, kx, n, width);
                    P::accumulate(&mut acc, snapshot[sy * stride + sx], weight);
                }
            }
            out[y * stride + x] = P::finish(acc);
        }
    }
    Ok(())
}

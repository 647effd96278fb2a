//! Histogram equalization
//!
//! Gray images are remapped sample by sample. Color images are converted to
//! YUV, the luma channel is remapped and the result converted back, so hue
//! is preserved while contrast is stretched.

use log::debug;
use rgb::alt::BGR8;

use crate::error::BmpError;
use crate::pixel::Yuv;

/// Occurrence count of each 8-bit value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Histogram { counts: [0; 256] }
    }
}

impl Histogram {
    #[must_use]
    pub fn new() -> Histogram {
        Histogram::default()
    }

    /// Histogram of raw samples.
    pub fn from_samples(samples: &[u8]) -> Histogram {
        let mut h = Histogram::new();
        samples.iter().for_each(|&s| h.add(s));
        h
    }

    /// Histogram of the rounded luma of each sample.
    pub fn from_luma(samples: &[Yuv]) -> Histogram {
        let mut h = Histogram::new();
        samples.iter().for_each(|s| h.add(s.luma_index()));
        h
    }

    #[inline]
    pub fn add(&mut self, value: u8) {
        self.counts[usize::from(value)] += 1;
    }

    /// Fold another (e.g. per-row) histogram into this one.
    pub fn merge(&mut self, other: &Histogram) {
        for (a, b) in self.counts.iter_mut().zip(other.counts.iter()) {
            *a += b;
        }
    }

    pub fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    /// Number of samples counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Prefix sums of the counts.
    pub fn cumulative(&self) -> [u64; 256] {
        let mut cdf = [0u64; 256];
        let mut running = 0;
        for (c, &n) in cdf.iter_mut().zip(self.counts.iter()) {
            running += n;
            *c = running;
        }
        cdf
    }
}

/// Lookup table produced from a cumulative distribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EqualizationMap {
    table: [u8; 256],
    identity: bool,
}

impl EqualizationMap {
    #[must_use]
    pub fn identity() -> EqualizationMap {
        let mut table = [0u8; 256];
        for (i, t) in table.iter_mut().enumerate() {
            *t = i as u8;
        }
        EqualizationMap {
            table,
            identity: true,
        }
    }

    /// `map[i] = round((cdf[i] - cdf_min) * 255 / (total - cdf_min))`.
    ///
    /// Values that never occur map to 0. When every sample shares one value
    /// (or there are none) the denominator is zero and the identity map is
    /// returned.
    pub fn from_histogram(histogram: &Histogram) -> EqualizationMap {
        let cdf = histogram.cumulative();
        let total = cdf[255];
        let cdf_min = cdf.iter().copied().find(|&c| c > 0).unwrap_or(0);
        let denominator = total - cdf_min;
        if denominator == 0 {
            return EqualizationMap::identity();
        }

        let scale = 255.0 / denominator as f64;
        let mut table = [0u8; 256];
        for (t, &c) in table.iter_mut().zip(cdf.iter()) {
            if c > 0 {
                *t = ((c - cdf_min) as f64 * scale).round().min(255.0) as u8;
            }
        }
        EqualizationMap {
            table,
            identity: false,
        }
    }

    #[inline]
    pub fn get(&self, value: u8) -> u8 {
        self.table[usize::from(value)]
    }

    pub fn table(&self) -> &[u8; 256] {
        &self.table
    }

    /// Built by the degenerate branch; applying it changes nothing.
    pub fn is_identity(&self) -> bool {
        self.identity
    }
}

/// Equalize gray samples in place.
pub fn equalize_gray(samples: &mut [u8]) {
    let map = EqualizationMap::from_histogram(&Histogram::from_samples(samples));
    if map.is_identity() {
        debug!("histogram has a single value; equalization is a no-op");
        return;
    }
    samples.iter_mut().for_each(|s| *s = map.get(*s));
}

/// Equalize the luma of BGR pixels in place.
///
/// All allocation happens before the first write, so on error the pixels
/// are unchanged.
pub fn equalize_bgr(pixels: &mut [BGR8]) -> Result<(), BmpError> {
    let mut yuv = Vec::new();
    yuv.try_reserve_exact(pixels.len())
        .map_err(|_| BmpError::Allocation {
            bytes: pixels.len().saturating_mul(size_of::<Yuv>()),
        })?;
    yuv.extend(pixels.iter().map(|&p| Yuv::from_bgr(p)));

    let map = EqualizationMap::from_histogram(&Histogram::from_luma(&yuv));
    if map.is_identity() {
        debug!("luma histogram has a single value; equalization is a no-op");
        return Ok(());
    }

    for (p, s) in pixels.iter_mut().zip(yuv.iter()) {
        *p = Yuv {
            y: f64::from(map.get(s.luma_index())),
            ..*s
        }
        .to_bgr();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(len: usize) -> Vec<u8> {
        let mut state: u32 = 0xDEAD_BEEF;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state >> 24) as u8
            })
            .collect()
    }

    #[test]
    fn histogram_sums_to_pixel_count() {
        let samples = noise(37 * 11);
        let h = Histogram::from_samples(&samples);
        assert_eq!(h.total(), 37 * 11);
        assert_eq!(h.cumulative()[255], 37 * 11);
    }

    #[test]
    fn merged_row_histograms_match_whole() {
        let samples = noise(64 * 8);
        let whole = Histogram::from_samples(&samples);
        let mut merged = Histogram::new();
        for row in samples.chunks(64) {
            merged.merge(&Histogram::from_samples(row));
        }
        assert_eq!(merged, whole);
    }

    #[test]
    fn constant_image_maps_to_identity() {
        let h = Histogram::from_samples(&[42; 16]);
        let map = EqualizationMap::from_histogram(&h);
        assert!(map.is_identity());
        assert_eq!(map.get(42), 42);

        let mut samples = [42u8; 16];
        equalize_gray(&mut samples);
        assert_eq!(samples, [42; 16]);
    }

    #[test]
    fn empty_histogram_maps_to_identity() {
        assert!(EqualizationMap::from_histogram(&Histogram::new()).is_identity());
    }

    #[test]
    fn uniform_histogram_maps_to_itself() {
        let mut samples: Vec<u8> = (0..=255).collect();
        let before = samples.clone();
        equalize_gray(&mut samples);
        assert_eq!(samples, before);
    }

    #[test]
    fn two_values_stretch_to_extremes() {
        let mut samples = [100u8, 100, 120, 120];
        equalize_gray(&mut samples);
        assert_eq!(samples, [0, 0, 255, 255]);
        let map = EqualizationMap::from_histogram(&Histogram::from_samples(&[100, 120]));
        // absent values map to 0
        assert_eq!(map.get(7), 0);
        assert_eq!(map.get(110), 0);
        // values between present ones carry the running cdf
        assert_eq!(map.get(130), 255);
    }

    #[test]
    fn equalizing_twice_is_stable() {
        let mut samples = noise(4096);
        equalize_gray(&mut samples);
        let once = samples.clone();
        equalize_gray(&mut samples);
        let max_diff = samples
            .iter()
            .zip(once.iter())
            .map(|(a, b)| a.abs_diff(*b))
            .max()
            .unwrap();
        assert!(max_diff <= 1, "second pass moved a sample by {max_diff}");
    }

    #[test]
    fn constant_color_image_is_untouched() {
        let px = BGR8 { b: 200, g: 150, r: 100 };
        let mut pixels = vec![px; 12];
        equalize_bgr(&mut pixels).unwrap();
        assert!(pixels.iter().all(|&p| p == px));
    }

    #[test]
    fn color_equalization_stretches_luma() {
        let dark = BGR8 { b: 60, g: 60, r: 60 };
        let light = BGR8 { b: 90, g: 90, r: 90 };
        let mut pixels = vec![dark, dark, light, light];
        equalize_bgr(&mut pixels).unwrap();
        assert_eq!(pixels[0], BGR8 { b: 0, g: 0, r: 0 });
        assert_eq!(pixels[3], BGR8 { b: 255, g: 255, r: 255 });
    }
}

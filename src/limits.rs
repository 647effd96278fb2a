//! Resource caps applied while loading.

use crate::error::BmpError;
use crate::pixel::{PixelLayout, Yuv};

/// Caps checked against a file's header before any pixel memory is
/// allocated.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum peak memory for one image, as computed by [`working_set`]:
    /// the pixel grid plus the scratch buffer a filter holds beside it.
    pub max_memory_bytes: Option<u64>,
}

/// Peak bytes an image holds while being filtered.
///
/// Convolution snapshots the whole grid; equalizing a color image keeps one
/// [`Yuv`] per pixel. The larger of the two is added to the grid itself.
pub fn working_set(layout: PixelLayout, width: u32, height: u32) -> u64 {
    let pixels = u64::from(width) * u64::from(height);
    let grid = pixels.saturating_mul(layout.bytes_per_pixel() as u64);
    let scratch = match layout {
        PixelLayout::Gray8 => grid,
        PixelLayout::Bgr8 => grid.max(pixels.saturating_mul(size_of::<Yuv>() as u64)),
    };
    grid.saturating_add(scratch)
}

impl Limits {
    /// Only cap peak memory.
    #[must_use]
    pub fn with_max_memory(bytes: u64) -> Limits {
        Limits {
            max_memory_bytes: Some(bytes),
            ..Limits::default()
        }
    }

    /// Check an image of `layout` and the given size against every cap.
    pub fn check(&self, layout: PixelLayout, width: u32, height: u32) -> Result<(), BmpError> {
        if let Some(max) = self.max_width.filter(|&max| width > max) {
            return Err(BmpError::LimitExceeded(format!(
                "width {width} exceeds limit {max}"
            )));
        }
        if let Some(max) = self.max_height.filter(|&max| height > max) {
            return Err(BmpError::LimitExceeded(format!(
                "height {height} exceeds limit {max}"
            )));
        }
        let pixels = u64::from(width) * u64::from(height);
        if let Some(max) = self.max_pixels.filter(|&max| pixels > max) {
            return Err(BmpError::LimitExceeded(format!(
                "pixel count {pixels} exceeds limit {max}"
            )));
        }
        let peak = working_set(layout, width, height);
        if let Some(max) = self.max_memory_bytes.filter(|&max| peak > max) {
            return Err(BmpError::LimitExceeded(format!(
                "{width}x{height} {}-bit image needs up to {peak} bytes, limit is {max}",
                layout.bit_depth()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_accept_anything() {
        let limits = Limits::default();
        assert!(limits.check(PixelLayout::Bgr8, u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn pixel_limit_uses_product() {
        let limits = Limits {
            max_pixels: Some(100),
            ..Default::default()
        };
        assert!(limits.check(PixelLayout::Gray8, 10, 10).is_ok());
        match limits.check(PixelLayout::Gray8, 11, 10) {
            Err(BmpError::LimitExceeded(msg)) => assert!(msg.contains("110")),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn working_set_counts_filter_scratch() {
        // gray: grid plus a same-sized convolution snapshot
        assert_eq!(working_set(PixelLayout::Gray8, 100, 100), 20_000);
        // color: 3-byte grid plus 24-byte YUV samples during equalization
        assert_eq!(working_set(PixelLayout::Bgr8, 10, 10), 300 + 2_400);
        assert_eq!(working_set(PixelLayout::Bgr8, u32::MAX, u32::MAX), u64::MAX);
    }

    #[test]
    fn memory_limit_uses_working_set() {
        let limits = Limits::with_max_memory(2_700);
        assert!(limits.check(PixelLayout::Bgr8, 10, 10).is_ok());
        assert!(limits.check(PixelLayout::Bgr8, 11, 10).is_err());
        // the same pixel count as gray needs far less
        assert!(limits.check(PixelLayout::Gray8, 30, 40).is_ok());
    }
}

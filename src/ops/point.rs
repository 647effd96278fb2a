//! Per-sample operations with no neighborhood dependency.

use rgb::ComponentMap;
use rgb::alt::BGR8;

/// Invert a sample
///
/// The formula for inverting an 8 bit sample is `out = 255 - in`
pub fn negative(samples: &mut [u8]) {
    samples.iter_mut().for_each(|x| *x = u8::MAX - *x);
}

/// Invert every channel of every pixel.
pub fn negative_bgr(pixels: &mut [BGR8]) {
    pixels.iter_mut().for_each(|p| *p = p.map(|c| u8::MAX - c));
}

#[inline]
fn shift(value: u8, delta: i32) -> u8 {
    (i32::from(value).saturating_add(delta)).clamp(0, 255) as u8
}

/// Add `delta` to every sample, saturating at 0 and 255.
///
/// `delta` is not range checked: anything beyond ±255 saturates every sample.
pub fn brightness(samples: &mut [u8], delta: i32) {
    samples.iter_mut().for_each(|x| *x = shift(*x, delta));
}

/// Add `delta` to every channel of every pixel, saturating at 0 and 255.
pub fn brightness_bgr(pixels: &mut [BGR8], delta: i32) {
    pixels
        .iter_mut()
        .for_each(|p| *p = p.map(|c| shift(c, delta)));
}

/// Binarize: samples at or above `level` become 255, the rest 0.
pub fn threshold(samples: &mut [u8], level: i32) {
    samples
        .iter_mut()
        .for_each(|x| *x = if i32::from(*x) >= level { 255 } else { 0 });
}

/// Collapse each pixel to the truncated mean of its three channels.
pub fn grayscale(pixels: &mut [BGR8]) {
    for p in pixels.iter_mut() {
        let sum = u16::from(p.r) + u16::from(p.g) + u16::from(p.b);
        let gray = (sum / 3) as u8;
        *p = BGR8 {
            b: gray,
            g: gray,
            r: gray,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_is_involution() {
        let samples: Vec<u8> = (0..=255).collect();
        let mut s = samples.clone();
        negative(&mut s);
        assert_eq!(s[0], 255);
        assert_eq!(s[255], 0);
        negative(&mut s);
        assert_eq!(s, samples);
    }

    #[test]
    fn brightness_saturates() {
        let mut s = [0u8, 50, 200, 255];
        brightness(&mut s, 300);
        assert_eq!(s, [255; 4]);

        let mut s = [0u8, 50, 200, 255];
        brightness(&mut s, -60);
        assert_eq!(s, [0, 0, 140, 195]);

        let mut s = [10u8, 20];
        brightness(&mut s, i32::MIN);
        assert_eq!(s, [0, 0]);
    }

    #[test]
    fn threshold_is_idempotent() {
        let mut s = [0u8, 127, 128, 129, 255];
        threshold(&mut s, 128);
        assert_eq!(s, [0, 0, 255, 255, 255]);
        let once = s;
        threshold(&mut s, 128);
        assert_eq!(s, once);
    }

    #[test]
    fn threshold_out_of_range_levels() {
        let mut s = [0u8, 255];
        threshold(&mut s, -5);
        assert_eq!(s, [255, 255]);
        let mut s = [0u8, 255];
        threshold(&mut s, 256);
        assert_eq!(s, [0, 0]);
    }

    #[test]
    fn grayscale_truncates() {
        let mut px = [
            BGR8 {
                b: 200,
                g: 150,
                r: 100,
            },
            BGR8 { b: 1, g: 0, r: 1 },
        ];
        grayscale(&mut px);
        assert_eq!(px[0], BGR8 { b: 150, g: 150, r: 150 });
        assert_eq!(px[1], BGR8 { b: 0, g: 0, r: 0 });
    }

    #[test]
    fn color_point_ops_touch_every_channel() {
        let mut px = [BGR8 { b: 10, g: 20, r: 30 }];
        negative_bgr(&mut px);
        assert_eq!(px[0], BGR8 { b: 245, g: 235, r: 225 });
        brightness_bgr(&mut px, 20);
        assert_eq!(px[0], BGR8 { b: 255, g: 255, r: 245 });
    }
}

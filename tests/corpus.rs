//! Filter behavior on generated patterns, checked through the public API.

use bmpkit::*;

fn checkerboard(w: usize, h: usize) -> Vec<u8> {
    (0..w * h)
        .map(|i| if (i % w + i / w) % 2 == 0 { 200 } else { 10 })
        .collect()
}

fn noise_pattern(len: usize) -> Vec<u8> {
    let mut state: u32 = 0xDEAD_BEEF;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn noise_pixels(len: usize) -> Vec<BGR8> {
    noise_pattern(len * 3)
        .chunks_exact(3)
        .map(|c| BGR8 { b: c[0], g: c[1], r: c[2] })
        .collect()
}

fn gray(w: u32, h: u32, samples: &[u8]) -> GrayImage {
    GrayImage::from_samples(w, h, samples).unwrap()
}

fn reload(image: &Image) -> Image {
    bmp::decode(&bmp::encode(image).unwrap(), None).unwrap()
}

// ── Point operations ────────────────────────────────────────────────

#[test]
fn negative_of_black_is_white() {
    let mut image: Image = gray(2, 2, &[0; 4]).into();
    image.apply(Operation::Negative).unwrap();
    match reload(&image) {
        Image::Gray(img) => assert_eq!(img.samples(), &[255; 4]),
        Image::Color(_) => panic!("depth changed"),
    }
}

#[test]
fn negative_twice_restores_color_image() {
    let pixels = noise_pixels(35);
    let mut image = ColorImage::from_pixels(7, 5, &pixels).unwrap();
    image.negative();
    assert_ne!(image.pixels_slice(), &pixels[..]);
    image.negative();
    assert_eq!(image.pixels_slice(), &pixels[..]);
}

#[test]
fn brightness_beyond_range_saturates() {
    let mut image = gray(2, 2, &[0, 50, 200, 255]);
    image.brightness(300);
    assert_eq!(image.samples(), &[255; 4]);

    let mut image = ColorImage::from_pixels(1, 1, &[BGR8 { b: 10, g: 128, r: 250 }]).unwrap();
    image.brightness(-20);
    assert_eq!(image.pixel(0, 0), Some(BGR8 { b: 0, g: 108, r: 230 }));
}

#[test]
fn threshold_binarizes_and_is_idempotent() {
    let mut image = gray(16, 16, &noise_pattern(256));
    image.threshold(128);
    assert!(image.samples().iter().all(|&s| s == 0 || s == 255));
    let once = image.samples().to_vec();
    image.threshold(128);
    assert_eq!(image.samples(), &once[..]);
}

#[test]
fn grayscale_of_uniform_color() {
    let mut image: Image = ColorImage::from_pixels(4, 4, &[BGR8 { b: 200, g: 150, r: 100 }; 16])
        .unwrap()
        .into();
    image.apply(Operation::Grayscale).unwrap();
    match &image {
        Image::Color(img) => assert!(
            img.pixels_slice()
                .iter()
                .all(|&p| p == BGR8 { b: 150, g: 150, r: 150 })
        ),
        Image::Gray(_) => panic!("grayscale must keep the 24-bit variant"),
    }
    assert_eq!(image.info().bit_depth(), 24);
}

// ── Convolution ─────────────────────────────────────────────────────

#[test]
fn even_kernel_leaves_image_untouched() {
    let samples = noise_pattern(64);
    let mut image = gray(8, 8, &samples);
    image.apply_kernel(&Kernel::new([[0.25f32; 2]; 2])).unwrap();
    assert_eq!(image.samples(), &samples[..]);
    image
        .apply_kernel_with(&Kernel::new([[1.0f32; 4]; 4]), EdgePolicy::Clamp)
        .unwrap();
    assert_eq!(image.samples(), &samples[..]);
}

#[test]
fn blurs_preserve_flat_regions() {
    let mut image = gray(6, 6, &[77; 36]);
    image.box_blur().unwrap();
    image.gaussian_blur().unwrap();
    assert!(image.samples().iter().all(|&s| s == 77));

    let mut image = ColorImage::from_pixels(5, 5, &[BGR8 { b: 9, g: 99, r: 199 }; 25]).unwrap();
    image.box_blur().unwrap();
    image.sharpen().unwrap();
    assert!(image.pixels_slice().iter().all(|&p| p == BGR8 { b: 9, g: 99, r: 199 }));
}

#[test]
fn outline_of_flat_image_is_black_inside() {
    let mut image = gray(5, 5, &[120; 25]);
    image.outline().unwrap();
    for y in 0..5 {
        for x in 0..5 {
            let border = x == 0 || y == 0 || x == 4 || y == 4;
            let expected = if border { 120 } else { 0 };
            assert_eq!(image.samples()[y * 5 + x], expected, "({x},{y})");
        }
    }
}

#[test]
fn box_blur_smooths_checkerboard() {
    let mut image = gray(6, 6, &checkerboard(6, 6));
    image.box_blur().unwrap();
    // interior: 5 of one color and 4 of the other
    assert_eq!(image.samples()[6 + 1], ((5.0 * 200.0 + 4.0 * 10.0) / 9.0f32).round() as u8);
    assert_eq!(image.samples()[6 + 2], ((4.0 * 200.0 + 5.0 * 10.0) / 9.0f32).round() as u8);
    // border untouched with the default edge policy
    assert_eq!(image.samples()[0], 200);
    assert_eq!(image.samples()[1], 10);
}

#[test]
fn emboss_keeps_flat_regions() {
    // weights sum to 1, so flat input is unchanged
    let mut image = gray(4, 4, &[90; 16]);
    image.emboss().unwrap();
    assert!(image.samples().iter().all(|&s| s == 90));
}

#[test]
fn clamp_policy_filters_every_pixel() {
    let samples = checkerboard(4, 4);
    let mut image = gray(4, 4, &samples);
    image
        .apply_kernel_with(&Kernel::BOX_BLUR, EdgePolicy::Clamp)
        .unwrap();
    assert!(image.samples().iter().all(|&s| s != 200 && s != 10));
}

#[test]
fn five_by_five_kernel() {
    let mut image = gray(7, 7, &noise_pattern(49));
    let before = image.samples().to_vec();
    let mut w = [[0.0f32; 5]; 5];
    w[2][2] = 1.0;
    image.apply_kernel(&Kernel::new(w)).unwrap();
    assert_eq!(image.samples(), &before[..]);
    image.apply_kernel(&Kernel::new([[1.0 / 25.0; 5]; 5])).unwrap();
    // only the 3x3 interior changes
    assert_eq!(image.samples()[..14], before[..14]);
    assert_ne!(image.samples()[2 * 7 + 2..2 * 7 + 5], before[2 * 7 + 2..2 * 7 + 5]);
}

// ── Equalization ────────────────────────────────────────────────────

#[test]
fn equalized_gray_spans_full_range() {
    let samples: Vec<u8> = noise_pattern(400).iter().map(|s| 100 + s % 50).collect();
    let mut image = gray(20, 20, &samples);
    image.equalize();
    let min = image.samples().iter().copied().min().unwrap();
    let max = image.samples().iter().copied().max().unwrap();
    assert_eq!((min, max), (0, 255));
}

#[test]
fn equalization_preserves_order() {
    let samples = noise_pattern(256);
    let mut image = gray(16, 16, &samples);
    image.equalize();
    for (i, j) in [(0, 1), (5, 77), (100, 200), (31, 32)] {
        if samples[i] <= samples[j] {
            assert!(image.samples()[i] <= image.samples()[j]);
        }
    }
}

#[test]
fn equalizing_constant_images_is_a_no_op() {
    let mut image = gray(3, 3, &[17; 9]);
    image.equalize();
    assert_eq!(image.samples(), &[17; 9]);

    let px = BGR8 { b: 3, g: 140, r: 250 };
    let mut image: Image = ColorImage::from_pixels(3, 3, &[px; 9]).unwrap().into();
    image.apply(Operation::Equalize).unwrap();
    match image {
        Image::Color(img) => assert!(img.pixels_slice().iter().all(|&p| p == px)),
        Image::Gray(_) => unreachable!(),
    }
}

#[test]
fn color_equalization_stretches_luma() {
    let pixels: Vec<BGR8> = noise_pixels(64)
        .into_iter()
        .map(|p| BGR8 { b: p.b / 4 + 60, g: p.g / 4 + 60, r: p.r / 4 + 60 })
        .collect();
    let mut image = ColorImage::from_pixels(8, 8, &pixels).unwrap();
    image.equalize().unwrap();
    let luma: Vec<f64> = image
        .pixels_slice()
        .iter()
        .map(|&p| Yuv::from_bgr(p).y)
        .collect();
    let spread = luma.iter().cloned().fold(f64::MIN, f64::max) - luma.iter().cloned().fold(f64::MAX, f64::min);
    assert!(spread > 150.0, "luma spread only {spread}");
}

#[test]
fn histogram_of_image_counts_every_sample() {
    let image = gray(12, 10, &noise_pattern(120));
    let h = Histogram::from_samples(image.samples());
    assert_eq!(h.total(), 120);
    let map = EqualizationMap::from_histogram(&h);
    assert!(!map.is_identity());
}

// ── Dispatch ────────────────────────────────────────────────────────

#[test]
fn every_operation_runs_on_its_variants() {
    let ops = [
        Operation::Negative,
        Operation::Brightness(20),
        Operation::BoxBlur,
        Operation::GaussianBlur,
        Operation::Sharpen,
        Operation::Outline,
        Operation::Emboss,
        Operation::Equalize,
    ];
    let mut g: Image = gray(9, 7, &noise_pattern(63)).into();
    let mut c: Image = ColorImage::from_pixels(9, 7, &noise_pixels(63)).unwrap().into();
    for op in ops {
        g.apply(op).unwrap();
        c.apply(op).unwrap();
        assert_eq!((g.width(), g.height()), (9, 7));
        assert_eq!((c.width(), c.height()), (9, 7));
    }
    g.apply(Operation::Threshold(50)).unwrap();
    c.apply(Operation::Grayscale).unwrap();

    let err = g.apply(Operation::Grayscale).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Usage);
    assert!(c.apply(Operation::Threshold(50)).is_err());

    // filtered images still save and reload
    assert_eq!(reload(&g).layout(), PixelLayout::Gray8);
    assert_eq!(reload(&c).layout(), PixelLayout::Bgr8);
}

#[test]
fn operation_names() {
    assert_eq!(Operation::Brightness(-5).to_string(), "brightness(-5)");
    assert_eq!(Operation::Threshold(10).to_string(), "threshold(10)");
    assert_eq!(Operation::Equalize.to_string(), "histogram equalization");
}

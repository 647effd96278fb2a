#![no_main]
use bmpkit::*;
use libfuzzer_sys::fuzz_target;

const OPS: [Operation; 10] = [
    Operation::Negative,
    Operation::Brightness(37),
    Operation::Threshold(128),
    Operation::Grayscale,
    Operation::BoxBlur,
    Operation::GaussianBlur,
    Operation::Sharpen,
    Operation::Outline,
    Operation::Emboss,
    Operation::Equalize,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let limits = Limits {
        max_pixels: Some(1 << 16),
        ..Default::default()
    };
    let Ok(mut image) = bmp::decode(rest, Some(&limits)) else {
        return;
    };
    // Filters never panic and never change dimensions
    let (w, h) = (image.width(), image.height());
    let op = OPS[usize::from(selector) % OPS.len()];
    let _ = image.apply(op);
    assert_eq!((image.width(), image.height()), (w, h));
});

#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = bmpkit::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    // Must never panic
    let _ = bmpkit::ImageInfo::from_bytes(data);
    let _ = bmpkit::bmp::decode(data, Some(&limits));
});

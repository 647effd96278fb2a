#![no_main]
use bmpkit::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    // Anything that decodes must survive save and reload unchanged
    let Ok(decoded) = bmp::decode(data, Some(&limits)) else {
        return;
    };
    let encoded = bmp::encode(&decoded).expect("encoding a decoded image");
    let Ok(decoded2) = bmp::decode(&encoded, None) else {
        panic!("re-encoded data failed to decode");
    };

    assert_eq!(decoded.width(), decoded2.width());
    assert_eq!(decoded.height(), decoded2.height());
    match (&decoded, &decoded2) {
        (Image::Gray(a), Image::Gray(b)) => {
            assert_eq!(a.samples(), b.samples(), "roundtrip sample mismatch");
            assert_eq!(a.color_table(), b.color_table());
        }
        (Image::Color(a), Image::Color(b)) => {
            assert_eq!(a.pixels_slice(), b.pixels_slice(), "roundtrip pixel mismatch");
        }
        _ => panic!("roundtrip changed bit depth"),
    }
    // Saving twice is byte-stable
    assert_eq!(bmp::encode(&decoded2).unwrap(), encoded);
});

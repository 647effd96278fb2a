#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(file_size: u32, data_offset: u32, width: i32, height: i32, bpp: u16) -> Vec<u8> {
    let mut bmp = vec![0u8; 54];
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&file_size.to_le_bytes());
    bmp[10..14].copy_from_slice(&data_offset.to_le_bytes());
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // info header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes());
    bmp
}

fn main() {
    use std::fs;
    for target in ["fuzz_decode", "fuzz_roundtrip", "fuzz_filters"] {
        let dir = format!("fuzz/corpus/{target}");
        fs::create_dir_all(&dir).unwrap();
        // fuzz_filters reads a selector byte first
        let prefix: &[u8] = if target == "fuzz_filters" { &[3] } else { &[] };
        let write = |name: &str, bytes: &[u8]| {
            fs::write(format!("{dir}/{name}"), [prefix, bytes].concat()).unwrap();
        };

        // 24-bit 1x1
        let mut bmp = header(58, 54, 1, 1, 24);
        bmp.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]);
        write("bmp24_1x1.bmp", &bmp);

        // 24-bit 3x3 top-down
        let mut bmp = header(54 + 36, 54, 3, -3, 24);
        bmp.extend((0..36).map(|i| (i * 7) as u8));
        write("bmp24_3x3_topdown.bmp", &bmp);

        // 8-bit 4x4 with a gray ramp palette
        let mut bmp = header(1078 + 16, 1078, 4, 4, 8);
        for i in 0..=255u8 {
            bmp.extend_from_slice(&[i, i, i, 0]);
        }
        bmp.extend((0..16).map(|i| (i * 16) as u8));
        write("bmp8_4x4.bmp", &bmp);

        // Truncated/malformed seeds for edge coverage
        write("empty.bin", b"");
        write("bm_short.bin", b"BM\x00\x00");
        write("bmp16.bin", &header(54, 54, 1, 1, 16));
    }

    println!("Generated seed corpus in fuzz/corpus/");
}

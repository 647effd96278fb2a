//! BMP writer: always bottom-up, uncompressed, 40-byte info header.

use std::io::Write;

use log::debug;

use crate::buffer::write_rows;
use crate::error::BmpError;
use crate::header::{Field, headers_for, read_field, to_block, write_field, write_header};
use crate::image::{ColorImage, GrayImage};
use crate::pixel::PixelLayout;

/// Header fields rewritten on every save: those that follow from the image
/// dimensions, plus the reserved words. Resolution and palette counts in the
/// stored block are written back verbatim.
const RECOMPUTED_FIELDS: [Field; 11] = [
    Field::FILE_SIZE,
    Field::RESERVED1,
    Field::RESERVED2,
    Field::DATA_OFFSET,
    Field::INFO_SIZE,
    Field::WIDTH,
    Field::HEIGHT,
    Field::PLANES,
    Field::BIT_DEPTH,
    Field::COMPRESSION,
    Field::IMAGE_SIZE,
];

/// Write an 8-bit image: header block, color table, padded rows.
pub fn save_gray<W: Write>(writer: &mut W, image: &GrayImage) -> Result<(), BmpError> {
    let (width, height) = (image.width(), image.height());
    let (file, info) = headers_for(PixelLayout::Gray8, width, height, None)?;
    let fresh = to_block(&file, &info);

    let mut block = image.header;
    for field in RECOMPUTED_FIELDS {
        write_field(&mut block, field, read_field(&fresh, field));
    }

    writer.write_all(&block)?;
    writer.write_all(&image.color_table)?;
    write_rows(writer, image.pixels())?;
    debug!("saved {width}x{height} 8-bit image ({} bytes)", file.file_size);
    Ok(())
}

/// Write a 24-bit image: headers then padded rows.
pub fn save_color<W: Write>(writer: &mut W, image: &ColorImage) -> Result<(), BmpError> {
    let (width, height) = (image.width(), image.height());
    let (file, info) = headers_for(PixelLayout::Bgr8, width, height, Some(&image.info_header))?;
    write_header(writer, &file, &info)?;
    write_rows(writer, image.pixels())?;
    debug!("saved {width}x{height} 24-bit image ({} bytes)", file.file_size);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{COLOR_TABLE_LEN, HEADER_LEN};
    use rgb::alt::BGR8;

    #[test]
    fn gray_layout_on_disk() {
        let img = GrayImage::from_samples(3, 2, &[1, 2, 3, 4, 5, 6]).unwrap();
        let mut out = Vec::new();
        save_gray(&mut out, &img).unwrap();
        assert_eq!(out.len(), HEADER_LEN + COLOR_TABLE_LEN + 8);
        assert_eq!(&out[..2], b"BM");
        assert_eq!(u32::from_le_bytes(out[2..6].try_into().unwrap()), out.len() as u32);
        assert_eq!(u32::from_le_bytes(out[10..14].try_into().unwrap()), 1078);
        assert_eq!(&out[1078..], &[4, 5, 6, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn stale_gray_header_fields_are_fixed() {
        let mut img = GrayImage::new(2, 2).unwrap();
        write_field(&mut img.header, Field::FILE_SIZE, 7);
        write_field(&mut img.header, Field::HEIGHT, (-2i32) as u32);
        write_field(&mut img.header, Field::X_RESOLUTION, 2835);
        write_field(&mut img.header, Field::RESERVED1, 0xBEEF);
        let mut out = Vec::new();
        save_gray(&mut out, &img).unwrap();
        let block: [u8; HEADER_LEN] = out[..HEADER_LEN].try_into().unwrap();
        assert_eq!(read_field(&block, Field::FILE_SIZE), 1078 + 8);
        assert_eq!(read_field(&block, Field::HEIGHT), 2);
        assert_eq!(read_field(&block, Field::X_RESOLUTION), 2835);
        assert_eq!(read_field(&block, Field::RESERVED1), 0);
    }

    #[test]
    fn color_layout_on_disk() {
        let px = [
            BGR8 { b: 1, g: 2, r: 3 },
            BGR8 { b: 4, g: 5, r: 6 },
        ];
        let img = ColorImage::from_pixels(1, 2, &px).unwrap();
        let mut out = Vec::new();
        save_color(&mut out, &img).unwrap();
        assert_eq!(out.len(), 54 + 8);
        assert_eq!(&out[54..], &[4, 5, 6, 0, 1, 2, 3, 0]);
    }
}

//! BMP loader.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use imgref::ImgVec;
use log::debug;
use rgb::alt::BGR8;

use crate::buffer::read_rows;
use crate::error::BmpError;
use crate::header::{COLOR_TABLE_LEN, RawHeader, padded_row_len, read_raw_header, skip};
use crate::image::{ColorImage, GrayImage, Image};
use crate::limits::Limits;
use crate::pixel::{BmpPixel, PixelLayout};

/// Load an 8-bit palette-indexed BMP.
///
/// Any other bit depth is [`BmpError::UnsupportedVariant`].
pub fn load_gray<R: Read>(reader: &mut R, limits: Option<&Limits>) -> Result<GrayImage, BmpError> {
    let raw = read_raw_header(reader, Some(PixelLayout::Gray8))?;
    gray_body(reader, raw, limits, None)
}

/// Load a 24-bit BMP.
pub fn load_color<R: Read>(reader: &mut R, limits: Option<&Limits>) -> Result<ColorImage, BmpError> {
    let raw = read_raw_header(reader, Some(PixelLayout::Bgr8))?;
    color_body(reader, raw, limits, None)
}

/// Load either depth, choosing the variant from the header.
pub fn load<R: Read>(reader: &mut R, limits: Option<&Limits>) -> Result<Image, BmpError> {
    let raw = read_raw_header(reader, None)?;
    either_body(reader, raw, limits, None)
}

/// Open and load a file of either depth.
///
/// Unlike the stream loaders, the pixel data the header claims is compared
/// with the file length up front, so a truncated file fails before any
/// pixel memory is allocated.
pub fn open<P: AsRef<Path>>(path: P, limits: Option<&Limits>) -> Result<Image, BmpError> {
    let (mut reader, len) = open_file(path.as_ref())?;
    let raw = read_raw_header(&mut reader, None)?;
    either_body(&mut reader, raw, limits, Some(len))
}

/// Open and load an 8-bit file.
pub fn open_gray<P: AsRef<Path>>(path: P, limits: Option<&Limits>) -> Result<GrayImage, BmpError> {
    let (mut reader, len) = open_file(path.as_ref())?;
    let raw = read_raw_header(&mut reader, Some(PixelLayout::Gray8))?;
    gray_body(&mut reader, raw, limits, Some(len))
}

/// Open and load a 24-bit file.
pub fn open_color<P: AsRef<Path>>(path: P, limits: Option<&Limits>) -> Result<ColorImage, BmpError> {
    let (mut reader, len) = open_file(path.as_ref())?;
    let raw = read_raw_header(&mut reader, Some(PixelLayout::Bgr8))?;
    color_body(&mut reader, raw, limits, Some(len))
}

fn open_file(path: &Path) -> Result<(BufReader<File>, u64), BmpError> {
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    Ok((BufReader::new(file), len))
}

fn either_body<R: Read>(
    reader: &mut R,
    raw: RawHeader,
    limits: Option<&Limits>,
    available: Option<u64>,
) -> Result<Image, BmpError> {
    match raw.layout {
        PixelLayout::Gray8 => gray_body(reader, raw, limits, available).map(Image::Gray),
        PixelLayout::Bgr8 => color_body(reader, raw, limits, available).map(Image::Color),
    }
}

fn gray_body<R: Read>(
    reader: &mut R,
    raw: RawHeader,
    limits: Option<&Limits>,
    available: Option<u64>,
) -> Result<GrayImage, BmpError> {
    // checked before the palette is read
    check_claims(&raw, limits, available)?;

    let mut color_table = [0u8; COLOR_TABLE_LEN];
    reader.read_exact(&mut color_table)?;
    let pixels = read_pixels::<R, u8>(reader, &raw, raw.consumed() + COLOR_TABLE_LEN)?;
    Ok(GrayImage {
        header: raw.block,
        color_table,
        pixels,
    })
}

fn color_body<R: Read>(
    reader: &mut R,
    raw: RawHeader,
    limits: Option<&Limits>,
    available: Option<u64>,
) -> Result<ColorImage, BmpError> {
    check_claims(&raw, limits, available)?;

    let pixels = read_pixels::<R, BGR8>(reader, &raw, raw.consumed())?;
    Ok(ColorImage {
        file_header: raw.file,
        info_header: raw.info,
        pixels,
    })
}

/// Check what the header claims against `limits` and, when the input length
/// is known, against the bytes actually available.
fn check_claims(
    raw: &RawHeader,
    limits: Option<&Limits>,
    available: Option<u64>,
) -> Result<(), BmpError> {
    let (width, height) = raw.info.dimensions()?;
    if let Some(limits) = limits {
        limits.check(raw.layout, width, height)?;
    }
    if let Some(available) = available {
        let row = padded_row_len(width as usize, raw.layout.bytes_per_pixel())
            .ok_or(BmpError::DimensionsTooLarge { width, height })?;
        let needed = (row as u64)
            .saturating_mul(u64::from(height))
            .saturating_add(u64::from(raw.file.data_offset));
        if needed > available {
            debug!("{width}x{height} image needs {needed} bytes, file has {available}");
            return Err(BmpError::UnexpectedEof);
        }
    }
    Ok(())
}

/// Seek forward to the pixel data and read it.
///
/// `consumed` is how many bytes of the file have been read so far; a data
/// offset pointing back into them is a malformed header.
fn read_pixels<R: Read, P: BmpPixel>(
    reader: &mut R,
    raw: &RawHeader,
    consumed: usize,
) -> Result<ImgVec<P>, BmpError> {
    let offset = raw.file.data_offset as usize;
    if offset < consumed {
        return Err(BmpError::InvalidHeader(format!(
            "pixel data offset {offset} lies inside the {consumed} header bytes"
        )));
    }
    if offset > consumed {
        debug!("skipping {} bytes before pixel data", offset - consumed);
        skip(reader, offset - consumed)?;
    }

    let (width, height) = raw.info.dimensions()?;
    let pixels = read_rows::<R, P>(reader, width, height, raw.info.is_top_down())?;
    debug!(
        "loaded {width}x{height} {:?} image{}",
        P::LAYOUT,
        if raw.info.is_top_down() { " (top-down)" } else { "" }
    );
    Ok(pixels)
}

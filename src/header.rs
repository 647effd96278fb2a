//! BMP file header and BITMAPINFOHEADER codec.
//!
//! Every field is addressed through [`Field`], a byte offset and width into
//! the first 54 bytes of the file, and is read or written with a single
//! little-endian routine. Nothing here depends on in-memory struct layout.

use std::io::{self, Read, Write};

use log::{trace, warn};

use crate::error::BmpError;
use crate::pixel::PixelLayout;

/// Size of the file header.
pub const FILE_HEADER_LEN: usize = 14;
/// Size of the classic BITMAPINFOHEADER.
pub const INFO_HEADER_LEN: usize = 40;
/// File header plus classic info header.
pub const HEADER_LEN: usize = FILE_HEADER_LEN + INFO_HEADER_LEN;
/// 256 BGRA entries following the info header of 8-bit files.
pub const COLOR_TABLE_LEN: usize = 1024;
/// `"BM"` read as a little-endian u16.
pub const BMP_MAGIC: u16 = 0x4D42;

/// A header field: byte offset from the start of the file and width in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub offset: usize,
    pub width: usize,
}

impl Field {
    const fn new(offset: usize, width: usize) -> Self {
        Field { offset, width }
    }

    pub const MAGIC: Field = Field::new(0x00, 2);
    pub const FILE_SIZE: Field = Field::new(0x02, 4);
    pub const RESERVED1: Field = Field::new(0x06, 2);
    pub const RESERVED2: Field = Field::new(0x08, 2);
    pub const DATA_OFFSET: Field = Field::new(0x0A, 4);
    pub const INFO_SIZE: Field = Field::new(0x0E, 4);
    pub const WIDTH: Field = Field::new(0x12, 4);
    pub const HEIGHT: Field = Field::new(0x16, 4);
    pub const PLANES: Field = Field::new(0x1A, 2);
    pub const BIT_DEPTH: Field = Field::new(0x1C, 2);
    pub const COMPRESSION: Field = Field::new(0x1E, 4);
    pub const IMAGE_SIZE: Field = Field::new(0x22, 4);
    pub const X_RESOLUTION: Field = Field::new(0x26, 4);
    pub const Y_RESOLUTION: Field = Field::new(0x2A, 4);
    pub const COLORS_USED: Field = Field::new(0x2E, 4);
    pub const IMPORTANT_COLORS: Field = Field::new(0x32, 4);

    /// Every field, in file order. Together they cover all 54 header bytes.
    pub const ALL: [Field; 16] = [
        Field::MAGIC,
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
        Field::X_RESOLUTION,
        Field::Y_RESOLUTION,
        Field::COLORS_USED,
        Field::IMPORTANT_COLORS,
    ];
}

/// Read a little-endian field from a header block.
pub fn read_field(block: &[u8; HEADER_LEN], field: Field) -> u32 {
    block[field.offset..field.offset + field.width]
        .iter()
        .rev()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// Write a little-endian field into a header block, truncating to its width.
pub fn write_field(block: &mut [u8; HEADER_LEN], field: Field, value: u32) {
    let bytes = value.to_le_bytes();
    block[field.offset..field.offset + field.width].copy_from_slice(&bytes[..field.width]);
}

/// The 14-byte BITMAPFILEHEADER.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub magic: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub data_offset: u32,
}

/// The BITMAPINFOHEADER fields (the first 40 bytes of any larger variant).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfoHeader {
    pub size: u32,
    pub width: i32,
    /// Positive for bottom-up storage, negative for top-down.
    pub height: i32,
    pub planes: u16,
    pub bit_depth: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

impl InfoHeader {
    /// Width and absolute height, rejecting empty or negative-width images.
    pub fn dimensions(&self) -> Result<(u32, u32), BmpError> {
        if self.width <= 0 {
            return Err(BmpError::InvalidHeader(format!(
                "width must be positive, got {}",
                self.width
            )));
        }
        if self.height == 0 {
            return Err(BmpError::InvalidHeader("height is zero".into()));
        }
        Ok((self.width as u32, self.height.unsigned_abs()))
    }

    /// Rows are stored top row first.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Bytes of info header beyond the classic 40.
    pub fn extension_len(&self) -> usize {
        (self.size as usize).saturating_sub(INFO_HEADER_LEN)
    }
}

/// Parse both headers from a 54-byte block without validating them.
pub fn parse_block(block: &[u8; HEADER_LEN]) -> (FileHeader, InfoHeader) {
    let file = FileHeader {
        magic: read_field(block, Field::MAGIC) as u16,
        file_size: read_field(block, Field::FILE_SIZE),
        reserved1: read_field(block, Field::RESERVED1) as u16,
        reserved2: read_field(block, Field::RESERVED2) as u16,
        data_offset: read_field(block, Field::DATA_OFFSET),
    };
    let info = InfoHeader {
        size: read_field(block, Field::INFO_SIZE),
        width: read_field(block, Field::WIDTH) as i32,
        height: read_field(block, Field::HEIGHT) as i32,
        planes: read_field(block, Field::PLANES) as u16,
        bit_depth: read_field(block, Field::BIT_DEPTH) as u16,
        compression: read_field(block, Field::COMPRESSION),
        image_size: read_field(block, Field::IMAGE_SIZE),
        x_resolution: read_field(block, Field::X_RESOLUTION) as i32,
        y_resolution: read_field(block, Field::Y_RESOLUTION) as i32,
        colors_used: read_field(block, Field::COLORS_USED),
        important_colors: read_field(block, Field::IMPORTANT_COLORS),
    };
    (file, info)
}

/// Serialize both headers into a 54-byte block.
pub fn to_block(file: &FileHeader, info: &InfoHeader) -> [u8; HEADER_LEN] {
    let mut block = [0u8; HEADER_LEN];
    write_field(&mut block, Field::MAGIC, u32::from(file.magic));
    write_field(&mut block, Field::FILE_SIZE, file.file_size);
    write_field(&mut block, Field::RESERVED1, u32::from(file.reserved1));
    write_field(&mut block, Field::RESERVED2, u32::from(file.reserved2));
    write_field(&mut block, Field::DATA_OFFSET, file.data_offset);
    write_field(&mut block, Field::INFO_SIZE, info.size);
    write_field(&mut block, Field::WIDTH, info.width as u32);
    write_field(&mut block, Field::HEIGHT, info.height as u32);
    write_field(&mut block, Field::PLANES, u32::from(info.planes));
    write_field(&mut block, Field::BIT_DEPTH, u32::from(info.bit_depth));
    write_field(&mut block, Field::COMPRESSION, info.compression);
    write_field(&mut block, Field::IMAGE_SIZE, info.image_size);
    write_field(&mut block, Field::X_RESOLUTION, info.x_resolution as u32);
    write_field(&mut block, Field::Y_RESOLUTION, info.y_resolution as u32);
    write_field(&mut block, Field::COLORS_USED, info.colors_used);
    write_field(&mut block, Field::IMPORTANT_COLORS, info.important_colors);
    block
}

/// Validate parsed headers.
///
/// Checks, in order: magic, info header size, bit depth (against `expected`
/// when given, otherwise any supported depth), compression, dimensions.
pub fn validate(
    file: &FileHeader,
    info: &InfoHeader,
    expected: Option<PixelLayout>,
) -> Result<PixelLayout, BmpError> {
    if file.magic != BMP_MAGIC {
        return Err(BmpError::UnrecognizedFormat);
    }
    if (info.size as usize) < INFO_HEADER_LEN {
        return Err(BmpError::InvalidHeader(format!(
            "info header size {} is smaller than {INFO_HEADER_LEN}",
            info.size
        )));
    }
    let layout = match (PixelLayout::from_bit_depth(info.bit_depth), expected) {
        (Some(found), Some(want)) if found != want => {
            return Err(BmpError::UnsupportedVariant(format!(
                "expected a {}-bit image, found {}-bit",
                want.bit_depth(),
                info.bit_depth
            )));
        }
        (Some(found), _) => found,
        (None, _) => {
            return Err(BmpError::UnsupportedVariant(format!(
                "bit depth {} is not supported (only 8 and 24)",
                info.bit_depth
            )));
        }
    };
    if info.compression != 0 {
        return Err(BmpError::UnsupportedVariant(format!(
            "compression {} is not supported (only uncompressed)",
            info.compression
        )));
    }
    info.dimensions()?;
    Ok(layout)
}

/// Read the 54-byte header block from a stream.
pub fn read_block<R: Read>(reader: &mut R) -> Result<[u8; HEADER_LEN], BmpError> {
    let mut block = [0u8; HEADER_LEN];
    reader.read_exact(&mut block)?;
    Ok(block)
}

/// Read and validate both headers, leaving `reader` positioned just past the
/// info header (extension bytes of larger info headers are consumed).
pub fn read_header<R: Read>(
    reader: &mut R,
    expected: Option<PixelLayout>,
) -> Result<(FileHeader, InfoHeader), BmpError> {
    let raw = read_raw_header(reader, expected)?;
    Ok((raw.file, raw.info))
}

/// A validated header together with the bytes it was parsed from.
#[derive(Clone, Debug)]
pub(crate) struct RawHeader {
    pub block: [u8; HEADER_LEN],
    pub file: FileHeader,
    pub info: InfoHeader,
    pub layout: PixelLayout,
}

impl RawHeader {
    /// Bytes consumed from the start of the file once the info header (and
    /// its extension) has been read.
    pub fn consumed(&self) -> usize {
        FILE_HEADER_LEN + (self.info.size as usize)
    }
}

pub(crate) fn read_raw_header<R: Read>(
    reader: &mut R,
    expected: Option<PixelLayout>,
) -> Result<RawHeader, BmpError> {
    let block = read_block(reader)?;
    let (file, info) = parse_block(&block);
    let layout = validate(&file, &info, expected)?;

    trace!("BMP file size: {}", file.file_size);
    trace!("BMP data offset: {}", file.data_offset);
    trace!("BMP info header size: {}", info.size);
    trace!("BMP dimensions: {}x{}", info.width, info.height);
    trace!("BMP layout: {:?}", layout);

    let extension = info.extension_len();
    if extension > 0 {
        warn!("skipping {extension} info header extension bytes; they are not preserved on save");
        skip(reader, extension)?;
    }
    Ok(RawHeader {
        block,
        file,
        info,
        layout,
    })
}

/// Write both headers (54 bytes).
pub fn write_header<W: Write>(
    writer: &mut W,
    file: &FileHeader,
    info: &InfoHeader,
) -> Result<(), BmpError> {
    writer.write_all(&to_block(file, info))?;
    Ok(())
}

/// Headers for writing an image of the given layout and size.
///
/// Size-derived fields are recomputed; resolution and palette counts are
/// carried over from `template`; reserved fields are zero.
pub fn headers_for(
    layout: PixelLayout,
    width: u32,
    height: u32,
    template: Option<&InfoHeader>,
) -> Result<(FileHeader, InfoHeader), BmpError> {
    let too_large = || BmpError::DimensionsTooLarge { width, height };
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(too_large());
    }
    let row = padded_row_len(width as usize, layout.bytes_per_pixel()).ok_or_else(too_large)?;
    let image_size = row.checked_mul(height as usize).ok_or_else(too_large)?;
    let palette = match layout {
        PixelLayout::Gray8 => COLOR_TABLE_LEN,
        PixelLayout::Bgr8 => 0,
    };
    let data_offset = HEADER_LEN + palette;
    let file_size = image_size.checked_add(data_offset).ok_or_else(too_large)?;
    let file_size = u32::try_from(file_size).map_err(|_| too_large())?;
    let image_size = u32::try_from(image_size).map_err(|_| too_large())?;

    let file = FileHeader {
        magic: BMP_MAGIC,
        file_size,
        reserved1: 0,
        reserved2: 0,
        data_offset: data_offset as u32,
    };
    let info = InfoHeader {
        size: INFO_HEADER_LEN as u32,
        width: width as i32,
        height: height as i32,
        planes: 1,
        bit_depth: layout.bit_depth(),
        compression: 0,
        image_size,
        x_resolution: template.map_or(0, |t| t.x_resolution),
        y_resolution: template.map_or(0, |t| t.y_resolution),
        colors_used: template.map_or(0, |t| t.colors_used),
        important_colors: template.map_or(0, |t| t.important_colors),
    };
    Ok((file, info))
}

/// On-disk row length: `width * bytes_per_pixel` rounded up to 4 bytes.
pub fn padded_row_len(width: usize, bytes_per_pixel: usize) -> Option<usize> {
    width
        .checked_mul(bytes_per_pixel)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
}

/// Consume and discard `n` bytes.
pub(crate) fn skip<R: Read>(reader: &mut R, n: usize) -> Result<(), BmpError> {
    let copied = io::copy(&mut reader.by_ref().take(n as u64), &mut io::sink())?;
    if copied != n as u64 {
        return Err(BmpError::UnexpectedEof);
    }
    Ok(())
}

//! Header-only probing.

use core::fmt;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::Path;

use crate::error::BmpError;
use crate::header::{FileHeader, InfoHeader, read_raw_header};
use crate::pixel::PixelLayout;

/// What a BMP header says about the image, without its pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Rows are stored top row first.
    pub top_down: bool,
    pub file_size: u32,
    pub data_offset: u32,
    /// Declared size of the pixel data, padding included.
    pub image_size: u32,
    pub info_header_size: u32,
    pub x_resolution: i32,
    pub y_resolution: i32,
}

impl ImageInfo {
    /// Read metadata from header bytes. Only the first 54 bytes (plus any
    /// info header extension) are needed.
    pub fn from_bytes(data: &[u8]) -> Result<ImageInfo, BmpError> {
        ImageInfo::read_from(&mut Cursor::new(data))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ImageInfo, BmpError> {
        ImageInfo::read_from(&mut BufReader::new(File::open(path)?))
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<ImageInfo, BmpError> {
        let raw = read_raw_header(reader, None)?;
        Ok(ImageInfo::from_headers(&raw.file, &raw.info, raw.layout))
    }

    pub(crate) fn from_headers(file: &FileHeader, info: &InfoHeader, layout: PixelLayout) -> ImageInfo {
        ImageInfo {
            width: info.width.unsigned_abs(),
            height: info.height.unsigned_abs(),
            layout,
            top_down: info.is_top_down(),
            file_size: file.file_size,
            data_offset: file.data_offset,
            image_size: info.image_size,
            info_header_size: info.size,
            x_resolution: info.x_resolution,
            y_resolution: info.y_resolution,
        }
    }

    pub fn bit_depth(&self) -> u16 {
        self.layout.bit_depth()
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.layout {
            PixelLayout::Gray8 => "grayscale (palette)",
            PixelLayout::Bgr8 => "color",
        };
        writeln!(f, "Dimensions:   {} x {}", self.width, self.height)?;
        writeln!(f, "Bit depth:    {} ({kind})", self.bit_depth())?;
        writeln!(
            f,
            "Row order:    {}",
            if self.top_down { "top-down" } else { "bottom-up" }
        )?;
        writeln!(f, "File size:    {} bytes", self.file_size)?;
        writeln!(f, "Data offset:  {}", self.data_offset)?;
        writeln!(f, "Data size:    {} bytes", self.image_size)?;
        writeln!(f, "Info header:  {} bytes", self.info_header_size)?;
        write!(
            f,
            "Resolution:   {} x {} px/m",
            self.x_resolution, self.y_resolution
        )
    }
}

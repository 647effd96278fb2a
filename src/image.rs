//! In-memory 8-bit and 24-bit images.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use imgref::{ImgRef, ImgVec};
use log::debug;
use rgb::alt::BGR8;

use crate::bmp;
use crate::buffer::allocate;
use crate::error::BmpError;
use crate::header::{
    COLOR_TABLE_LEN, Field, FileHeader, HEADER_LEN, InfoHeader, headers_for, parse_block,
    read_field, to_block,
};
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::ops::Operation;
use crate::ops::convolve::{EdgePolicy, Kernel, convolve};
use crate::ops::{equalize, point};
use crate::pixel::PixelLayout;

/// An 8-bit palette-indexed (grayscale) BMP.
///
/// Keeps the 54-byte header block and 1024-byte color table as loaded; both
/// are written back on save with the size-derived fields recomputed.
#[derive(Clone, Debug)]
pub struct GrayImage {
    pub(crate) header: [u8; HEADER_LEN],
    pub(crate) color_table: [u8; COLOR_TABLE_LEN],
    pub(crate) pixels: ImgVec<u8>,
}

/// A 24-bit BGR BMP.
#[derive(Clone, Debug)]
pub struct ColorImage {
    pub(crate) file_header: FileHeader,
    pub(crate) info_header: InfoHeader,
    pub(crate) pixels: ImgVec<BGR8>,
}

/// A loaded image of either supported depth.
#[derive(Clone, Debug)]
pub enum Image {
    Gray(GrayImage),
    Color(ColorImage),
}

/// Linear gray ramp: entry `i` is `(i, i, i, 0)` in BGRA order.
fn gray_ramp() -> [u8; COLOR_TABLE_LEN] {
    let mut table = [0u8; COLOR_TABLE_LEN];
    for (i, entry) in table.chunks_exact_mut(4).enumerate() {
        entry[..3].fill(i as u8);
    }
    table
}

impl GrayImage {
    /// A black image with a linear gray palette.
    pub fn new(width: u32, height: u32) -> Result<GrayImage, BmpError> {
        let pixels = allocate::<u8>(width, height)?;
        let (file, info) = headers_for(PixelLayout::Gray8, width, height, None)?;
        Ok(GrayImage {
            header: to_block(&file, &info),
            color_table: gray_ramp(),
            pixels,
        })
    }

    /// Build from top-down row-major samples.
    pub fn from_samples(width: u32, height: u32, samples: &[u8]) -> Result<GrayImage, BmpError> {
        let mut image = GrayImage::new(width, height)?;
        let needed = image.pixels.buf().len();
        if samples.len() != needed {
            return Err(BmpError::InvalidHeader(format!(
                "expected {needed} samples for {width}x{height}, got {}",
                samples.len()
            )));
        }
        image.pixels.buf_mut().copy_from_slice(samples);
        Ok(image)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<GrayImage, BmpError> {
        bmp::decode::open_gray(path, None)
    }

    pub fn open_with_limits<P: AsRef<Path>>(path: P, limits: &Limits) -> Result<GrayImage, BmpError> {
        bmp::decode::open_gray(path, Some(limits))
    }

    pub fn read_from<R: Read>(reader: &mut R, limits: Option<&Limits>) -> Result<GrayImage, BmpError> {
        bmp::decode::load_gray(reader, limits)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BmpError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BmpError> {
        bmp::encode::save_gray(writer, self)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.height() as u32
    }

    /// Always 8.
    pub fn bit_depth(&self) -> u16 {
        read_field(&self.header, Field::BIT_DEPTH) as u16
    }

    /// Raw image size field as loaded.
    pub fn data_size(&self) -> u32 {
        read_field(&self.header, Field::IMAGE_SIZE)
    }

    /// The 54-byte header block as loaded or created.
    pub fn header(&self) -> &[u8; HEADER_LEN] {
        &self.header
    }

    pub fn headers(&self) -> (FileHeader, InfoHeader) {
        parse_block(&self.header)
    }

    pub fn color_table(&self) -> &[u8; COLOR_TABLE_LEN] {
        &self.color_table
    }

    pub fn pixels(&self) -> ImgRef<'_, u8> {
        self.pixels.as_ref()
    }

    /// Top-down row-major samples, `width * height` long.
    pub fn samples(&self) -> &[u8] {
        self.pixels.buf()
    }

    pub fn samples_mut(&mut self) -> &mut [u8] {
        self.pixels.buf_mut()
    }

    pub fn info(&self) -> ImageInfo {
        let (file, info) = self.headers();
        ImageInfo::from_headers(&file, &info, PixelLayout::Gray8)
    }

    pub fn negative(&mut self) {
        point::negative(self.samples_mut());
    }

    pub fn brightness(&mut self, delta: i32) {
        point::brightness(self.samples_mut(), delta);
    }

    pub fn threshold(&mut self, level: i32) {
        point::threshold(self.samples_mut(), level);
    }

    pub fn apply_kernel<const N: usize>(&mut self, kernel: &Kernel<N>) -> Result<(), BmpError> {
        self.apply_kernel_with(kernel, EdgePolicy::default())
    }

    pub fn apply_kernel_with<const N: usize>(
        &mut self,
        kernel: &Kernel<N>,
        edge: EdgePolicy,
    ) -> Result<(), BmpError> {
        convolve(&mut self.pixels, kernel, edge)
    }

    pub fn box_blur(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::BOX_BLUR)
    }

    pub fn gaussian_blur(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::GAUSSIAN_BLUR)
    }

    pub fn sharpen(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::SHARPEN)
    }

    pub fn outline(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::OUTLINE)
    }

    pub fn emboss(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::EMBOSS)
    }

    pub fn equalize(&mut self) {
        equalize::equalize_gray(self.samples_mut());
    }
}

impl ColorImage {
    /// A black image.
    pub fn new(width: u32, height: u32) -> Result<ColorImage, BmpError> {
        let pixels = allocate::<BGR8>(width, height)?;
        let (file_header, info_header) = headers_for(PixelLayout::Bgr8, width, height, None)?;
        Ok(ColorImage {
            file_header,
            info_header,
            pixels,
        })
    }

    /// Build from top-down row-major pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: &[BGR8]) -> Result<ColorImage, BmpError> {
        let mut image = ColorImage::new(width, height)?;
        let needed = image.pixels.buf().len();
        if pixels.len() != needed {
            return Err(BmpError::InvalidHeader(format!(
                "expected {needed} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        image.pixels.buf_mut().copy_from_slice(pixels);
        Ok(image)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<ColorImage, BmpError> {
        bmp::decode::open_color(path, None)
    }

    pub fn open_with_limits<P: AsRef<Path>>(path: P, limits: &Limits) -> Result<ColorImage, BmpError> {
        bmp::decode::open_color(path, Some(limits))
    }

    pub fn read_from<R: Read>(reader: &mut R, limits: Option<&Limits>) -> Result<ColorImage, BmpError> {
        bmp::decode::load_color(reader, limits)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BmpError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BmpError> {
        bmp::encode::save_color(writer, self)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.height() as u32
    }

    /// Always 24.
    pub fn bit_depth(&self) -> u16 {
        self.info_header.bit_depth
    }

    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    pub fn info_header(&self) -> &InfoHeader {
        &self.info_header
    }

    pub fn pixels(&self) -> ImgRef<'_, BGR8> {
        self.pixels.as_ref()
    }

    /// Top-down row-major pixels, `width * height` long.
    pub fn pixels_slice(&self) -> &[BGR8] {
        self.pixels.buf()
    }

    pub fn pixels_mut(&mut self) -> &mut [BGR8] {
        self.pixels.buf_mut()
    }

    /// Pixel at column `x`, row `y` (row 0 is the visual top), or `None`
    /// outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<BGR8> {
        if x >= self.pixels.width() || y >= self.pixels.height() {
            return None;
        }
        self.pixels.buf().get(y * self.pixels.stride() + x).copied()
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo::from_headers(&self.file_header, &self.info_header, PixelLayout::Bgr8)
    }

    pub fn negative(&mut self) {
        point::negative_bgr(self.pixels_mut());
    }

    pub fn brightness(&mut self, delta: i32) {
        point::brightness_bgr(self.pixels_mut(), delta);
    }

    pub fn grayscale(&mut self) {
        point::grayscale(self.pixels_mut());
    }

    pub fn apply_kernel<const N: usize>(&mut self, kernel: &Kernel<N>) -> Result<(), BmpError> {
        self.apply_kernel_with(kernel, EdgePolicy::default())
    }

    pub fn apply_kernel_with<const N: usize>(
        &mut self,
        kernel: &Kernel<N>,
        edge: EdgePolicy,
    ) -> Result<(), BmpError> {
        convolve(&mut self.pixels, kernel, edge)
    }

    pub fn box_blur(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::BOX_BLUR)
    }

    pub fn gaussian_blur(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::GAUSSIAN_BLUR)
    }

    pub fn sharpen(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::SHARPEN)
    }

    pub fn outline(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::OUTLINE)
    }

    pub fn emboss(&mut self) -> Result<(), BmpError> {
        self.apply_kernel(&Kernel::EMBOSS)
    }

    /// Equalize luma. On allocation failure the image is unchanged.
    pub fn equalize(&mut self) -> Result<(), BmpError> {
        equalize::equalize_bgr(self.pixels_mut())
    }
}

impl Image {
    /// Load either depth, choosing by the header's bit depth.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Image, BmpError> {
        bmp::decode::open(path, None)
    }

    pub fn open_with_limits<P: AsRef<Path>>(path: P, limits: &Limits) -> Result<Image, BmpError> {
        bmp::decode::open(path, Some(limits))
    }

    pub fn read_from<R: Read>(reader: &mut R, limits: Option<&Limits>) -> Result<Image, BmpError> {
        bmp::decode::load(reader, limits)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BmpError> {
        match self {
            Image::Gray(img) => img.save(path),
            Image::Color(img) => img.save(path),
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BmpError> {
        match self {
            Image::Gray(img) => img.write_to(writer),
            Image::Color(img) => img.write_to(writer),
        }
    }

    pub fn layout(&self) -> PixelLayout {
        match self {
            Image::Gray(_) => PixelLayout::Gray8,
            Image::Color(_) => PixelLayout::Bgr8,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Image::Gray(img) => img.width(),
            Image::Color(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Image::Gray(img) => img.height(),
            Image::Color(img) => img.height(),
        }
    }

    pub fn info(&self) -> ImageInfo {
        match self {
            Image::Gray(img) => img.info(),
            Image::Color(img) => img.info(),
        }
    }

    /// Apply `op` in place.
    ///
    /// Threshold on a color image and grayscale on a gray image return
    /// [`BmpError::UnsupportedOperation`] and leave the image unchanged.
    pub fn apply(&mut self, op: Operation) -> Result<(), BmpError> {
        debug!("applying {op} to {:?} image", self.layout());
        let unsupported = |layout| BmpError::UnsupportedOperation {
            operation: op.name(),
            layout,
        };
        match self {
            Image::Gray(img) => match op {
                Operation::Negative => img.negative(),
                Operation::Brightness(delta) => img.brightness(delta),
                Operation::Threshold(level) => img.threshold(level),
                Operation::Grayscale => return Err(unsupported(PixelLayout::Gray8)),
                Operation::BoxBlur => img.box_blur()?,
                Operation::GaussianBlur => img.gaussian_blur()?,
                Operation::Sharpen => img.sharpen()?,
                Operation::Outline => img.outline()?,
                Operation::Emboss => img.emboss()?,
                Operation::Equalize => img.equalize(),
            },
            Image::Color(img) => match op {
                Operation::Negative => img.negative(),
                Operation::Brightness(delta) => img.brightness(delta),
                Operation::Threshold(_) => return Err(unsupported(PixelLayout::Bgr8)),
                Operation::Grayscale => img.grayscale(),
                Operation::BoxBlur => img.box_blur()?,
                Operation::GaussianBlur => img.gaussian_blur()?,
                Operation::Sharpen => img.sharpen()?,
                Operation::Outline => img.outline()?,
                Operation::Emboss => img.emboss()?,
                Operation::Equalize => img.equalize()?,
            },
        }
        Ok(())
    }
}

impl From<GrayImage> for Image {
    fn from(img: GrayImage) -> Self {
        Image::Gray(img)
    }
}

impl From<ColorImage> for Image {
    fn from(img: ColorImage) -> Self {
        Image::Color(img)
    }
}

//! Contiguous pixel buffers and padded, bottom-up row I/O.

use std::io::{Read, Write};

use imgref::{ImgRef, ImgVec};

use crate::error::BmpError;
use crate::header::padded_row_len;
use crate::pixel::BmpPixel;

/// Allocate a `len`-element vector filled with `fill`, reporting allocation
/// failure instead of aborting.
pub(crate) fn try_filled_vec<T: Copy>(len: usize, fill: T) -> Result<Vec<T>, BmpError> {
    let bytes = len.saturating_mul(size_of::<T>());
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| BmpError::Allocation { bytes })?;
    v.resize(len, fill);
    Ok(v)
}

/// Copy `src` into a freshly allocated vector, reporting allocation failure.
pub(crate) fn try_clone_slice<T: Copy>(src: &[T]) -> Result<Vec<T>, BmpError> {
    let mut v = Vec::new();
    v.try_reserve_exact(src.len()).map_err(|_| BmpError::Allocation {
        bytes: size_of_val(src),
    })?;
    v.extend_from_slice(src);
    Ok(v)
}

/// Allocate a zero-filled `width` x `height` grid (stride == width).
pub fn allocate<P: BmpPixel>(width: u32, height: u32) -> Result<ImgVec<P>, BmpError> {
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidHeader(format!(
            "cannot allocate a {width}x{height} image"
        )));
    }
    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or(BmpError::DimensionsTooLarge { width, height })?;
    let buf = try_filled_vec(len, P::ZERO)?;
    Ok(ImgVec::new(buf, width as usize, height as usize))
}

/// Bytes of one on-disk row for `P`.
pub(crate) fn row_stride<P: BmpPixel>(width: usize) -> Result<usize, BmpError> {
    padded_row_len(width, P::LAYOUT.bytes_per_pixel()).ok_or(BmpError::DimensionsTooLarge {
        width: width as u32,
        height: 0,
    })
}

/// Read `height` padded file rows into a new `width` x `height` grid.
///
/// File rows run bottom-up unless `top_down`; padding is read and dropped.
/// Memory grows only as rows arrive, so a header claiming more data than the
/// stream holds fails with [`BmpError::UnexpectedEof`] after allocating no
/// more than what was read.
pub fn read_rows<R: Read, P: BmpPixel>(
    reader: &mut R,
    width: u32,
    height: u32,
    top_down: bool,
) -> Result<ImgVec<P>, BmpError> {
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidHeader(format!(
            "cannot read a {width}x{height} image"
        )));
    }
    let (w, h) = (width as usize, height as usize);
    let total = w
        .checked_mul(h)
        .ok_or(BmpError::DimensionsTooLarge { width, height })?;
    let bpp = P::LAYOUT.bytes_per_pixel();
    let stride = row_stride::<P>(w)?;

    let mut row_bytes = Vec::new();
    let mut buf: Vec<P> = Vec::new();
    for _ in 0..h {
        row_bytes.clear();
        reader
            .by_ref()
            .take(stride as u64)
            .read_to_end(&mut row_bytes)?;
        if row_bytes.len() != stride {
            return Err(BmpError::UnexpectedEof);
        }
        buf.try_reserve(w).map_err(|_| BmpError::Allocation {
            bytes: total.saturating_mul(size_of::<P>()),
        })?;
        buf.extend(row_bytes[..w * bpp].chunks_exact(bpp).map(P::from_bytes));
    }
    if !top_down {
        flip_rows(&mut buf, w);
    }
    Ok(ImgVec::new(buf, w, h))
}

/// Reverse the order of `width`-long rows in place.
fn flip_rows<T>(buf: &mut [T], width: usize) {
    let height = buf.len() / width;
    for y in 0..height / 2 {
        let (upper, lower) = buf.split_at_mut((height - 1 - y) * width);
        upper[y * width..(y + 1) * width].swap_with_slice(&mut lower[..width]);
    }
}

/// Write `image` as padded, bottom-up file rows with zero padding.
pub fn write_rows<W: Write, P: BmpPixel>(writer: &mut W, image: ImgRef<'_, P>) -> Result<(), BmpError> {
    let stride = row_stride::<P>(image.width())?;
    let mut row_bytes = Vec::new();
    row_bytes
        .try_reserve_exact(stride)
        .map_err(|_| BmpError::Allocation { bytes: stride })?;

    let (width, stride_px) = (image.width(), image.stride());
    for y in (0..image.height()).rev() {
        row_bytes.clear();
        for &px in &image.buf()[y * stride_px..y * stride_px + width] {
            px.extend_bytes(&mut row_bytes);
        }
        row_bytes.resize(stride, 0);
        writer.write_all(&row_bytes)?;
    }
    Ok(())
}

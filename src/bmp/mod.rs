//! Uncompressed 8-bit and 24-bit BMP loading and saving.
//!
//! Loading reads the headers, checks them against optional [`Limits`],
//! allocates the pixel grid and fills it row by row. Saving recomputes every
//! size-derived header field from the image dimensions.

pub mod decode;
pub mod encode;

use std::io::Cursor;

use crate::error::BmpError;
use crate::image::Image;
use crate::limits::Limits;

pub use decode::{load, load_color, load_gray, open, open_color, open_gray};
pub use encode::{save_color, save_gray};

/// Decode a whole BMP held in memory.
pub fn decode(data: &[u8], limits: Option<&Limits>) -> Result<Image, BmpError> {
    load(&mut Cursor::new(data), limits)
}

/// Encode an image into a freshly allocated byte vector.
pub fn encode(image: &Image) -> Result<Vec<u8>, BmpError> {
    let mut out = Vec::new();
    image.write_to(&mut out)?;
    Ok(out)
}

//! # bmpkit
//!
//! Loader, saver and filters for uncompressed Windows BMP images.
//!
//! ## Supported Formats
//!
//! - **8-bit** palette-indexed images with a 256-entry color table, treated
//!   as grayscale. The header block and color table are kept as loaded and
//!   written back on save.
//! - **24-bit** BGR images.
//!
//! Both bottom-up (positive height) and top-down (negative height) files are
//! accepted; files are always written bottom-up. Info headers larger than the
//! classic 40 bytes are accepted and their extra bytes skipped.
//!
//! ## Filters
//!
//! Negative, brightness, threshold (8-bit), grayscale (24-bit), five 3x3
//! convolution presets plus arbitrary odd-sized [`ops::convolve::Kernel`]s,
//! and histogram equalization (on luma for 24-bit images).
//!
//! ## Non-Goals
//!
//! - Compressed BMP (RLE, bitfields) and 1/4/16/32-bit depths
//! - Any format other than BMP
//!
//! ## Usage
//!
//! ```no_run
//! use bmpkit::{Image, Operation};
//!
//! let mut image = Image::open("input.bmp")?;
//! image.apply(Operation::Brightness(40))?;
//! image.apply(Operation::GaussianBlur)?;
//! image.save("output.bmp")?;
//! # Ok::<(), bmpkit::BmpError>(())
//! ```
//!
//! Probing without decoding pixels:
//!
//! ```no_run
//! let info = bmpkit::ImageInfo::from_path("input.bmp")?;
//! println!("{}x{} {}-bit", info.width, info.height, info.bit_depth());
//! # Ok::<(), bmpkit::BmpError>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod info;
mod limits;
mod pixel;

pub mod bmp;
pub mod buffer;
pub mod header;
pub mod ops;

mod image;
mod session;

// Re-exports
pub use error::{BmpError, ErrorCategory};
pub use image::{ColorImage, GrayImage, Image};
pub use info::ImageInfo;
pub use limits::{Limits, working_set};
pub use ops::Operation;
pub use ops::convolve::{EdgePolicy, Kernel};
pub use ops::equalize::{EqualizationMap, Histogram};
pub use pixel::{BmpPixel, PixelLayout, Yuv};
pub use session::Session;

pub use imgref::{ImgRef, ImgVec};
pub use rgb::alt::BGR8;

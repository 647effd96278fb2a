use rgb::alt::BGR8;

/// Pixel memory layout of a supported BMP variant.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single channel, 8-bit palette index (grayscale ramp).
    Gray8,
    /// 3 channels, 8-bit BGR (on-disk order of 24-bit BMP).
    Bgr8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Bgr8 => 3,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.bytes_per_pixel()
    }

    /// Value of the BMP bit depth field.
    pub fn bit_depth(&self) -> u16 {
        match self {
            Self::Gray8 => 8,
            Self::Bgr8 => 24,
        }
    }

    /// Layout for a BMP bit depth field, if supported.
    pub fn from_bit_depth(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Gray8),
            24 => Some(Self::Bgr8),
            _ => None,
        }
    }
}

/// A sample type that can be moved between a BMP pixel row and memory.
pub trait BmpPixel: Copy {
    const LAYOUT: PixelLayout;
    const ZERO: Self;

    /// Decode one pixel from exactly `LAYOUT.bytes_per_pixel()` bytes.
    fn from_bytes(bytes: &[u8]) -> Self;

    /// Append the on-disk bytes of this pixel.
    fn extend_bytes(self, out: &mut Vec<u8>);
}

impl BmpPixel for u8 {
    const LAYOUT: PixelLayout = PixelLayout::Gray8;
    const ZERO: Self = 0;

    #[inline]
    fn from_bytes(bytes: &[u8]) -> Self {
        bytes[0]
    }

    #[inline]
    fn extend_bytes(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl BmpPixel for BGR8 {
    const LAYOUT: PixelLayout = PixelLayout::Bgr8;
    const ZERO: Self = BGR8 { b: 0, g: 0, r: 0 };

    #[inline]
    fn from_bytes(bytes: &[u8]) -> Self {
        BGR8 {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
        }
    }

    #[inline]
    fn extend_bytes(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.b, self.g, self.r]);
    }
}

/// Round and saturate a filter result to a sample value.
#[inline]
pub(crate) fn clamp_u8(value: f64) -> u8 {
    if value > 255.0 {
        255
    } else if value < 0.0 {
        0
    } else {
        value.round() as u8
    }
}

/// Luma/chroma sample used while equalizing color images.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Yuv {
    pub y: f64,
    pub u: f64,
    pub v: f64,
}

impl Yuv {
    pub fn from_bgr(px: BGR8) -> Self {
        let r = f64::from(px.r);
        let g = f64::from(px.g);
        let b = f64::from(px.b);
        Yuv {
            y: 0.299 * r + 0.587 * g + 0.114 * b,
            u: -0.14713 * r - 0.28886 * g + 0.436 * b,
            v: 0.615 * r - 0.51499 * g - 0.10001 * b,
        }
    }

    pub fn to_bgr(self) -> BGR8 {
        BGR8 {
            r: clamp_u8(self.y + 1.13983 * self.v),
            g: clamp_u8(self.y - 0.39465 * self.u - 0.58060 * self.v),
            b: clamp_u8(self.y + 2.03211 * self.u),
        }
    }

    /// Luma as a histogram bucket.
    #[inline]
    pub fn luma_index(&self) -> u8 {
        clamp_u8(self.y)
    }
}

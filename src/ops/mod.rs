//! Image filters: point operations, convolution and histogram equalization.

pub mod convolve;
pub mod equalize;
pub mod point;

use core::fmt;

/// Every filter the crate offers, applicable through [`crate::Image::apply`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Negative,
    Brightness(i32),
    /// Gray images only.
    Threshold(i32),
    /// Color images only.
    Grayscale,
    BoxBlur,
    GaussianBlur,
    Sharpen,
    Outline,
    Emboss,
    Equalize,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Negative => "negative",
            Operation::Brightness(_) => "brightness",
            Operation::Threshold(_) => "threshold",
            Operation::Grayscale => "grayscale",
            Operation::BoxBlur => "box blur",
            Operation::GaussianBlur => "gaussian blur",
            Operation::Sharpen => "sharpen",
            Operation::Outline => "outline",
            Operation::Emboss => "emboss",
            Operation::Equalize => "histogram equalization",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Brightness(delta) => write!(f, "brightness({delta:+})"),
            Operation::Threshold(level) => write!(f, "threshold({level})"),
            other => f.write_str(other.name()),
        }
    }
}

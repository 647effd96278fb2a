use std::io;

/// Broad class of a [`BmpError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The bytes are not a BMP this crate can handle.
    Format,
    /// Reading or writing the underlying stream failed or came up short.
    Io,
    /// A buffer could not be allocated or would exceed the configured limits.
    Allocation,
    /// The caller asked for something that does not apply to the current state.
    Usage,
}

/// Errors from BMP loading, saving and filtering.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("i/o error: {0}")]
    Io(io::Error),

    #[error("{operation} is not available for {layout:?} images")]
    UnsupportedOperation {
        operation: &'static str,
        layout: crate::PixelLayout,
    },

    #[error("no image loaded")]
    NoImage,
}

impl BmpError {
    /// Which class of failure this is.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnrecognizedFormat
            | Self::InvalidHeader(_)
            | Self::UnsupportedVariant(_)
            | Self::DimensionsTooLarge { .. } => ErrorCategory::Format,
            Self::LimitExceeded(_) | Self::Allocation { .. } => ErrorCategory::Allocation,
            Self::UnexpectedEof | Self::Io(_) => ErrorCategory::Io,
            Self::UnsupportedOperation { .. } | Self::NoImage => ErrorCategory::Usage,
        }
    }
}

impl From<io::Error> for BmpError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            BmpError::UnexpectedEof
        } else {
            BmpError::Io(err)
        }
    }
}

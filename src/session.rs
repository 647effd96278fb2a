//! The "current image" of an interactive run.

use std::path::Path;

use log::info;

use crate::bmp;
use crate::error::BmpError;
use crate::image::Image;
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::ops::Operation;

/// Holds at most one loaded image and routes every request to it.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<Image>,
    limits: Option<Limits>,
}

impl Session {
    #[must_use]
    pub fn new() -> Session {
        Session::default()
    }

    /// A session whose [`open`](Session::open) rejects images beyond `limits`.
    #[must_use]
    pub fn with_limits(limits: Limits) -> Session {
        Session {
            current: None,
            limits: Some(limits),
        }
    }

    /// Load `path`, replacing the current image.
    ///
    /// The previous image is released before loading, so on failure the
    /// session is empty.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<&Image, BmpError> {
        let path = path.as_ref();
        self.current = None;
        let image = bmp::decode::open(path, self.limits.as_ref())?;
        info!(
            "opened {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            image.layout()
        );
        Ok(self.current.insert(image))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BmpError> {
        let path = path.as_ref();
        self.image()?.save(path)?;
        info!("saved {}", path.display());
        Ok(())
    }

    /// Apply `op` to the current image. On failure the image is kept.
    pub fn apply(&mut self, op: Operation) -> Result<(), BmpError> {
        self.current.as_mut().ok_or(BmpError::NoImage)?.apply(op)
    }

    pub fn info(&self) -> Result<ImageInfo, BmpError> {
        Ok(self.image()?.info())
    }

    pub fn image(&self) -> Result<&Image, BmpError> {
        self.current.as_ref().ok_or(BmpError::NoImage)
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Replace the current image with one built in memory.
    pub fn set(&mut self, image: Image) {
        self.current = Some(image);
    }

    /// Drop the current image, returning it.
    pub fn close(&mut self) -> Option<Image> {
        self.current.take()
    }
}

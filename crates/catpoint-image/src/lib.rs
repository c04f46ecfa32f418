//! `catpoint-image` – Cat detection.
//!
//! Defines the [`ImageService`] trait the security service consults when a
//! camera frame is submitted, plus two simulated detectors that stand in for
//! a real image classifier.
//!
//! # Modules
//!
//! - [`fake`] – [`FakeImageService`][fake::FakeImageService]: answers at
//!   random, ignoring the pixels.
//! - [`scripted`] – [`ScriptedImageService`][scripted::ScriptedImageService]:
//!   replays a queue of verdicts, then a fixed fallback.

use catpoint_types::{CameraImage, CatpointError};

pub mod fake;
pub mod scripted;

pub use fake::FakeImageService;
pub use scripted::ScriptedImageService;

/// A cat classifier.
pub trait ImageService: Send {
    /// Return `true` when `image` contains a cat with at least
    /// `confidence_threshold` percent confidence.
    ///
    /// # Errors
    ///
    /// Returns [`CatpointError::Detector`] when the classifier cannot be
    /// reached, or [`CatpointError::InvalidImage`] when the frame is unusable.
    fn image_contains_cat(
        &mut self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, CatpointError>;
}

impl<T: ImageService + ?Sized> ImageService for Box<T> {
    fn image_contains_cat(
        &mut self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, CatpointError> {
        (**self).image_contains_cat(image, confidence_threshold)
    }
}

/// Reject frames without pixels.
pub(crate) fn ensure_not_empty(image: &CameraImage) -> Result<(), CatpointError> {
    if image.is_empty() {
        return Err(CatpointError::InvalidImage(format!(
            "{}x{} frame with {} bytes",
            image.width,
            image.height,
            image.data.len()
        )));
    }
    Ok(())
}

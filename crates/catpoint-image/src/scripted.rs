//! [`ScriptedImageService`] – a classifier with predetermined answers.
//!
//! Verdicts queued with [`ScriptedImageService::push`] are returned first,
//! oldest first; once the queue is drained every call returns the fallback
//! verdict. A queued error is returned once, in its turn.

use std::collections::VecDeque;

use catpoint_types::{CameraImage, CatpointError};
use tracing::debug;

use crate::{ImageService, ensure_not_empty};

/// Classifier that replays queued verdicts.
///
/// # Example
///
/// ```
/// use catpoint_image::{ImageService, ScriptedImageService};
/// use catpoint_types::CameraImage;
///
/// let mut detector = ScriptedImageService::always(false);
/// detector.push(Ok(true));
///
/// let frame = CameraImage::new(1, 1, vec![0]);
/// assert_eq!(detector.image_contains_cat(&frame, 50.0), Ok(true));
/// assert_eq!(detector.image_contains_cat(&frame, 50.0), Ok(false));
/// ```
#[derive(Debug, Default)]
pub struct ScriptedImageService {
    queue: VecDeque<Result<bool, CatpointError>>,
    fallback: bool,
    thresholds: Vec<f32>,
}

impl ScriptedImageService {
    /// A detector that always answers `verdict`.
    pub fn always(verdict: bool) -> Self {
        Self {
            fallback: verdict,
            ..Self::default()
        }
    }

    /// Queue the answer for a future call.
    pub fn push(&mut self, verdict: Result<bool, CatpointError>) {
        self.queue.push_back(verdict);
    }

    /// Change the answer given once the queue is empty.
    pub fn set_fallback(&mut self, verdict: bool) {
        self.fallback = verdict;
    }

    /// Confidence thresholds received so far, one per call.
    pub fn thresholds(&self) -> &[f32] {
        &self.thresholds
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.thresholds.len()
    }
}

impl ImageService for ScriptedImageService {
    fn image_contains_cat(
        &mut self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, CatpointError> {
        self.thresholds.push(confidence_threshold);
        ensure_not_empty(image)?;
        let verdict = self.queue.pop_front().unwrap_or(Ok(self.fallback));
        debug!(?verdict, confidence_threshold, "scripted classifier verdict");
        verdict
    }
}

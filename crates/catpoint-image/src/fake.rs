//! [`FakeImageService`] – a coin-flip classifier.
//!
//! Useful for exercising the alarm flow without a model: every non-empty
//! frame is judged to contain a cat with probability one half, regardless
//! of its pixels or the requested confidence threshold.

use catpoint_types::{CameraImage, CatpointError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::{ImageService, ensure_not_empty};

/// Classifier that answers at random.
///
/// # Example
///
/// ```
/// use catpoint_image::{FakeImageService, ImageService};
/// use catpoint_types::CameraImage;
///
/// let mut detector = FakeImageService::with_seed(7);
/// let frame = CameraImage::new(1, 1, vec![0]);
/// assert!(detector.image_contains_cat(&frame, 50.0).is_ok());
/// ```
pub struct FakeImageService {
    rng: StdRng,
}

impl FakeImageService {
    /// Create a detector seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a detector with a fixed seed, for reproducible runs.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for FakeImageService {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageService for FakeImageService {
    fn image_contains_cat(
        &mut self,
        image: &CameraImage,
        confidence_threshold: f32,
    ) -> Result<bool, CatpointError> {
        ensure_not_empty(image)?;
        let verdict = self.rng.gen_bool(0.5);
        debug!(verdict, confidence_threshold, "fake classifier verdict");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> CameraImage {
        CameraImage::new(2, 2, vec![0u8; 12])
    }

    #[test]
    fn same_seed_gives_same_verdicts() {
        let mut a = FakeImageService::with_seed(42);
        let mut b = FakeImageService::with_seed(42);
        for _ in 0..16 {
            assert_eq!(
                a.image_contains_cat(&frame(), 50.0).unwrap(),
                b.image_contains_cat(&frame(), 50.0).unwrap()
            );
        }
    }

    #[test]
    fn produces_both_verdicts() {
        let mut detector = FakeImageService::with_seed(1);
        let verdicts: Vec<bool> = (0..64)
            .map(|_| detector.image_contains_cat(&frame(), 50.0).unwrap())
            .collect();
        assert!(verdicts.contains(&true));
        assert!(verdicts.contains(&false));
    }

    #[test]
    fn empty_frame_is_rejected() {
        let mut detector = FakeImageService::with_seed(1);
        let result = detector.image_contains_cat(&CameraImage::default(), 50.0);
        assert!(matches!(result, Err(CatpointError::InvalidImage(_))));
    }
}

//! Per-request memoization of the detected face region.

use std::sync::Arc;

use image::RgbImage;

use crate::error::ManeError;
use crate::filter::{Filter, TargetShape};
use crate::localizer::FaceLocalizer;
use crate::region::{Region, extract_region, extract_region_resized};

/// Caches the detected region for a single image identity.
///
/// Wraps a shared [`FaceLocalizer`] and remembers the last
/// `(image, region)` pair so that several crops of the same image within one
/// request run detection only once. The cache key is the image's identity
/// (its address), never its pixel content: a different image instance with
/// identical pixels recomputes, and no deep comparison is ever paid.
///
/// A cache entry is only meaningful while the caller keeps the keyed image
/// alive, which holds for the request-scoped lifecycle this type is built
/// for. Construct one per request; the raw-pointer slot makes the type
/// deliberately non-`Send`, so it cannot be shared across request threads.
pub struct CachedLocalizer {
    localizer: Arc<FaceLocalizer>,
    slot: Option<(*const RgbImage, Region)>,
}

impl CachedLocalizer {
    /// Create a fresh, empty cache over a shared localizer.
    pub fn new(localizer: Arc<FaceLocalizer>) -> Self {
        Self {
            localizer,
            slot: None,
        }
    }

    /// The region for `image`, from the cache when the identity matches.
    pub fn region_for(&mut self, image: &RgbImage) -> Result<Region, ManeError> {
        if let Some((cached, region)) = self.slot {
            if std::ptr::eq(cached, image) {
                return Ok(region);
            }
        }
        let region = self.localizer.detect_region(image)?;
        self.slot = Some((image as *const RgbImage, region));
        Ok(region)
    }
}

impl Filter for CachedLocalizer {
    fn eval(
        &mut self,
        image: &RgbImage,
        output_shape: Option<TargetShape>,
    ) -> Result<RgbImage, ManeError> {
        let region = self.region_for(image)?;
        Ok(match output_shape {
            Some(target) => extract_region_resized(image, region, target),
            None => extract_region(image, region),
        })
    }
}

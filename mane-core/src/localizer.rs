//! Face localization over an opaque detection backend.

use std::sync::{Mutex, PoisonError};

use image::{GrayImage, RgbImage, imageops};
use log::debug;
use mane_utils::timing_guard;

use crate::error::ManeError;
use crate::filter::{Filter, TargetShape};
use crate::region::{Region, extract_region, extract_region_resized};

/// Tuning passed to the detection backend on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Coarse-to-fine search multiplier between detector scales.
    pub scale_factor: f32,
    /// Smallest face size considered, in pixels (width, height). Detections
    /// below this floor are treated as spurious.
    pub min_size: (u32, u32),
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.3,
            min_size: (100, 100),
        }
    }
}

/// Opaque face-detection capability.
///
/// Implementations receive the single-channel intensity conversion of the
/// input and return zero or more candidate regions. Backends are not assumed
/// to be reentrant; [`FaceLocalizer`] serializes calls into one instance.
pub trait FaceDetector: Send {
    /// Detect candidate face regions in `gray`.
    fn detect(&mut self, gray: &GrayImage, params: &DetectionParams) -> Vec<Region>;
}

/// Locates the dominant face in an image.
///
/// The detector handle lives behind a mutex scoped to this instance, so
/// concurrent detections on one localizer serialize while independent
/// localizers run in parallel.
pub struct FaceLocalizer {
    detector: Mutex<Box<dyn FaceDetector>>,
    params: DetectionParams,
}

impl FaceLocalizer {
    /// Wrap a detection backend with default [`DetectionParams`].
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self::with_params(detector, DetectionParams::default())
    }

    /// Wrap a detection backend with explicit parameters.
    pub fn with_params(detector: Box<dyn FaceDetector>, params: DetectionParams) -> Self {
        Self {
            detector: Mutex::new(detector),
            params,
        }
    }

    /// The parameters handed to the backend on each detection.
    pub fn params(&self) -> DetectionParams {
        self.params
    }

    /// Detect the dominant face region in `image`.
    ///
    /// When the backend reports several candidates, the region with the
    /// lexicographically largest `(width, height)` pair wins: the widest
    /// face, then the tallest among equally wide ones. Zero candidates fail
    /// with [`ManeError::FaceUnrecognized`].
    pub fn detect_region(&self, image: &RgbImage) -> Result<Region, ManeError> {
        let _guard = timing_guard("mane_core::detect_region", log::Level::Debug);
        let gray = imageops::grayscale(image);
        let candidates = {
            let mut detector = self
                .detector
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            detector.detect(&gray, &self.params)
        };
        debug!("detector returned {} candidate region(s)", candidates.len());

        let mut best: Option<Region> = None;
        for candidate in candidates {
            let wins = match best {
                None => true,
                Some(current) => {
                    (candidate.width, candidate.height) > (current.width, current.height)
                }
            };
            if wins {
                best = Some(candidate);
            }
        }
        best.ok_or(ManeError::FaceUnrecognized)
    }
}

impl Filter for FaceLocalizer {
    fn eval(
        &mut self,
        image: &RgbImage,
        output_shape: Option<TargetShape>,
    ) -> Result<RgbImage, ManeError> {
        let region = self.detect_region(image)?;
        Ok(match output_shape {
            Some(target) => extract_region_resized(image, region, target),
            None => extract_region(image, region),
        })
    }
}

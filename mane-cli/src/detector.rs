//! SeetaFace detection backend for the pipeline's localizer seam.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use image::GrayImage;
use mane_core::{DetectionParams, FaceDetector, Region};

/// Face detector backed by the `rustface` crate (SeetaFace engine).
///
/// Only the parsed model is held here; the engine's detector object is
/// rebuilt per call from a model clone, since it is cheap to construct and
/// not shareable across threads the way the model data is.
pub struct SeetaFaceDetector {
    model: rustface::Model,
}

impl SeetaFaceDetector {
    /// Load the SeetaFace model from disk and wrap it as a pipeline backend.
    pub fn from_model_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open detection model {}", path.display()))?;
        let model = rustface::read_model(BufReader::new(file))
            .with_context(|| format!("failed to parse detection model {}", path.display()))?;
        Ok(Self { model })
    }
}

impl FaceDetector for SeetaFaceDetector {
    fn detect(&mut self, gray: &GrayImage, params: &DetectionParams) -> Vec<Region> {
        let (min_w, min_h) = params.min_size;

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(min_w.min(min_h).max(1));
        // SeetaFace shrinks its pyramid by a factor below one; the pipeline
        // expresses the same search as a >= 1 growth multiplier
        detector.set_pyramid_scale_factor((1.0 / params.scale_factor.max(1.01)).clamp(0.1, 0.99));
        detector.set_score_thresh(2.0);
        detector.set_slide_window_step(4, 4);

        let data = rustface::ImageData::new(gray.as_raw(), gray.width(), gray.height());
        let (img_w, img_h) = (i64::from(gray.width()), i64::from(gray.height()));

        detector
            .detect(&data)
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                let x = i64::from(bbox.x()).clamp(0, img_w);
                let y = i64::from(bbox.y()).clamp(0, img_h);
                let right = (i64::from(bbox.x()) + i64::from(bbox.width())).clamp(0, img_w);
                let bottom = (i64::from(bbox.y()) + i64::from(bbox.height())).clamp(0, img_h);
                let width = (right - x) as u32;
                let height = (bottom - y) as u32;
                // the engine's floor is a single side length; enforce the
                // two-sided floor here and drop border-clipped slivers
                if width >= min_w && height >= min_h {
                    Some(Region::new(x as u32, y as u32, width, height))
                } else {
                    None
                }
            })
            .collect()
    }
}

//! High-level entry points over the inference pipeline.
//!
//! Both pipelines hold long-lived, shareable stage handles and construct a
//! fresh [`CachedLocalizer`] per invocation, so detection memoization stays
//! request-scoped and can never leak state across callers.

use std::sync::Arc;

use image::RgbImage;
use mane_utils::timing_guard;

use crate::cache::CachedLocalizer;
use crate::classifier::{FaceShapeClassifier, LabeledProbability};
use crate::error::ManeError;
use crate::filter::Filter;
use crate::localizer::FaceLocalizer;
use crate::recommend::{HairstyleCatalog, HairstyleRecommendation, aggregate_recommendations};

/// Classifies the dominant face in a photograph into a shape label.
pub struct ShapePipeline {
    localizer: Arc<FaceLocalizer>,
    classifier: Arc<FaceShapeClassifier>,
}

impl ShapePipeline {
    /// Compose a pipeline from shared stage handles.
    pub fn new(localizer: Arc<FaceLocalizer>, classifier: Arc<FaceShapeClassifier>) -> Self {
        Self {
            localizer,
            classifier,
        }
    }

    /// Locate, crop, and classify the dominant face, returning the top label
    /// with its probability.
    pub fn classify_face_shape(&self, image: &RgbImage) -> Result<LabeledProbability, ManeError> {
        let _guard = timing_guard("mane_core::classify_face_shape", log::Level::Debug);
        let mut localizer = CachedLocalizer::new(Arc::clone(&self.localizer));
        let face = localizer.eval(image, self.classifier.input_shape())?;
        let mut ranked = self.classifier.eval(&face, Some(1))?;
        ranked
            .pop()
            .ok_or_else(|| ManeError::Inference("classifier returned no ranked labels".to_string()))
    }
}

/// Ranks catalog hairstyles against the classified shape distribution.
pub struct RecommendationPipeline {
    localizer: Arc<FaceLocalizer>,
    classifier: Arc<FaceShapeClassifier>,
    catalog: Arc<dyn HairstyleCatalog>,
}

impl RecommendationPipeline {
    /// Compose a pipeline from shared stage handles and a catalog.
    pub fn new(
        localizer: Arc<FaceLocalizer>,
        classifier: Arc<FaceShapeClassifier>,
        catalog: Arc<dyn HairstyleCatalog>,
    ) -> Self {
        Self {
            localizer,
            classifier,
            catalog,
        }
    }

    /// Classify the dominant face, expand all five shape features through
    /// the catalog, and return the merged, ranked recommendations.
    pub fn recommend_hairstyles(
        &self,
        image: &RgbImage,
    ) -> Result<Vec<HairstyleRecommendation>, ManeError> {
        let _guard = timing_guard("mane_core::recommend_hairstyles", log::Level::Debug);
        let mut localizer = CachedLocalizer::new(Arc::clone(&self.localizer));
        let face = localizer.eval(image, self.classifier.input_shape())?;
        let ranked = self.classifier.eval(&face, None)?;
        aggregate_recommendations(&ranked, self.catalog.as_ref())
    }
}

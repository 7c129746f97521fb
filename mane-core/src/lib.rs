//! Face-shape inference pipeline and hairstyle recommendation ranking.
//!
//! The pipeline is a chain of composable image-transform stages: a face
//! localizer over an opaque detection backend, a geometry-aware crop/resize,
//! and a shape classifier over an opaque model backend. Stage geometry flows
//! upstream (`localizer.eval(image, classifier.input_shape())`), so the
//! chain self-configures without hard-coded dimensions. A separate
//! aggregation step merges per-feature hairstyle matches into one ranked
//! list.
//!
//! This crate never touches encoded bytes, model files, or storage: it
//! receives decoded images and already-constructed detector, model, and
//! catalog capabilities.

/// Per-request detection memoization.
pub mod cache;
/// Face-shape classification over an opaque model backend.
pub mod classifier;
/// Pipeline error taxonomy.
pub mod error;
/// The stage capability (`input_shape` / `eval`).
pub mod filter;
/// Face localization over an opaque detection backend.
pub mod localizer;
/// High-level classify/recommend entry points.
pub mod pipeline;
/// Recommendation aggregation and the catalog seam.
pub mod recommend;
/// Region geometry and crop extraction.
pub mod region;

pub use cache::CachedLocalizer;
pub use classifier::{FaceShapeClassifier, LabeledProbability, SHAPE_LABELS, ShapeModel};
pub use error::ManeError;
pub use filter::{Filter, TargetShape};
pub use localizer::{DetectionParams, FaceDetector, FaceLocalizer};
pub use pipeline::{RecommendationPipeline, ShapePipeline};
pub use recommend::{
    HairstyleCatalog, HairstyleRecommendation, MemoryCatalog, aggregate_recommendations,
};
pub use region::{CropBox, Region, aspect_crop_box, extract_region, extract_region_resized};

/// Returns the crate version for diagnostics.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

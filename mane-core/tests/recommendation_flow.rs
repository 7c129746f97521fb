//! End-to-end pipeline flow over synthetic images and stub backends.

use std::collections::HashMap;
use std::sync::Arc;

use image::{GrayImage, Rgb, RgbImage};
use ndarray::Array3;
use serde::Deserialize;

use mane_core::{
    DetectionParams, FaceDetector, FaceLocalizer, FaceShapeClassifier, ManeError, MemoryCatalog,
    RecommendationPipeline, Region, ShapeModel, ShapePipeline,
};
use mane_utils::load_fixture_json;

/// Finds the bounding box of bright pixels, honoring the minimum-size floor.
struct BrightRegionDetector;

impl FaceDetector for BrightRegionDetector {
    fn detect(&mut self, gray: &GrayImage, params: &DetectionParams) -> Vec<Region> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        let mut found = false;
        for (x, y, pixel) in gray.enumerate_pixels() {
            if pixel.0[0] > 200 {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
                found = true;
            }
        }
        if !found {
            return Vec::new();
        }
        let region = Region::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1);
        if region.width < params.min_size.0 || region.height < params.min_size.1 {
            return Vec::new();
        }
        vec![region]
    }
}

/// Always rates `round_face` highest.
struct RoundFaceModel;

impl ShapeModel for RoundFaceModel {
    fn infer(&mut self, _input: &Array3<f32>) -> Result<Vec<f32>, ManeError> {
        // heart, oblong, oval, round, square
        Ok(vec![0.04, 0.06, 0.15, 0.7, 0.05])
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFixture {
    featured: HashMap<String, Vec<String>>,
    images: HashMap<String, String>,
}

fn synthetic_face_photo() -> RgbImage {
    let mut photo = RgbImage::from_pixel(640, 480, Rgb([30, 30, 30]));
    for y in 120..300 {
        for x in 240..400 {
            photo.put_pixel(x, y, Rgb([230, 220, 210]));
        }
    }
    photo
}

fn fixture_catalog() -> MemoryCatalog {
    let fixture: CatalogFixture =
        load_fixture_json("catalog/round_catalog.json").expect("catalog fixture");
    MemoryCatalog::new(fixture.featured, fixture.images)
}

#[test]
fn synthetic_face_classifies_as_round() {
    let localizer = Arc::new(FaceLocalizer::new(Box::new(BrightRegionDetector)));
    let classifier = Arc::new(FaceShapeClassifier::new(Box::new(RoundFaceModel)));
    let pipeline = ShapePipeline::new(localizer, classifier);

    let top = pipeline.classify_face_shape(&synthetic_face_photo()).unwrap();
    assert_eq!(top.label, "round_face");
    assert!((top.probability - 0.7).abs() < f32::EPSILON);
}

#[test]
fn round_face_yields_round_hair_as_top_recommendation() {
    let localizer = Arc::new(FaceLocalizer::new(Box::new(BrightRegionDetector)));
    let classifier = Arc::new(FaceShapeClassifier::new(Box::new(RoundFaceModel)));
    let pipeline =
        RecommendationPipeline::new(localizer, classifier, Arc::new(fixture_catalog()));

    let recommendations = pipeline
        .recommend_hairstyles(&synthetic_face_photo())
        .unwrap();

    assert_eq!(recommendations.len(), 5);
    assert_eq!(recommendations[0].hairstyle, "round_hair");
    assert_eq!(recommendations[0].image, "images/round_hair.png");
    assert!((recommendations[0].probability - 0.7).abs() < f32::EPSILON);
    for pair in recommendations.windows(2) {
        assert!(pair[0].probability >= pair[1].probability);
    }
}

#[test]
fn detector_locates_the_synthetic_rectangle_exactly() {
    let localizer = FaceLocalizer::new(Box::new(BrightRegionDetector));
    let region = localizer.detect_region(&synthetic_face_photo()).unwrap();
    assert_eq!(region, Region::new(240, 120, 160, 180));
}

#[test]
fn faces_below_the_size_floor_are_rejected() {
    let mut photo = RgbImage::from_pixel(640, 480, Rgb([30, 30, 30]));
    for y in 120..160 {
        for x in 240..280 {
            photo.put_pixel(x, y, Rgb([230, 220, 210]));
        }
    }

    let localizer = FaceLocalizer::new(Box::new(BrightRegionDetector));
    assert!(matches!(
        localizer.detect_region(&photo),
        Err(ManeError::FaceUnrecognized)
    ));
}

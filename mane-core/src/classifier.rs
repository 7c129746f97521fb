//! Face-shape classification over an opaque model backend.

use std::cmp::Ordering;
use std::sync::{Mutex, PoisonError};

use image::{RgbImage, imageops};
use log::debug;
use mane_utils::timing_guard;
use ndarray::Array3;

use crate::error::ManeError;
use crate::filter::TargetShape;

/// The fixed label set, in model output order.
pub const SHAPE_LABELS: [&str; 5] = [
    "heart_face",
    "oblong_face",
    "oval_face",
    "round_face",
    "square_face",
];

/// One classified label with its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledProbability {
    /// The face-shape label.
    pub label: String,
    /// Confidence in `[0, 1]`.
    pub probability: f32,
}

/// Opaque inference capability behind the classifier.
///
/// Implementations receive a `(height, width, 1)` tensor of intensities
/// normalized into `[0, 1]` and return one probability per entry of
/// [`SHAPE_LABELS`], in that order. Backends are not assumed to be
/// reentrant; [`FaceShapeClassifier`] serializes calls into one instance.
pub trait ShapeModel: Send {
    /// Run the model over a prepared input tensor.
    fn infer(&mut self, input: &Array3<f32>) -> Result<Vec<f32>, ManeError>;
}

/// Classifies a normalized face crop into a ranked shape distribution.
pub struct FaceShapeClassifier {
    model: Mutex<Box<dyn ShapeModel>>,
}

impl FaceShapeClassifier {
    /// The geometry every face crop must be resized to before classification.
    pub const INPUT_SHAPE: TargetShape = TargetShape::new(190, 250, 1);

    /// Wrap an inference backend.
    pub fn new(model: Box<dyn ShapeModel>) -> Self {
        Self {
            model: Mutex::new(model),
        }
    }

    /// The input geometry, in the form upstream stages consume.
    pub fn input_shape(&self) -> Option<TargetShape> {
        Some(Self::INPUT_SHAPE)
    }

    /// Classify `face` and return labels ranked by probability descending.
    ///
    /// Ties keep model output order (the sort is stable). With `top`
    /// present, only the first `top` entries are returned; a request outside
    /// `1..=5` fails with [`ManeError::InvalidOutputShape`].
    pub fn eval(
        &self,
        face: &RgbImage,
        top: Option<usize>,
    ) -> Result<Vec<LabeledProbability>, ManeError> {
        if let Some(count) = top {
            if count == 0 || count > SHAPE_LABELS.len() {
                return Err(ManeError::InvalidOutputShape {
                    requested: count,
                    limit: SHAPE_LABELS.len(),
                });
            }
        }

        let expected = Self::INPUT_SHAPE;
        if face.width() != expected.width || face.height() != expected.height {
            return Err(ManeError::InputGeometry {
                expected_width: expected.width,
                expected_height: expected.height,
                actual_width: face.width(),
                actual_height: face.height(),
            });
        }

        let gray = imageops::grayscale(face);
        let mut input = Array3::<f32>::zeros((
            expected.height as usize,
            expected.width as usize,
            expected.channels as usize,
        ));
        for (x, y, pixel) in gray.enumerate_pixels() {
            input[[y as usize, x as usize, 0]] = f32::from(pixel.0[0]) / 255.0;
        }

        let probabilities = {
            let _guard = timing_guard("mane_core::shape_inference", log::Level::Debug);
            let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
            model.infer(&input)?
        };
        if probabilities.len() != SHAPE_LABELS.len() {
            return Err(ManeError::Inference(format!(
                "model returned {} probabilities, expected {}",
                probabilities.len(),
                SHAPE_LABELS.len()
            )));
        }
        debug!("shape probabilities: {probabilities:?}");

        let mut ranked: Vec<LabeledProbability> = SHAPE_LABELS
            .iter()
            .zip(probabilities)
            .map(|(label, probability)| LabeledProbability {
                label: (*label).to_string(),
                probability,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
        });

        if let Some(count) = top {
            ranked.truncate(count);
        }
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    struct FixedModel {
        output: Vec<f32>,
    }

    impl ShapeModel for FixedModel {
        fn infer(&mut self, _input: &Array3<f32>) -> Result<Vec<f32>, ManeError> {
            Ok(self.output.clone())
        }
    }

    fn classifier_with(output: Vec<f32>) -> FaceShapeClassifier {
        FaceShapeClassifier::new(Box::new(FixedModel { output }))
    }

    fn face_image(luma: u8) -> RgbImage {
        RgbImage::from_pixel(190, 250, image::Rgb([luma, luma, luma]))
    }

    #[test]
    fn output_is_sorted_descending_with_all_five_labels() {
        let classifier = classifier_with(vec![0.1, 0.3, 0.05, 0.45, 0.1]);
        let ranked = classifier.eval(&face_image(128), None).unwrap();

        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].label, "round_face");
        assert_eq!(ranked[1].label, "oblong_face");
        for pair in ranked.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        let mut labels: Vec<&str> = ranked.iter().map(|lp| lp.label.as_str()).collect();
        labels.sort_unstable();
        let mut expected = SHAPE_LABELS.to_vec();
        expected.sort_unstable();
        assert_eq!(labels, expected);
    }

    #[test]
    fn ties_keep_model_output_order() {
        let classifier = classifier_with(vec![0.2, 0.2, 0.2, 0.2, 0.2]);
        let ranked = classifier.eval(&face_image(128), None).unwrap();
        let labels: Vec<&str> = ranked.iter().map(|lp| lp.label.as_str()).collect();
        assert_eq!(labels, SHAPE_LABELS.to_vec());
    }

    #[test]
    fn truncation_returns_top_k() {
        let classifier = classifier_with(vec![0.1, 0.3, 0.05, 0.45, 0.1]);
        let top = classifier.eval(&face_image(128), Some(2)).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "round_face");
    }

    #[test]
    fn zero_and_oversized_truncation_are_rejected() {
        let classifier = classifier_with(vec![0.2; 5]);
        assert!(matches!(
            classifier.eval(&face_image(128), Some(0)),
            Err(ManeError::InvalidOutputShape {
                requested: 0,
                limit: 5
            })
        ));
        assert!(matches!(
            classifier.eval(&face_image(128), Some(6)),
            Err(ManeError::InvalidOutputShape {
                requested: 6,
                limit: 5
            })
        ));
    }

    #[test]
    fn mismatched_input_geometry_is_rejected() {
        let classifier = classifier_with(vec![0.2; 5]);
        let wrong = RgbImage::new(250, 190);
        assert!(matches!(
            classifier.eval(&wrong, None),
            Err(ManeError::InputGeometry { .. })
        ));
    }

    #[test]
    fn intensities_are_normalized_to_unit_range() {
        struct CapturingModel {
            seen: Arc<StdMutex<Option<Array3<f32>>>>,
        }
        impl ShapeModel for CapturingModel {
            fn infer(&mut self, input: &Array3<f32>) -> Result<Vec<f32>, ManeError> {
                *self.seen.lock().unwrap() = Some(input.clone());
                Ok(vec![0.2; 5])
            }
        }

        let seen = Arc::new(StdMutex::new(None));
        let classifier = FaceShapeClassifier::new(Box::new(CapturingModel { seen: seen.clone() }));

        classifier.eval(&face_image(255), None).unwrap();
        let input = seen.lock().unwrap().take().unwrap();
        assert_eq!(input.dim(), (250, 190, 1));
        assert!(input.iter().all(|&v| (v - 1.0).abs() < f32::EPSILON));

        classifier.eval(&face_image(0), None).unwrap();
        let input = seen.lock().unwrap().take().unwrap();
        assert!(input.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn wrong_probability_count_is_an_inference_error() {
        let classifier = classifier_with(vec![0.5, 0.5]);
        assert!(matches!(
            classifier.eval(&face_image(128), None),
            Err(ManeError::Inference(_))
        ));
    }
}

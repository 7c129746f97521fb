//! Face-shape classifier ONNX runner for the pipeline's model seam.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, warn};
use mane_core::{ManeError, ShapeModel};
use ndarray::Array3;
use tract_onnx::prelude::{
    Framework, Graph, InferenceModelExt, IntoTensor, SimplePlan, Tensor, TypedFact, TypedOp, tvec,
};

type RunnableModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Runs the face-shape classifier ONNX graph with `tract-onnx`.
///
/// The graph takes a `[1, height, width, 1]` normalized intensity tensor and
/// produces a `[1, 5]` probability row, one entry per shape label.
pub struct OnnxShapeModel {
    runnable: RunnableModel,
}

impl OnnxShapeModel {
    /// Load and optimize the classifier graph for execution.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        anyhow::ensure!(path.exists(), "model file not found: {}", path.display());

        let runnable = match load_runnable_model(path, true) {
            Ok(model) => {
                debug!("classifier model {} optimized successfully", path.display());
                model
            }
            Err(opt_err) => {
                warn!(
                    "classifier model {} failed optimized load ({opt_err}); falling back to decluttered graph",
                    path.display()
                );
                load_runnable_model(path, false).with_context(|| {
                    format!(
                        "fallback to decluttered classifier graph failed after optimize error: {opt_err}"
                    )
                })?
            }
        };

        Ok(Self { runnable })
    }
}

fn load_runnable_model(path: &Path, optimized: bool) -> Result<RunnableModel> {
    let model = tract_onnx::onnx()
        .model_for_path(path)
        .with_context(|| format!("failed to parse ONNX graph from {}", path.display()))?;

    if optimized {
        model
            .into_optimized()
            .map_err(|e| anyhow::anyhow!("unable to optimize classifier graph: {e}"))?
            .into_runnable()
            .map_err(|e| anyhow::anyhow!("unable to make classifier graph runnable: {e}"))
    } else {
        model
            .into_typed()
            .map_err(|e| anyhow::anyhow!("unable to type-check classifier graph: {e}"))?
            .into_decluttered()
            .map_err(|e| anyhow::anyhow!("unable to declutter classifier graph: {e}"))?
            .into_runnable()
            .map_err(|e| anyhow::anyhow!("unable to make classifier graph runnable: {e}"))
    }
}

impl ShapeModel for OnnxShapeModel {
    fn infer(&mut self, input: &Array3<f32>) -> Result<Vec<f32>, ManeError> {
        let (height, width, channels) = input.dim();
        let data: Vec<f32> = input.iter().copied().collect();
        let tensor = Tensor::from_shape(&[1, height, width, channels], &data)
            .map_err(|e| ManeError::Inference(format!("failed to shape input tensor: {e}")))?;

        let outputs = self
            .runnable
            .run(tvec![tensor.into()])
            .map_err(|e| ManeError::Inference(format!("classifier execution failed: {e}")))?;

        let output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| ManeError::Inference("classifier produced no outputs".to_string()))?
            .into_tensor();
        let probabilities = output
            .as_slice::<f32>()
            .map_err(|e| ManeError::Inference(format!("unexpected output tensor layout: {e}")))?;
        Ok(probabilities.to_vec())
    }
}

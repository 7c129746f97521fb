//! The pipeline stage capability shared by localization and classification.
//!
//! Stages are composed by explicit chaining: a downstream stage's
//! [`input_shape`](Filter::input_shape) is fed as the `output_shape` argument
//! of the upstream stage's [`eval`](Filter::eval), so the pipeline
//! self-configures without hard-coded dimensions.

use image::RgbImage;

use crate::error::ManeError;

/// Pixel geometry a pipeline stage consumes or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetShape {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Number of color channels.
    pub channels: u8,
}

impl TargetShape {
    /// Construct a shape from its width, height, and channel count.
    pub const fn new(width: u32, height: u32, channels: u8) -> Self {
        Self {
            width,
            height,
            channels,
        }
    }
}

/// An image-to-image transform stage.
///
/// `eval` takes `&mut self` because per-request stages (the detection cache)
/// carry mutable state; stateless stages simply ignore the exclusivity.
pub trait Filter {
    /// The geometry this stage expects its input resized to, if any.
    ///
    /// `None` means the stage accepts arbitrary input dimensions.
    fn input_shape(&self) -> Option<TargetShape> {
        None
    }

    /// Transform `image`, optionally cropping and resizing the result to
    /// `output_shape`. With `None`, the stage returns its raw output.
    fn eval(
        &mut self,
        image: &RgbImage,
        output_shape: Option<TargetShape>,
    ) -> Result<RgbImage, ManeError>;
}

use thiserror::Error;

/// Error type returned by mane-core pipeline operations.
///
/// None of these conditions are retried internally: they signal either an
/// unusable input or caller misuse, never a transient fault. Front ends are
/// expected to map each variant onto a distinct client-facing status.
#[derive(Debug, Error)]
pub enum ManeError {
    /// No face region was found in the supplied image.
    #[error("no face was recognized in the supplied image")]
    FaceUnrecognized,

    /// The classifier was asked to truncate to an out-of-range label count.
    #[error("output shape must request between 1 and {limit} labels, got {requested}")]
    InvalidOutputShape { requested: usize, limit: usize },

    /// A feature key has no configured hairstyles in the catalog.
    #[error("feature '{0}' has no configured hairstyles")]
    UnknownFeature(String),

    /// A hairstyle has no stored image reference in the catalog.
    #[error("hairstyle '{0}' has no stored image")]
    UnknownHairstyle(String),

    /// The classifier received a face crop whose geometry does not match its
    /// declared input shape.
    #[error("classifier expects a {expected_width}x{expected_height} input, got {actual_width}x{actual_height}")]
    InputGeometry {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The underlying shape model failed to produce a probability vector.
    #[error("shape model inference failed: {0}")]
    Inference(String),
}

//! Layer-related error types.

use thiserror::Error;

/// Errors that can occur while configuring or running layers.
///
/// Backend failures (shape mismatches inside tensor kernels, device errors)
/// are not wrapped here; they propagate from Burn unmodified.
#[derive(Debug, Error)]
pub enum LayerError {
    /// An elementwise layer was configured with the identity activation,
    /// which would make it a no-op node in the graph.
    #[error("Elementwise layers require a nonlinearity; identity is not allowed")]
    IdentityElementwise,

    /// A layer was initialized before its dimensions could be resolved.
    #[error("Layer shape is unresolved: {message}")]
    UnresolvedShape { message: String },

    /// Conflicting shape hints.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Invalid combination of layer options or hyperparameters.
    #[error("Invalid layer configuration: {message}")]
    InvalidLayerConfig { message: String },

    /// A runtime-fed graph input was required but not provided.
    #[error("Missing graph input: {name}")]
    MissingGraphInput { name: String },

    /// Unknown activation name.
    #[error("Invalid activation: {name}")]
    InvalidActivation { name: String },

    /// A stack was built without any layers.
    #[error("Stack has no layers defined")]
    NoLayers,
}

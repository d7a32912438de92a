//! Error types for layer configuration and use.

mod layer_error;

pub use layer_error::LayerError;

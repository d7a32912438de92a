//! Neural network layer implementations.
//!
//! This module contains the layer catalog: the [`full::Full`] layer (affine
//! transform plus activation), the [`activation::Activation`] variant
//! catalog, shape resolution and sparse input handling.

pub mod activation;
pub mod full;
pub mod shape;
pub mod sparse;

pub use activation::{Activation, GraphInputs, Temperature};
pub use full::{Full, FullConfig};
pub use shape::LayerShape;
pub use sparse::SparseBatch;

//! # layerkit
//!
//! A catalog of neural network layer types built on the Burn tensor backend.
//!
//! Every layer is an affine transform (or a pass-through for elementwise
//! layers) followed by a nonlinearity chosen from a tagged [`Activation`]
//! catalog: identity, maxout, softmax, sigmoid, tanh, relu, elu, leaky-relu,
//! and the learned blend "tanlu". Layers are configured first, then
//! initialized once on a device (which resolves shapes and allocates
//! parameters), then used per batch.
//!
//! ## Features
//!
//! - **Burn Backend**: tensors, autodiff and parameter storage come from the
//!   Burn framework; the WGPU backend is the default, NdArray works for tests.
//! - **Shape inference**: layers accept optional shape hints; the [`Stack`]
//!   container infers each layer's input size from the previous layer.
//! - **Runtime-fed scalars**: a softmax temperature can be a graph input fed
//!   at execution time instead of a baked-in constant.
//!
//! ## Example
//!
//! ```
//! use layerkit::prelude::*;
//! use burn::backend::NdArray;
//!
//! let device = <NdArray as burn::tensor::backend::Backend>::Device::default();
//!
//! let stack: Stack<NdArray> = StackConfig::with_input_size(4)
//!     .layer(8, Activation::Relu)
//!     .layer(3, Activation::softmax())
//!     .build(&device)
//!     .expect("Failed to build stack");
//!
//! let input = burn::tensor::Tensor::<NdArray, 2>::zeros([2, 4], &device);
//! let output = stack.forward(input).expect("Forward should succeed");
//! assert_eq!(output.dims(), [2, 3]);
//! ```

pub mod errors;
pub mod layers;
pub mod stack;

// Re-exports for convenience
pub use errors::LayerError;
pub use layers::activation::{Activation, GraphInputs, Temperature};
pub use layers::full::{Full, FullConfig};
pub use layers::sparse::SparseBatch;
pub use stack::{Stack, StackConfig};

/// Backend type alias for WGPU with autodiff support, so parameters can be
/// updated by an external optimizer.
pub type Backend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// Backend type for evaluation (no autodiff).
pub type EvalBackend = burn::backend::Wgpu;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::errors::LayerError;
    pub use crate::layers::activation::{Activation, GraphInputs, Temperature};
    pub use crate::layers::full::{Full, FullConfig};
    pub use crate::layers::shape::LayerShape;
    pub use crate::layers::sparse::SparseBatch;
    pub use crate::stack::{Stack, StackConfig};
    pub use crate::{Backend, EvalBackend};
}

//! Stack - a sequential container of catalog layers.
//!
//! The stack is the shape-inference context for its layers: each layer's
//! input dimension is taken from the previous layer's output, so individual
//! layers only need their output size (and elementwise layers need nothing
//! at all).

use burn::{
    module::Module,
    tensor::{backend::Backend, Tensor},
};

use crate::errors::LayerError;
use crate::layers::activation::{Activation, GraphInputs};
use crate::layers::full::{Full, FullConfig};
use crate::layers::shape::LayerShape;
use crate::layers::sparse::SparseBatch;

/// Configuration for building a [`Stack`].
#[derive(Debug, Clone)]
pub struct StackConfig {
    /// Size of the input batch rows.
    pub input_size: usize,
    /// Layer configurations, in forward order.
    pub layer_configs: Vec<FullConfig>,
}

impl StackConfig {
    /// Creates a stack configuration with the given input size.
    pub fn with_input_size(input_size: usize) -> Self {
        Self {
            input_size,
            layer_configs: Vec::new(),
        }
    }

    /// Appends a dense layer; its input size is inferred.
    pub fn layer(mut self, dim_out: usize, activation: Activation) -> Self {
        let dim_in = self.last_size();
        self.layer_configs
            .push(FullConfig::new(dim_in, dim_out, activation));
        self
    }

    /// Appends an elementwise layer; its dimension is inferred.
    pub fn elementwise(mut self, activation: Activation) -> Self {
        let dim = self.last_size();
        self.layer_configs
            .push(FullConfig::elementwise(dim, activation));
        self
    }

    /// Appends a dense layer that consumes sparse input.
    pub fn sparse_layer(mut self, dim_out: usize, activation: Activation) -> Self {
        let dim_in = self.last_size();
        self.layer_configs.push(
            FullConfig::new(dim_in, dim_out, activation).with_sparse_input(true),
        );
        self
    }

    /// Appends a layer from partial shape hints, filling the input dimension
    /// from the running inference.
    pub fn layer_with_shape(mut self, mut shape: LayerShape, activation: Activation) -> Self {
        if shape.dim_in.is_none() {
            shape.dim_in = Some(self.last_size());
        }
        self.layer_configs
            .push(FullConfig::with_shape(shape, activation));
        self
    }

    fn last_size(&self) -> usize {
        self.layer_configs
            .last()
            .and_then(|config| config.shape.dim_out.or(config.shape.dim_in))
            .unwrap_or(self.input_size)
    }

    /// Builds the stack, initializing every layer on the device.
    pub fn build<B: Backend>(&self, device: &B::Device) -> Result<Stack<B>, LayerError> {
        if self.layer_configs.is_empty() {
            return Err(LayerError::NoLayers);
        }

        let layers: Vec<Full<B>> = self
            .layer_configs
            .iter()
            .map(|config| config.init(device))
            .collect::<Result<_, _>>()?;

        log::debug!(
            "built stack: {} -> {} with {} layers",
            self.input_size,
            layers.last().map(|l| l.dim_out()).unwrap_or(0),
            layers.len()
        );

        Ok(Stack { layers })
    }
}

/// A sequence of initialized catalog layers.
#[derive(Module, Debug)]
pub struct Stack<B: Backend> {
    /// The layers in forward order.
    layers: Vec<Full<B>>,
}

impl<B: Backend> Stack<B> {
    /// Performs a forward pass through all layers.
    pub fn forward(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, LayerError> {
        self.forward_with(input, &GraphInputs::default())
    }

    /// Forward pass with runtime-fed graph inputs.
    pub fn forward_with(
        &self,
        input: Tensor<B, 2>,
        inputs: &GraphInputs,
    ) -> Result<Tensor<B, 2>, LayerError> {
        let mut x = input;
        for layer in &self.layers {
            x = layer.forward_with(x, inputs)?;
        }
        Ok(x)
    }

    /// Forward pass starting from a sparse batch.
    ///
    /// The first layer must be sparse-flagged; subsequent layers receive the
    /// dense activations as usual.
    pub fn forward_sparse(&self, input: &SparseBatch<B>) -> Result<Tensor<B, 2>, LayerError> {
        self.forward_sparse_with(input, &GraphInputs::default())
    }

    /// Sparse forward pass with runtime-fed graph inputs.
    pub fn forward_sparse_with(
        &self,
        input: &SparseBatch<B>,
        inputs: &GraphInputs,
    ) -> Result<Tensor<B, 2>, LayerError> {
        let Some((first, rest)) = self.layers.split_first() else {
            return Err(LayerError::NoLayers);
        };
        let mut x = first.forward_sparse_with(input, inputs)?;
        for layer in rest {
            x = layer.forward_with(x, inputs)?;
        }
        Ok(x)
    }

    /// Names of the graph inputs required at execution time, deduplicated.
    pub fn graph_inputs(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for layer in &self.layers {
            for name in layer.graph_inputs() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Returns the input size of the stack.
    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.dim_in()).unwrap_or(0)
    }

    /// Returns the output size of the stack.
    pub fn output_size(&self) -> usize {
        self.layers.last().map(|l| l.dim_out()).unwrap_or(0)
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the stack has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Returns the layers in forward order.
    pub fn layers(&self) -> &[Full<B>] {
        &self.layers
    }

    /// Total number of trainable parameter elements across all layers.
    pub fn num_params(&self) -> usize {
        self.layers.iter().map(|l| l.num_params()).sum()
    }
}

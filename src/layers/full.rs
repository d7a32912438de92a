//! The catalog layer: an affine transform followed by an activation.
//!
//! A [`FullConfig`] is the uninitialized state (shape hints plus
//! hyperparameters); [`FullConfig::init`] resolves shapes, validates the
//! configuration and allocates parameters exactly once, producing a
//! [`Full`] layer ready for forward passes.

use burn::{
    module::{Module, Param},
    nn::{Linear, LinearConfig},
    tensor::{activation, backend::Backend, Distribution, Tensor},
};

use crate::errors::LayerError;
use crate::layers::activation::{Activation, GraphInputs, Temperature, TEMPERATURE};
use crate::layers::shape::LayerShape;
use crate::layers::sparse::SparseBatch;

/// Configuration for a catalog layer.
#[derive(Debug, Clone)]
pub struct FullConfig {
    /// Shape hints, resolved at initialization.
    pub shape: LayerShape,
    /// Marks the layer as consuming sparse input batches.
    pub sparse: bool,
    /// The layer variant and its hyperparameters.
    pub activation: Activation,
}

impl FullConfig {
    /// Creates a dense layer configuration with known dimensions.
    pub fn new(dim_in: usize, dim_out: usize, activation: Activation) -> Self {
        Self {
            shape: LayerShape::new(dim_in, dim_out),
            sparse: false,
            activation,
        }
    }

    /// Creates an elementwise layer configuration (no weight matrix).
    pub fn elementwise(dim: usize, activation: Activation) -> Self {
        Self {
            shape: LayerShape::elementwise(dim),
            sparse: false,
            activation,
        }
    }

    /// Creates a configuration from partial shape hints.
    pub fn with_shape(shape: LayerShape, activation: Activation) -> Self {
        Self {
            shape,
            sparse: false,
            activation,
        }
    }

    /// Marks the layer as consuming sparse input.
    pub fn with_sparse_input(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }

    /// Initializes the layer on the given device.
    ///
    /// Resolves the shape hints, validates the variant against the layer
    /// options and allocates parameters. This is the single transition from
    /// the uninitialized to the initialized state.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Full<B>, LayerError> {
        let (dim_in, dim_out) = self.shape.resolve()?;
        let elementwise = self.shape.is_elementwise();

        if elementwise {
            if matches!(self.activation, Activation::Linear) {
                return Err(LayerError::IdentityElementwise);
            }
            if matches!(self.activation, Activation::Maxout { .. }) {
                return Err(LayerError::InvalidLayerConfig {
                    message: "maxout always projects and cannot be elementwise".to_string(),
                });
            }
            if self.sparse {
                return Err(LayerError::InvalidLayerConfig {
                    message: "elementwise layers have no weights to apply sparse input to"
                        .to_string(),
                });
            }
        }

        match self.activation {
            Activation::Maxout { k } => {
                if k == 0 {
                    return Err(LayerError::InvalidLayerConfig {
                        message: "maxout needs at least one piece".to_string(),
                    });
                }
                if self.sparse {
                    return Err(LayerError::InvalidLayerConfig {
                        message: "sparse input is not supported for maxout kernels".to_string(),
                    });
                }
            }
            Activation::Softmax {
                temperature: Temperature::Fixed(t),
            } if t <= 0.0 => {
                return Err(LayerError::InvalidLayerConfig {
                    message: format!("softmax temperature must be positive, got {}", t),
                });
            }
            _ => {}
        }

        let mut linear = None;
        let mut maxout = None;
        match self.activation {
            Activation::Maxout { k } => {
                maxout = Some(MaxoutKernel::new(k, dim_in, dim_out, device));
            }
            _ if !elementwise => {
                linear = Some(LinearConfig::new(dim_in, dim_out).init(device));
            }
            _ => {}
        }

        let blend = match self.activation {
            Activation::Tanlu => Some(Param::from_tensor(Tensor::full([dim_out], 0.5, device))),
            _ => None,
        };

        let (pieces, alpha, temperature, temperature_is_input) = match self.activation {
            Activation::Maxout { k } => (k, 0.0, 1.0, false),
            Activation::Softmax {
                temperature: Temperature::Fixed(t),
            } => (0, 0.0, t, false),
            Activation::Softmax {
                temperature: Temperature::Input,
            } => (0, 0.0, 1.0, true),
            Activation::Elu { alpha } | Activation::LeakyRelu { alpha } => (0, alpha, 1.0, false),
            _ => (0, 0.0, 1.0, false),
        };

        Ok(Full {
            linear,
            maxout,
            blend,
            dim_in,
            dim_out,
            elementwise,
            sparse: self.sparse,
            activation_id: self.activation.to_id(),
            pieces,
            alpha,
            temperature,
            temperature_is_input,
        })
    }
}

/// Maxout kernel: `k` affine maps reduced with an elementwise maximum.
#[derive(Module, Debug)]
struct MaxoutKernel<B: Backend> {
    /// Piece weights, shape [k, dim_in, dim_out].
    weight: Param<Tensor<B, 3>>,
    /// Per-piece bias, shape [k, dim_out].
    bias: Param<Tensor<B, 2>>,
    pieces: usize,
}

impl<B: Backend> MaxoutKernel<B> {
    fn new(pieces: usize, dim_in: usize, dim_out: usize, device: &B::Device) -> Self {
        let bound = 1.0 / (dim_in as f64).sqrt();
        let weight = Param::from_tensor(Tensor::random(
            [pieces, dim_in, dim_out],
            Distribution::Uniform(-bound, bound),
            device,
        ));
        let bias = Param::from_tensor(Tensor::random(
            [pieces, dim_out],
            Distribution::Uniform(-bound, bound),
            device,
        ));
        Self {
            weight,
            bias,
            pieces,
        }
    }

    fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, dim_in] = input.dims();
        let weight = self.weight.val();
        let dim_out = weight.dims()[2];

        // [k, batch, dim_out] = [k, batch, dim_in] x [k, dim_in, dim_out]
        let z = input
            .unsqueeze::<3>()
            .expand([self.pieces, batch, dim_in])
            .matmul(weight);
        let z = z + self.bias.val().unsqueeze_dim::<3>(1);

        z.max_dim(0).reshape([batch, dim_out])
    }
}

/// A catalog layer with initialized parameters.
///
/// Computes `activate(x W + b)` for dense layers, `activate(x)` for
/// elementwise ones. Parameters belong to the layer and are updated only by
/// an external optimizer through Burn's module machinery.
#[derive(Module, Debug)]
pub struct Full<B: Backend> {
    /// Affine kernel; absent for elementwise and maxout layers.
    linear: Option<Linear<B>>,
    /// Maxout kernel; present only for maxout layers.
    maxout: Option<MaxoutKernel<B>>,
    /// Tanlu blend vector, shape [dim_out], clipped to [0, 1] on use.
    blend: Option<Param<Tensor<B, 1>>>,
    dim_in: usize,
    dim_out: usize,
    elementwise: bool,
    sparse: bool,
    activation_id: u8,
    pieces: usize,
    alpha: f64,
    temperature: f64,
    temperature_is_input: bool,
}

impl<B: Backend> Full<B> {
    /// Returns the layer variant.
    pub fn activation(&self) -> Activation {
        Activation::from_parts(
            self.activation_id,
            self.pieces,
            self.alpha,
            self.temperature,
            self.temperature_is_input,
        )
    }

    /// Returns the input dimension.
    pub fn dim_in(&self) -> usize {
        self.dim_in
    }

    /// Returns the output dimension.
    pub fn dim_out(&self) -> usize {
        self.dim_out
    }

    /// Returns true if the layer applies no projection.
    pub fn is_elementwise(&self) -> bool {
        self.elementwise
    }

    /// Returns true if the layer consumes sparse input batches.
    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    /// Names of the graph inputs that must be fed at execution time.
    pub fn graph_inputs(&self) -> Vec<&'static str> {
        self.activation().graph_inputs()
    }

    /// Performs the forward pass on a dense batch of shape [batch, dim_in].
    pub fn forward(&self, input: Tensor<B, 2>) -> Result<Tensor<B, 2>, LayerError> {
        self.forward_with(input, &GraphInputs::default())
    }

    /// Forward pass with runtime-fed graph inputs.
    pub fn forward_with(
        &self,
        input: Tensor<B, 2>,
        inputs: &GraphInputs,
    ) -> Result<Tensor<B, 2>, LayerError> {
        if let Some(kernel) = &self.maxout {
            return Ok(kernel.forward(input));
        }
        let projected = match &self.linear {
            Some(linear) => linear.forward(input),
            // Elementwise layers pass the input straight to the activation.
            None => return self.activate(input, inputs),
        };
        self.activate(projected, inputs)
    }

    /// Forward pass on a sparse input batch.
    ///
    /// Only valid on layers configured with a sparse input flag.
    pub fn forward_sparse(&self, input: &SparseBatch<B>) -> Result<Tensor<B, 2>, LayerError> {
        self.forward_sparse_with(input, &GraphInputs::default())
    }

    /// Sparse forward pass with runtime-fed graph inputs.
    pub fn forward_sparse_with(
        &self,
        input: &SparseBatch<B>,
        inputs: &GraphInputs,
    ) -> Result<Tensor<B, 2>, LayerError> {
        if !self.sparse {
            return Err(LayerError::InvalidLayerConfig {
                message: "layer was not configured for sparse input".to_string(),
            });
        }
        let Some(linear) = &self.linear else {
            return Err(LayerError::InvalidLayerConfig {
                message: "sparse input requires an affine kernel".to_string(),
            });
        };
        let mut z = input.matmul(linear.weight.val());
        if let Some(bias) = &linear.bias {
            z = z + bias.val().unsqueeze::<2>();
        }
        self.activate(z, inputs)
    }

    /// Applies the variant's nonlinearity.
    fn activate(
        &self,
        x: Tensor<B, 2>,
        inputs: &GraphInputs,
    ) -> Result<Tensor<B, 2>, LayerError> {
        match self.activation() {
            Activation::Linear => {
                if self.elementwise {
                    Err(LayerError::IdentityElementwise)
                } else {
                    Ok(x)
                }
            }
            // The reduction happens inside the kernel.
            Activation::Maxout { .. } => Ok(x),
            Activation::Softmax { temperature } => {
                let t = match temperature {
                    Temperature::Fixed(t) => t,
                    Temperature::Input => {
                        inputs
                            .get(TEMPERATURE)
                            .ok_or_else(|| LayerError::MissingGraphInput {
                                name: TEMPERATURE.to_string(),
                            })?
                    }
                };
                if t <= 0.0 {
                    return Err(LayerError::InvalidLayerConfig {
                        message: format!("softmax temperature must be positive, got {}", t),
                    });
                }
                Ok(activation::softmax(x.div_scalar(t), 1))
            }
            Activation::Sigmoid => Ok(activation::sigmoid(x)),
            Activation::Tanh => Ok(activation::tanh(x)),
            Activation::Relu => Ok(activation::relu(x)),
            Activation::Elu { alpha } => Ok(elu(x, alpha)),
            Activation::LeakyRelu { alpha } => Ok(activation::leaky_relu(x, alpha)),
            Activation::Tanlu => {
                let blend = self.blend.as_ref().ok_or_else(|| {
                    LayerError::InvalidLayerConfig {
                        message: "tanlu blend parameter was not allocated".to_string(),
                    }
                })?;
                Ok(tanlu(x, blend.val()))
            }
        }
    }

    /// Affine weight, shape [dim_in, dim_out], if allocated.
    pub fn weight(&self) -> Option<Tensor<B, 2>> {
        self.linear.as_ref().map(|l| l.weight.val())
    }

    /// Affine bias, shape [dim_out], if allocated.
    pub fn bias(&self) -> Option<Tensor<B, 1>> {
        self.linear
            .as_ref()
            .and_then(|l| l.bias.as_ref())
            .map(|b| b.val())
    }

    /// Maxout weight, shape [k, dim_in, dim_out], if allocated.
    pub fn maxout_weight(&self) -> Option<Tensor<B, 3>> {
        self.maxout.as_ref().map(|m| m.weight.val())
    }

    /// Maxout bias, shape [k, dim_out], if allocated.
    pub fn maxout_bias(&self) -> Option<Tensor<B, 2>> {
        self.maxout.as_ref().map(|m| m.bias.val())
    }

    /// Tanlu blend vector, shape [dim_out], if allocated.
    pub fn blend(&self) -> Option<Tensor<B, 1>> {
        self.blend.as_ref().map(|p| p.val())
    }

    /// Names of the parameters this layer owns.
    pub fn parameter_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.linear.is_some() || self.maxout.is_some() {
            names.push("weight");
            names.push("bias");
        }
        if self.blend.is_some() {
            names.push("alpha");
        }
        names
    }

    /// Total number of trainable parameter elements.
    pub fn num_params(&self) -> usize {
        let mut count = 0;
        if let Some(linear) = &self.linear {
            count += linear.weight.val().dims().iter().product::<usize>();
            if let Some(bias) = &linear.bias {
                count += bias.val().dims()[0];
            }
        }
        if let Some(kernel) = &self.maxout {
            count += kernel.weight.val().dims().iter().product::<usize>();
            count += kernel.bias.val().dims().iter().product::<usize>();
        }
        if let Some(blend) = &self.blend {
            count += blend.val().dims()[0];
        }
        count
    }
}

/// Exponential linear unit: `relu(x) + alpha * (exp((x - |x|) / 2) - 1)`.
///
/// For x >= 0 the exponent is 0 and the expression reduces to x; for x < 0
/// the relu term vanishes and it reduces to `alpha * (exp(x) - 1)`. Both
/// terms are exactly 0 at the x = 0 boundary.
fn elu<B: Backend>(x: Tensor<B, 2>, alpha: f64) -> Tensor<B, 2> {
    let neg = ((x.clone() - x.clone().abs()) * 0.5).exp() - 1.0;
    activation::relu(x) + neg * alpha
}

/// Learned blend `clip(alpha) * tanh(x) + (1 - clip(alpha)) * relu(x)`.
fn tanlu<B: Backend>(x: Tensor<B, 2>, blend: Tensor<B, 1>) -> Tensor<B, 2> {
    let alpha = blend.clamp(0.0, 1.0).unsqueeze::<2>();
    let complement = alpha.clone().neg() + 1.0;
    alpha * activation::tanh(x.clone()) + complement * activation::relu(x)
}

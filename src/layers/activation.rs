//! Activation catalog for neural network layers.
//!
//! Each layer variant is a tagged entry in the [`Activation`] enum; shared
//! structure (shapes, parameters, the affine transform) lives in
//! [`crate::layers::full::Full`], and the enum carries only the per-variant
//! hyperparameters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the runtime-fed softmax temperature input.
pub const TEMPERATURE: &str = "temperature";

/// Softmax temperature: a fixed constant or a scalar fed at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Temperature {
    /// Fixed temperature baked in at construction. Must be positive.
    Fixed(f64),
    /// Temperature is a graph input, fed per forward call via [`GraphInputs`].
    Input,
}

impl Default for Temperature {
    fn default() -> Self {
        Temperature::Fixed(1.0)
    }
}

/// Supported layer variants.
///
/// `Linear` is the identity (pure affine) variant; the others substitute a
/// nonlinearity applied after the affine transform, or directly to the input
/// for elementwise layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Activation {
    /// Identity: the affine output is returned unchanged. Not valid for
    /// elementwise layers.
    #[default]
    Linear,
    /// Maximum over `k` affine maps per output unit.
    Maxout { k: usize },
    /// Temperature-scaled softmax across the feature dimension.
    Softmax { temperature: Temperature },
    /// Sigmoid: f(x) = 1 / (1 + exp(-x))
    Sigmoid,
    /// Hyperbolic tangent: f(x) = tanh(x)
    Tanh,
    /// Rectified Linear Unit: f(x) = max(0, x)
    Relu,
    /// Exponential Linear Unit: x for x >= 0, alpha * (exp(x) - 1) below.
    Elu { alpha: f64 },
    /// Leaky ReLU with slope `alpha` for negative inputs.
    LeakyRelu { alpha: f64 },
    /// Learned blend alpha * tanh(x) + (1 - alpha) * relu(x), with a
    /// trainable per-unit alpha clipped to [0, 1].
    Tanlu,
}

impl Activation {
    /// Maxout with the default piece count (4).
    pub fn maxout() -> Self {
        Activation::Maxout { k: 4 }
    }

    /// Maxout with an explicit piece count.
    pub fn maxout_with_pieces(k: usize) -> Self {
        Activation::Maxout { k }
    }

    /// Softmax with the default fixed temperature (1.0).
    pub fn softmax() -> Self {
        Activation::Softmax {
            temperature: Temperature::default(),
        }
    }

    /// Softmax with an explicit fixed temperature.
    pub fn softmax_with_temperature(temperature: f64) -> Self {
        Activation::Softmax {
            temperature: Temperature::Fixed(temperature),
        }
    }

    /// Softmax whose temperature is fed at execution time.
    pub fn softmax_with_input_temperature() -> Self {
        Activation::Softmax {
            temperature: Temperature::Input,
        }
    }

    /// Elu with the default alpha (1.0).
    pub fn elu() -> Self {
        Activation::Elu { alpha: 1.0 }
    }

    /// Elu with an explicit alpha.
    pub fn elu_with_alpha(alpha: f64) -> Self {
        Activation::Elu { alpha }
    }

    /// Leaky ReLU with the conventional leak (0.01).
    pub fn leaky_relu() -> Self {
        Activation::LeakyRelu { alpha: 0.01 }
    }

    /// Leaky ReLU with an explicit negative slope.
    pub fn leaky_relu_with_alpha(alpha: f64) -> Self {
        Activation::LeakyRelu { alpha }
    }

    /// Returns the variant name.
    pub fn name(&self) -> &'static str {
        match self {
            Activation::Linear => "LINEAR",
            Activation::Maxout { .. } => "MAXOUT",
            Activation::Softmax { .. } => "SOFTMAX",
            Activation::Sigmoid => "SIGMOID",
            Activation::Tanh => "TANH",
            Activation::Relu => "RELU",
            Activation::Elu { .. } => "ELU",
            Activation::LeakyRelu { .. } => "LEAKYRELU",
            Activation::Tanlu => "TANLU",
        }
    }

    /// Creates an Activation from a name, using default hyperparameters.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_uppercase().as_str() {
            "LINEAR" => Some(Activation::Linear),
            "MAXOUT" => Some(Activation::maxout()),
            "SOFTMAX" => Some(Activation::softmax()),
            "SIGMOID" => Some(Activation::Sigmoid),
            "TANH" => Some(Activation::Tanh),
            "RELU" => Some(Activation::Relu),
            "ELU" => Some(Activation::elu()),
            "LEAKYRELU" => Some(Activation::leaky_relu()),
            "TANLU" => Some(Activation::Tanlu),
            _ => None,
        }
    }

    /// Names of the graph inputs this variant requires at execution time.
    ///
    /// Only a softmax with [`Temperature::Input`] requires one; everything
    /// else returns an empty list.
    pub fn graph_inputs(&self) -> Vec<&'static str> {
        match self {
            Activation::Softmax {
                temperature: Temperature::Input,
            } => vec![TEMPERATURE],
            _ => vec![],
        }
    }

    /// Converts the variant to a numeric ID for storage in a Module.
    pub(crate) fn to_id(&self) -> u8 {
        match self {
            Activation::Linear => 0,
            Activation::Maxout { .. } => 1,
            Activation::Softmax { .. } => 2,
            Activation::Sigmoid => 3,
            Activation::Tanh => 4,
            Activation::Relu => 5,
            Activation::Elu { .. } => 6,
            Activation::LeakyRelu { .. } => 7,
            Activation::Tanlu => 8,
        }
    }

    /// Rebuilds the variant from its ID and the flattened hyperparameters a
    /// Module stores alongside it. Inverse of [`Activation::to_id`].
    pub(crate) fn from_parts(
        id: u8,
        pieces: usize,
        alpha: f64,
        temperature: f64,
        temperature_is_input: bool,
    ) -> Self {
        match id {
            1 => Activation::Maxout { k: pieces },
            2 => Activation::Softmax {
                temperature: if temperature_is_input {
                    Temperature::Input
                } else {
                    Temperature::Fixed(temperature)
                },
            },
            3 => Activation::Sigmoid,
            4 => Activation::Tanh,
            5 => Activation::Relu,
            6 => Activation::Elu { alpha },
            7 => Activation::LeakyRelu { alpha },
            8 => Activation::Tanlu,
            _ => Activation::Linear,
        }
    }
}

/// Values for runtime-fed graph inputs, keyed by input name.
///
/// Burn executes eagerly, so a "placeholder" is simply a named scalar the
/// caller provides with each forward call.
#[derive(Debug, Clone, Default)]
pub struct GraphInputs {
    values: HashMap<String, f64>,
}

impl GraphInputs {
    /// Creates an empty set of graph inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named scalar, consuming and returning self for chaining.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Sets a named scalar.
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    /// Looks up a named scalar.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_names() {
        assert_eq!(Activation::Linear.name(), "LINEAR");
        assert_eq!(Activation::maxout().name(), "MAXOUT");
        assert_eq!(Activation::softmax().name(), "SOFTMAX");
        assert_eq!(Activation::Sigmoid.name(), "SIGMOID");
        assert_eq!(Activation::Tanh.name(), "TANH");
        assert_eq!(Activation::Relu.name(), "RELU");
        assert_eq!(Activation::elu().name(), "ELU");
        assert_eq!(Activation::leaky_relu().name(), "LEAKYRELU");
        assert_eq!(Activation::Tanlu.name(), "TANLU");
    }

    #[test]
    fn test_activation_from_name() {
        assert_eq!(Activation::from_name("relu"), Some(Activation::Relu));
        assert_eq!(Activation::from_name("SIGMOID"), Some(Activation::Sigmoid));
        assert_eq!(Activation::from_name("tanlu"), Some(Activation::Tanlu));
        assert_eq!(
            Activation::from_name("maxout"),
            Some(Activation::Maxout { k: 4 })
        );
        assert_eq!(
            Activation::from_name("leakyrelu"),
            Some(Activation::LeakyRelu { alpha: 0.01 })
        );
        assert_eq!(Activation::from_name("invalid"), None);
    }

    #[test]
    fn test_name_round_trip() {
        let activations = [
            Activation::Linear,
            Activation::maxout(),
            Activation::softmax(),
            Activation::Sigmoid,
            Activation::Tanh,
            Activation::Relu,
            Activation::elu(),
            Activation::leaky_relu(),
            Activation::Tanlu,
        ];
        for act in activations {
            assert_eq!(Activation::from_name(act.name()), Some(act));
        }
    }

    #[test]
    fn test_from_parts_round_trip() {
        let activations = [
            Activation::Linear,
            Activation::maxout_with_pieces(3),
            Activation::softmax_with_temperature(2.0),
            Activation::softmax_with_input_temperature(),
            Activation::Sigmoid,
            Activation::Tanh,
            Activation::Relu,
            Activation::elu_with_alpha(0.7),
            Activation::leaky_relu_with_alpha(0.2),
            Activation::Tanlu,
        ];
        for act in activations {
            let (pieces, alpha, temperature, temperature_is_input) = match act {
                Activation::Maxout { k } => (k, 0.0, 1.0, false),
                Activation::Softmax {
                    temperature: Temperature::Fixed(t),
                } => (0, 0.0, t, false),
                Activation::Softmax {
                    temperature: Temperature::Input,
                } => (0, 0.0, 1.0, true),
                Activation::Elu { alpha } | Activation::LeakyRelu { alpha } => {
                    (0, alpha, 1.0, false)
                }
                _ => (0, 0.0, 1.0, false),
            };
            assert_eq!(
                Activation::from_parts(act.to_id(), pieces, alpha, temperature, temperature_is_input),
                act
            );
        }
    }

    #[test]
    fn test_graph_inputs_query() {
        assert!(Activation::softmax().graph_inputs().is_empty());
        assert!(Activation::Relu.graph_inputs().is_empty());
        assert_eq!(
            Activation::softmax_with_input_temperature().graph_inputs(),
            vec![TEMPERATURE]
        );
    }

    #[test]
    fn test_activation_config_json() {
        let act: Activation = serde_json::from_str("\"SIGMOID\"").expect("JSON should be valid");
        assert_eq!(act, Activation::Sigmoid);

        let act: Activation =
            serde_json::from_str(r#"{"MAXOUT": {"k": 2}}"#).expect("JSON should be valid");
        assert_eq!(act, Activation::Maxout { k: 2 });

        let act: Activation = serde_json::from_str(r#"{"SOFTMAX": {"temperature": {"FIXED": 0.5}}}"#)
            .expect("JSON should be valid");
        assert_eq!(act, Activation::softmax_with_temperature(0.5));
    }

    #[test]
    fn test_graph_inputs_bag() {
        let inputs = GraphInputs::new().with(TEMPERATURE, 2.0);
        assert_eq!(inputs.get(TEMPERATURE), Some(2.0));
        assert_eq!(inputs.get("unknown"), None);

        let mut inputs = GraphInputs::new();
        inputs.set(TEMPERATURE, 0.5);
        assert_eq!(inputs.get(TEMPERATURE), Some(0.5));
    }
}

//! Structural description of a network architecture.
//!
//! The resolver never executes these; they are handed to the training code,
//! which builds the actual layers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered stack of layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub layers: Vec<LayerSpec>,
}

impl NetworkSpec {
    pub fn new(layers: Vec<LayerSpec>) -> Self {
        Self { layers }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Whether the network ends in a binary neuron, i.e. emits {0, 1} values.
    pub fn has_binary_output(&self) -> bool {
        matches!(self.layers.last(), Some(LayerSpec::BinaryNeuron { .. }))
    }

    /// One-line summary, e.g. `dense(512) -> dense(784) -> reshape(28x28x1)`.
    pub fn describe(&self) -> String {
        self.layers
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Identity,
    Relu,
    LeakyRelu,
    Sigmoid,
    Tanh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    Same,
    Valid,
}

/// Gradient estimator used by a binary neuron.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryEstimator {
    /// Deterministic thresholding at 0.5.
    Round,
    /// Stochastic sampling from a Bernoulli distribution.
    Bernoulli,
}

/// A single layer in a [`NetworkSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        units: usize,
        activation: Activation,
    },
    Reshape {
        shape: Vec<usize>,
    },
    Flatten,
    Conv2d {
        filters: usize,
        kernel: [usize; 2],
        strides: [usize; 2],
        padding: Padding,
        activation: Activation,
    },
    Conv2dTranspose {
        filters: usize,
        kernel: [usize; 2],
        strides: [usize; 2],
        padding: Padding,
        activation: Activation,
    },
    BatchNorm,
    /// Skip connection around the inner layers; output is `x + f(x)`.
    Residual {
        layers: Vec<LayerSpec>,
    },
    /// Binarizes its input. `slope_annealing` lets the trainer sharpen the
    /// preceding sigmoid over time.
    BinaryNeuron {
        estimator: BinaryEstimator,
        slope_annealing: bool,
    },
}

impl LayerSpec {
    pub fn dense(units: usize, activation: Activation) -> Self {
        Self::Dense { units, activation }
    }

    pub fn reshape(shape: &[usize]) -> Self {
        Self::Reshape {
            shape: shape.to_vec(),
        }
    }

    pub fn conv2d(filters: usize, kernel: usize, stride: usize, activation: Activation) -> Self {
        Self::Conv2d {
            filters,
            kernel: [kernel, kernel],
            strides: [stride, stride],
            padding: Padding::Same,
            activation,
        }
    }

    pub fn conv2d_transpose(
        filters: usize,
        kernel: usize,
        stride: usize,
        activation: Activation,
    ) -> Self {
        Self::Conv2dTranspose {
            filters,
            kernel: [kernel, kernel],
            strides: [stride, stride],
            padding: Padding::Same,
            activation,
        }
    }

    pub fn binary_neuron(estimator: BinaryEstimator) -> Self {
        Self::BinaryNeuron {
            estimator,
            slope_annealing: true,
        }
    }
}

impl fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dense { units, .. } => write!(f, "dense({units})"),
            Self::Reshape { shape } => {
                let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
                write!(f, "reshape({})", dims.join("x"))
            }
            Self::Flatten => write!(f, "flatten"),
            Self::Conv2d {
                filters, strides, ..
            } => write!(f, "conv2d({filters}/{})", strides[0]),
            Self::Conv2dTranspose {
                filters, strides, ..
            } => write!(f, "conv2d_t({filters}/{})", strides[0]),
            Self::BatchNorm => write!(f, "bn"),
            Self::Residual { layers } => write!(f, "residual[{}]", layers.len()),
            Self::BinaryNeuron { estimator, .. } => match estimator {
                BinaryEstimator::Round => write!(f, "binary(round)"),
                BinaryEstimator::Bernoulli => write!(f, "binary(bernoulli)"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_joins_layers() {
        let spec = NetworkSpec::new(vec![
            LayerSpec::dense(512, Activation::Relu),
            LayerSpec::dense(784, Activation::Sigmoid),
            LayerSpec::reshape(&[28, 28, 1]),
        ]);
        assert_eq!(spec.describe(), "dense(512) -> dense(784) -> reshape(28x28x1)");
        assert!(!spec.has_binary_output());
    }

    #[test]
    fn test_binary_output_detection() {
        let spec = NetworkSpec::new(vec![
            LayerSpec::conv2d(1, 3, 1, Activation::Sigmoid),
            LayerSpec::binary_neuron(BinaryEstimator::Bernoulli),
        ]);
        assert!(spec.has_binary_output());
    }

    #[test]
    fn test_layer_serializes_with_type_tag() {
        let json = serde_json::to_value(LayerSpec::dense(64, Activation::LeakyRelu)).unwrap();
        assert_eq!(json["type"], "dense");
        assert_eq!(json["units"], 64);
        assert_eq!(json["activation"], "leaky_relu");
    }

    #[test]
    fn test_nested_residual_from_toml() {
        let spec: NetworkSpec = toml::from_str(
            r#"
[[layers]]
type = "residual"

[[layers.layers]]
type = "conv2d"
filters = 16
kernel = [3, 3]
strides = [1, 1]
padding = "same"
activation = "relu"

[[layers]]
type = "binary_neuron"
estimator = "round"
slope_annealing = false
"#,
        )
        .unwrap();
        assert_eq!(spec.len(), 2);
        match &spec.layers[0] {
            LayerSpec::Residual { layers } => assert_eq!(layers.len(), 1),
            other => panic!("expected residual, got {other:?}"),
        }
        assert!(spec.has_binary_output());
    }
}

//! Generator presets. Input is a 128-d latent vector, output a 28x28x1 image.

use super::spec::{Activation, BinaryEstimator, LayerSpec, NetworkSpec};

pub(super) fn mlp_real() -> NetworkSpec {
    NetworkSpec::new(vec![
        LayerSpec::dense(512, Activation::Relu),
        LayerSpec::BatchNorm,
        LayerSpec::dense(512, Activation::Relu),
        LayerSpec::BatchNorm,
        LayerSpec::dense(784, Activation::Sigmoid),
        LayerSpec::reshape(&[28, 28, 1]),
    ])
}

/// Same as `mlp_real` but binarizes its output.
pub(super) fn mlp() -> NetworkSpec {
    let mut spec = mlp_real();
    spec.layers.push(LayerSpec::binary_neuron(BinaryEstimator::Round));
    spec
}

pub(super) fn proposed() -> NetworkSpec {
    upconv(128, 64)
}

pub(super) fn proposed_small() -> NetworkSpec {
    upconv(64, 32)
}

fn upconv(base: usize, mid: usize) -> NetworkSpec {
    NetworkSpec::new(vec![
        LayerSpec::dense(7 * 7 * base, Activation::Relu),
        LayerSpec::BatchNorm,
        LayerSpec::reshape(&[7, 7, base]),
        LayerSpec::conv2d_transpose(mid, 5, 2, Activation::Relu),
        LayerSpec::BatchNorm,
        LayerSpec::conv2d_transpose(1, 5, 2, Activation::Sigmoid),
    ])
}

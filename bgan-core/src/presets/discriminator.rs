//! Discriminator presets. Input is a 28x28x1 image, output a single critic score.

use super::spec::{Activation, LayerSpec, NetworkSpec};

pub(super) fn mlp() -> NetworkSpec {
    NetworkSpec::new(vec![
        LayerSpec::Flatten,
        LayerSpec::dense(512, Activation::LeakyRelu),
        LayerSpec::dense(256, Activation::LeakyRelu),
        LayerSpec::dense(1, Activation::Identity),
    ])
}

pub(super) fn proposed() -> NetworkSpec {
    conv(64, 128, true)
}

pub(super) fn proposed_small() -> NetworkSpec {
    conv(32, 64, true)
}

/// `proposed` without the hidden dense layer before the critic output.
pub(super) fn ablated() -> NetworkSpec {
    conv(64, 128, false)
}

pub(super) fn baseline() -> NetworkSpec {
    NetworkSpec::new(vec![
        LayerSpec::conv2d(32, 5, 2, Activation::LeakyRelu),
        LayerSpec::Flatten,
        LayerSpec::dense(1, Activation::Identity),
    ])
}

fn conv(first: usize, second: usize, hidden_dense: bool) -> NetworkSpec {
    let mut layers = vec![
        LayerSpec::conv2d(first, 5, 2, Activation::LeakyRelu),
        LayerSpec::conv2d(second, 5, 2, Activation::LeakyRelu),
        LayerSpec::Flatten,
    ];
    if hidden_dense {
        layers.push(LayerSpec::dense(256, Activation::LeakyRelu));
    }
    layers.push(LayerSpec::dense(1, Activation::Identity));
    NetworkSpec::new(layers)
}

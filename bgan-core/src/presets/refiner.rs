//! Refiner presets. Maps a real-valued 28x28x1 image to a binary one.

use super::spec::{Activation, BinaryEstimator, LayerSpec, NetworkSpec};

pub(super) fn proposed_round() -> NetworkSpec {
    residual_refiner(BinaryEstimator::Round)
}

pub(super) fn proposed_bernoulli() -> NetworkSpec {
    residual_refiner(BinaryEstimator::Bernoulli)
}

fn residual_refiner(estimator: BinaryEstimator) -> NetworkSpec {
    let block = || LayerSpec::Residual {
        layers: vec![
            LayerSpec::conv2d(64, 3, 1, Activation::Relu),
            LayerSpec::conv2d(64, 3, 1, Activation::Identity),
        ],
    };
    NetworkSpec::new(vec![
        LayerSpec::conv2d(64, 3, 1, Activation::Relu),
        block(),
        block(),
        LayerSpec::conv2d(1, 3, 1, Activation::Sigmoid),
        LayerSpec::binary_neuron(estimator),
    ])
}

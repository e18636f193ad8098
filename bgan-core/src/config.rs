//! Resolved configuration records handed to the training code.
//!
//! These are produced once by [`crate::resolver::ConfigResolver`] and are
//! read-only afterwards. Hyperparameters that are not part of the quick
//! setup live here as defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::layout::ExperimentDirs;
use crate::presets::NetworkSpec;
use crate::settings::{DataLocation, TrainingPhase};

/// Experiment-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub exp_name: String,
    pub two_stage_training: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretrained_dir: Option<PathBuf>,
    /// Checkpoints of the paired pretrain run.
    pub first_stage_dir: PathBuf,
}

/// Training data configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub training_data: String,
    pub training_data_location: DataLocation,
}

/// Training loop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub sample_along_training: bool,
    pub evaluate_along_training: bool,
    pub verbose: bool,
    pub two_stage_training: bool,
    pub training_phase: TrainingPhase,
    pub num_epoch: usize,
    /// Multiplier applied to the binary neurons' sigmoid slope each epoch.
    pub slope_annealing_rate: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            sample_along_training: true,
            evaluate_along_training: true,
            verbose: false,
            two_stage_training: true,
            training_phase: TrainingPhase::Pretrain,
            num_epoch: 50,
            slope_annealing_rate: 1.1,
        }
    }
}

/// Adversarial loss variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GanKind {
    Gan,
    Wgan,
    #[default]
    WganGp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GanConfig {
    #[serde(rename = "type")]
    pub kind: GanKind,
    /// Weight clipping bound, used by `wgan`.
    pub clip_value: f64,
    /// Gradient penalty weight, used by `wgan-gp`.
    pub gp_coefficient: f64,
}

impl Default for GanConfig {
    fn default() -> Self {
        Self {
            kind: GanKind::WganGp,
            clip_value: 0.01,
            gp_coefficient: 10.0,
        }
    }
}

/// Adam optimizer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub lr: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            lr: 0.002,
            beta1: 0.5,
            beta2: 0.9,
            epsilon: 1e-8,
        }
    }
}

/// Model configuration: hyperparameters, architectures and output directories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub joint_training: bool,
    pub batch_size: usize,
    pub gan: GanConfig,
    pub optimizer: OptimizerConfig,
    pub out_width: usize,
    pub out_height: usize,
    pub out_channel: usize,
    pub num_sample: usize,
    /// Rows and columns of the sample image grid.
    pub sample_grid: (usize, usize),
    pub net_g: NetworkSpec,
    pub net_d: NetworkSpec,
    pub net_r: NetworkSpec,
    pub dirs: ExperimentDirs,
}

// Fixed hyperparameters of `ModelConfig`.
pub const BATCH_SIZE: usize = 64;
pub const OUT_WIDTH: usize = 28;
pub const OUT_HEIGHT: usize = 28;
pub const OUT_CHANNEL: usize = 1;
pub const NUM_SAMPLE: usize = 32;
pub const SAMPLE_GRID: (usize, usize) = (4, 8);

impl ModelConfig {
    /// Output tensor shape as `(height, width, channels)`.
    pub fn out_shape(&self) -> (usize, usize, usize) {
        (self.out_height, self.out_width, self.out_channel)
    }
}

/// Device visibility for the training process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Comma-separated device indices made visible to the process.
    pub visible_devices: String,
    /// Grow device memory on demand instead of reserving it up front.
    pub allow_growth: bool,
}

/// Everything resolution produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub experiment: ExperimentConfig,
    pub data: DataConfig,
    pub train: TrainConfig,
    pub model: ModelConfig,
    pub device: DeviceConfig,
}

impl ResolvedConfig {
    pub fn into_parts(self) -> (ExperimentConfig, DataConfig, ModelConfig, TrainConfig) {
        (self.experiment, self.data, self.model, self.train)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_defaults() {
        let train = TrainConfig::default();
        assert_eq!(train.num_epoch, 50);
        assert!((train.slope_annealing_rate - 1.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gan_kind_serialization() {
        let json = serde_json::to_value(GanConfig::default()).unwrap();
        assert_eq!(json["type"], "wgan-gp");
        assert_eq!(json["gp_coefficient"], 10.0);
        let kind: GanKind = serde_json::from_str("\"wgan\"").unwrap();
        assert_eq!(kind, GanKind::Wgan);
    }

    #[test]
    fn test_optimizer_defaults() {
        let opt = OptimizerConfig::default();
        assert_eq!(opt.lr, 0.002);
        assert_eq!(opt.beta1, 0.5);
        assert_eq!(opt.beta2, 0.9);
        assert_eq!(opt.epsilon, 1e-8);
    }
}

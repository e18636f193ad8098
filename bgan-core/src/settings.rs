//! Quick-setup settings: the small, user-editable input to resolution.
//!
//! Every field has a default, so a settings file only needs the keys it
//! changes. Values that are derived when absent (experiment name, first-stage
//! directory, architectures, output directories) are `Option`s.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::presets::{NetworkRole, NetworkSpec};
use crate::snapshot::SnapshotSettings;

/// Where the training data is loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataLocation {
    /// A `.npy` file on the hard disk.
    #[serde(rename = "hd", alias = "disk")]
    HardDisk,
    /// A shared-memory array populated ahead of time.
    #[default]
    #[serde(rename = "sa", alias = "shared_memory")]
    SharedArray,
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardDisk => write!(f, "hd"),
            Self::SharedArray => write!(f, "sa"),
        }
    }
}

/// Phase of a two-stage training run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPhase {
    #[default]
    Pretrain,
    Train,
}

impl fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretrain => write!(f, "pretrain"),
            Self::Train => write!(f, "train"),
        }
    }
}

/// Values that would otherwise be derived during resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_g: Option<NetworkSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_d: Option<NetworkSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_r: Option<NetworkSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_dir: Option<PathBuf>,
}

impl Overrides {
    pub fn network(&self, role: NetworkRole) -> Option<&NetworkSpec> {
        match role {
            NetworkRole::Generator => self.net_g.as_ref(),
            NetworkRole::Discriminator => self.net_d.as_ref(),
            NetworkRole::Refiner => self.net_r.as_ref(),
        }
    }
}

/// User-facing quick-setup record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Experiment name; also the folder name under `exp/`. Derived when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_name: Option<String>,
    /// Identifier of the training data (file name or shared array name).
    pub training_data: String,
    pub training_data_location: DataLocation,
    /// Value for the process-wide visible-device list.
    #[serde(deserialize_with = "lenient_string")]
    pub gpu: String,
    /// Prefix for derived experiment names.
    pub prefix: String,
    pub sample_along_training: bool,
    pub evaluate_along_training: bool,
    /// Log every batch instead of once per epoch.
    pub verbose: bool,
    pub two_stage_training: bool,
    /// Only consulted when `two_stage_training` is on.
    pub training_phase: TrainingPhase,
    /// Train generator and refiner together. Only consulted in the train phase.
    pub joint_training: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretrained_dir: Option<PathBuf>,
    /// Checkpoints of the pretrain phase. Derived from the pretrain naming
    /// rule when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_stage_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_g: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_r: Option<String>,
    pub overrides: Overrides,
    pub snapshot: SnapshotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exp_name: None,
            training_data: "herman_mnist_x_binarized".to_string(),
            training_data_location: DataLocation::SharedArray,
            gpu: "0".to_string(),
            prefix: "wgan-gp-bmnist".to_string(),
            sample_along_training: true,
            evaluate_along_training: true,
            verbose: false,
            two_stage_training: true,
            training_phase: TrainingPhase::Pretrain,
            joint_training: false,
            pretrained_dir: None,
            first_stage_dir: None,
            preset_g: Some("mlp_real".to_string()),
            preset_d: Some("mlp".to_string()),
            preset_r: Some("proposed_round".to_string()),
            overrides: Overrides::default(),
            snapshot: SnapshotSettings::default(),
        }
    }
}

impl Settings {
    pub fn preset(&self, role: NetworkRole) -> Option<&str> {
        match role {
            NetworkRole::Generator => self.preset_g.as_deref(),
            NetworkRole::Discriminator => self.preset_d.as_deref(),
            NetworkRole::Refiner => self.preset_r.as_deref(),
        }
    }

    /// Whether the refiner takes part in this run.
    pub fn uses_refiner(&self) -> bool {
        self.two_stage_training && self.training_phase == TrainingPhase::Train
    }

    /// Report values that will be silently ignored. Never fails resolution.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.prefix.is_empty() && self.exp_name.is_none() {
            warnings.push("prefix is empty; derived experiment names will start with '_'".into());
        }
        if self.gpu.trim().is_empty() {
            warnings.push("gpu is empty; no device will be visible".into());
        }
        if !self.two_stage_training {
            if self.training_phase != TrainingPhase::Pretrain {
                warnings.push(format!(
                    "training_phase = '{}' is ignored without two_stage_training",
                    self.training_phase
                ));
            }
            if self.first_stage_dir.is_some() {
                warnings.push("first_stage_dir is ignored without two_stage_training".into());
            }
        }
        if self.joint_training && !self.uses_refiner() {
            warnings.push(
                "joint_training only applies to the train phase of two-stage training".into(),
            );
        }
        warnings
    }
}

/// Accept a device list written either as a string or as a bare number
/// (`gpu = 0`, `BGAN_GPU=1`).
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        UInt(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::UInt(n) => n.to_string(),
    })
}

//! Expansion of sparse [`Settings`] into the full set of resolved records.
//!
//! `resolve` is pure: it reads settings and the registries and returns owned
//! records. Creating directories, copying sources and changing device
//! visibility are separate calls (see [`crate::layout`], [`crate::snapshot`]
//! and [`crate::device`]), so every validation error surfaces before the
//! filesystem is touched.

use std::path::{Path, PathBuf};

use crate::config::{
    self, DataConfig, DeviceConfig, ExperimentConfig, GanConfig, ModelConfig, OptimizerConfig,
    ResolvedConfig, TrainConfig,
};
use crate::error::{ConfigError, Result};
use crate::layout::{DirRole, ExperimentDirs};
use crate::naming;
use crate::presets::{self, NetworkRole, NetworkSpec};
use crate::settings::Settings;

/// Resolves settings relative to a project root.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    project_root: PathBuf,
}

impl ConfigResolver {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Produce every record, or fail without partial output.
    pub fn resolve(&self, settings: &Settings) -> Result<ResolvedConfig> {
        let device = DeviceConfig {
            visible_devices: settings.gpu.clone(),
            allow_growth: true,
        };

        let exp_name = naming::experiment_name(settings)?;
        let first_stage_dir = self.first_stage_dir(settings)?;
        tracing::debug!(
            exp_name = %exp_name,
            first_stage_dir = %first_stage_dir.display(),
            "Resolved experiment"
        );

        let experiment = ExperimentConfig {
            exp_name,
            two_stage_training: settings.two_stage_training,
            pretrained_dir: settings.pretrained_dir.clone(),
            first_stage_dir,
        };

        let data = DataConfig {
            training_data: settings.training_data.clone(),
            training_data_location: settings.training_data_location,
        };

        let train = TrainConfig {
            sample_along_training: settings.sample_along_training,
            evaluate_along_training: settings.evaluate_along_training,
            verbose: settings.verbose,
            two_stage_training: settings.two_stage_training,
            training_phase: settings.training_phase,
            ..TrainConfig::default()
        };

        let net_g = resolve_network(settings, NetworkRole::Generator)?;
        let net_d = resolve_network(settings, NetworkRole::Discriminator)?;
        let net_r = resolve_network(settings, NetworkRole::Refiner)?;

        let dirs = self.experiment_dirs(settings, &experiment.exp_name);

        let model = ModelConfig {
            joint_training: settings.joint_training,
            batch_size: config::BATCH_SIZE,
            gan: GanConfig::default(),
            optimizer: OptimizerConfig::default(),
            out_width: config::OUT_WIDTH,
            out_height: config::OUT_HEIGHT,
            out_channel: config::OUT_CHANNEL,
            num_sample: config::NUM_SAMPLE,
            sample_grid: config::SAMPLE_GRID,
            net_g,
            net_d,
            net_r,
            dirs,
        };

        Ok(ResolvedConfig {
            experiment,
            data,
            train,
            model,
            device,
        })
    }

    /// Explicit first-stage directory, or the checkpoint directory of the
    /// pretrain run with the same prefix and g/d presets. The current
    /// experiment's own name never enters the derivation.
    fn first_stage_dir(&self, settings: &Settings) -> Result<PathBuf> {
        if let Some(dir) = &settings.first_stage_dir {
            return Ok(dir.clone());
        }
        match (&settings.preset_g, &settings.preset_d) {
            (Some(g), Some(d)) => {
                let pretrain = naming::pretrain_name(&settings.prefix, g, d);
                Ok(ExperimentDirs::under(&self.project_root, &pretrain).checkpoint_dir)
            }
            _ => Err(ConfigError::MissingField {
                field: "first_stage_dir (preset_g and preset_d are needed to derive it)"
                    .to_string(),
            }
            .into()),
        }
    }

    fn experiment_dirs(&self, settings: &Settings, exp_name: &str) -> ExperimentDirs {
        let o = &settings.overrides;
        ExperimentDirs::under(&self.project_root, exp_name)
            .with_override(DirRole::Checkpoints, o.checkpoint_dir.as_deref())
            .with_override(DirRole::Samples, o.sample_dir.as_deref())
            .with_override(DirRole::Eval, o.eval_dir.as_deref())
            .with_override(DirRole::Logs, o.log_dir.as_deref())
            .with_override(DirRole::Src, o.src_dir.as_deref())
    }
}

/// A preset and an explicit spec are mutually exclusive for each role.
fn resolve_network(settings: &Settings, role: NetworkRole) -> Result<NetworkSpec> {
    let explicit = settings.overrides.network(role);
    let spec = match (settings.preset(role), explicit) {
        (Some(_), Some(_)) => return Err(ConfigError::ConflictingArchitecture { role }.into()),
        (Some(name), None) => {
            let spec = presets::lookup(role, name)?;
            tracing::debug!(role = %role, preset = name, layers = spec.len(), "Loaded preset");
            spec
        }
        (None, Some(spec)) => spec.clone(),
        (None, None) => return Err(ConfigError::MissingArchitecture { role }.into()),
    };
    Ok(spec)
}

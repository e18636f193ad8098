//! Experiment name synthesis.

use crate::error::ConfigError;
use crate::presets::NetworkRole;
use crate::settings::{Settings, TrainingPhase};

const SEP: &str = "_";

/// Resolve the experiment name from settings. First matching rule wins:
///
/// 1. an explicit `exp_name`, verbatim
/// 2. `{prefix}_end2end_g_{g}_d_{d}` without two-stage training
/// 3. `{prefix}_pretrain_g_{g}_d_{d}` in the pretrain phase
/// 4. `{prefix}_train_joint_g_{g}_d_{d}_r_{r}` in the joint train phase
/// 5. `{prefix}_train_g_{g}_d_{d}_r_{r}` otherwise
pub fn experiment_name(settings: &Settings) -> Result<String, ConfigError> {
    if let Some(name) = &settings.exp_name {
        return Ok(name.clone());
    }

    let g = required_preset(settings, NetworkRole::Generator)?;
    let d = required_preset(settings, NetworkRole::Discriminator)?;

    if !settings.two_stage_training {
        return Ok(join(&[settings.prefix.as_str(), "end2end", "g", g, "d", d]));
    }

    match settings.training_phase {
        TrainingPhase::Pretrain => Ok(pretrain_name(&settings.prefix, g, d)),
        TrainingPhase::Train => {
            let r = required_preset(settings, NetworkRole::Refiner)?;
            let mut tokens = vec![settings.prefix.as_str(), "train"];
            if settings.joint_training {
                tokens.push("joint");
            }
            tokens.extend(["g", g, "d", d, "r", r]);
            Ok(join(&tokens))
        }
    }
}

/// Name of the pretrain-phase experiment for a prefix and g/d presets.
pub fn pretrain_name(prefix: &str, preset_g: &str, preset_d: &str) -> String {
    join(&[prefix, "pretrain", "g", preset_g, "d", preset_d])
}

fn required_preset(settings: &Settings, role: NetworkRole) -> Result<&str, ConfigError> {
    settings
        .preset(role)
        .ok_or_else(|| ConfigError::MissingField {
            field: format!("{} (needed to derive exp_name)", role.preset_field()),
        })
}

fn join(tokens: &[&str]) -> String {
    tokens.join(SEP)
}

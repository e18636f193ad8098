//! Layered settings loading.
//!
//! Uses `figment`: defaults -> user file -> project file -> explicit file ->
//! environment -> command-line patch. Settings live in
//! `~/.config/bgan/settings.toml` and/or `<project>/.bgan/settings.toml`.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::settings::{Settings, TrainingPhase};

/// Directory inside the project that holds its settings file.
pub const PROJECT_SETTINGS_DIR: &str = ".bgan";
pub const SETTINGS_FILE: &str = "settings.toml";
pub const ENV_PREFIX: &str = "BGAN_";

/// Sparse overrides, typically from command-line flags. Only the fields that
/// are set are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub two_stage_training: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_phase: Option<TrainingPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joint_training: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretrained_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_stage_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_g: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_r: Option<String>,
}

/// `<project>/.bgan/settings.toml`.
pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_SETTINGS_DIR).join(SETTINGS_FILE)
}

fn user_settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "bgan", "bgan")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

/// Load settings from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit patch (passed as argument)
/// 2. Environment variables (`BGAN_PREFIX`, `BGAN_OVERRIDES__LOG_DIR`, ...)
/// 3. Explicit settings file
/// 4. Project settings (`.bgan/settings.toml`)
/// 5. User settings (`~/.config/bgan/settings.toml`)
/// 6. Built-in defaults
pub fn load_settings(
    project_root: Option<&Path>,
    settings_file: Option<&Path>,
    patch: Option<&SettingsPatch>,
) -> Result<Settings, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    if let Some(user) = user_settings_path() {
        if user.exists() {
            figment = figment.merge(Toml::file(&user));
        }
    }

    if let Some(root) = project_root {
        let project = settings_path(root);
        if project.exists() {
            figment = figment.merge(Toml::file(&project));
        }
    }

    // An explicitly named file must exist; `Toml::file` would skip it silently.
    if let Some(file) = settings_file {
        figment = figment.merge(Toml::file_exact(file));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    if let Some(patch) = patch {
        figment = figment.merge(Serialized::defaults(patch));
    }

    figment.extract().map_err(Box::new)
}

/// Whether a project-level or user-level settings file exists.
pub fn settings_exist(project_root: Option<&Path>) -> bool {
    if user_settings_path().is_some_and(|p| p.exists()) {
        return true;
    }
    project_root.is_some_and(|root| settings_path(root).exists())
}

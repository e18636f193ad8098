//! CLI subcommand handlers.

use anyhow::Context;
use std::path::Path;

use bgan_core::loader::{self, SettingsPatch};
use bgan_core::presets::{self, NetworkRole};
use bgan_core::{ConfigResolver, ResolvedConfig, Settings, device, snapshot};

use crate::{Commands, OutputFormat, SettingsAction};

/// Handle a CLI subcommand.
pub fn handle_command(
    command: Commands,
    project: &Path,
    settings_file: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Resolve { overrides, format } => {
            let settings = load(project, settings_file, &overrides.into_patch())?;
            let resolved = ConfigResolver::new(project)
                .resolve(&settings)
                .context("Failed to resolve configuration")?;
            println!("{}", render(&resolved, format)?);
            Ok(())
        }
        Commands::Setup {
            overrides,
            no_snapshot,
        } => {
            let settings = load(project, settings_file, &overrides.into_patch())?;
            run_setup(project, &settings, !no_snapshot)?;
            Ok(())
        }
        Commands::Presets { role } => {
            let roles = match role {
                Some(role) => vec![role],
                None => NetworkRole::ALL.to_vec(),
            };
            print!("{}", list_presets(&roles));
            Ok(())
        }
        Commands::Settings { action } => handle_settings(action, project, settings_file),
    }
}

fn load(
    project: &Path,
    settings_file: Option<&Path>,
    patch: &SettingsPatch,
) -> anyhow::Result<Settings> {
    let settings = loader::load_settings(Some(project), settings_file, Some(patch))
        .map_err(|e| anyhow::anyhow!("Settings error: {}", e))?;
    for warning in settings.validate() {
        tracing::warn!("{warning}");
    }
    Ok(settings)
}

/// Resolve, apply device visibility, provision directories and snapshot
/// sources. Nothing touches the filesystem until resolution has succeeded.
fn run_setup(
    project: &Path,
    settings: &Settings,
    with_snapshot: bool,
) -> anyhow::Result<ResolvedConfig> {
    let resolver = ConfigResolver::new(project);
    let resolved = resolver
        .resolve(settings)
        .context("Failed to resolve configuration")?;

    device::apply_visibility(&resolved.device);

    resolved
        .model
        .dirs
        .provision()
        .context("Failed to create experiment directories")?;

    if with_snapshot {
        snapshot::snapshot_sources(project, &resolved.model.dirs.src_dir, &settings.snapshot)
            .context("Failed to back up source files")?;
    }

    tracing::info!(
        exp_name = %resolved.experiment.exp_name,
        "Experiment ready"
    );
    println!("Experiment: {}", resolved.experiment.exp_name);
    for (role, path) in resolved.model.dirs.iter() {
        println!("  {:<12} {}", role.subfolder(), path.display());
    }
    if resolved.experiment.two_stage_training {
        println!(
            "  {:<12} {}",
            "first stage",
            resolved.experiment.first_stage_dir.display()
        );
    }
    Ok(resolved)
}

fn render(resolved: &ResolvedConfig, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(resolved)?,
        OutputFormat::Toml => toml::to_string_pretty(resolved)?,
    })
}

fn list_presets(roles: &[NetworkRole]) -> String {
    let mut out = String::new();
    for role in roles {
        out.push_str(&format!("{role}:\n"));
        for preset in presets::registry(*role) {
            let spec = preset.build();
            out.push_str(&format!("  {:<20} {}\n", preset.name, spec.describe()));
        }
    }
    out
}

fn handle_settings(
    action: SettingsAction,
    project: &Path,
    settings_file: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        SettingsAction::Init => {
            let path = loader::settings_path(project);
            if path.exists() {
                println!("Settings file already exists at: {}", path.display());
                return Ok(());
            }
            write_default_settings(&path)?;
            println!("Created default settings at: {}", path.display());
            Ok(())
        }
        SettingsAction::Show => {
            if settings_file.is_none() && !loader::settings_exist(Some(project)) {
                tracing::info!(
                    path = %loader::settings_path(project).display(),
                    "No settings file found; showing defaults"
                );
            }
            let settings = load(project, settings_file, &SettingsPatch::default())?;
            print!("{}", toml::to_string_pretty(&settings)?);
            Ok(())
        }
    }
}

fn write_default_settings(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let toml_str = toml::to_string_pretty(&Settings::default())?;
    std::fs::write(path, toml_str).with_context(|| format!("Failed to write {}", path.display()))
}

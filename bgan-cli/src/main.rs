//! bgan CLI: resolve and provision experiment configurations for GAN training runs.

mod commands;

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use bgan_core::{NetworkRole, SettingsPatch, TrainingPhase};

/// bgan: experiment setup for binarized GAN training
#[derive(Parser, Debug)]
#[command(name = "bgan", version, about, long_about = None)]
struct Cli {
    /// Project root; experiments are created under `<project>/exp`
    #[arg(short, long, default_value = ".")]
    project: PathBuf,

    /// Extra settings file merged over the project settings
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Resolve settings and print the resulting records (no side effects)
    Resolve {
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Resolve settings, create the experiment directories and snapshot sources
    Setup {
        #[command(flatten)]
        overrides: OverrideArgs,
        /// Skip copying sources into the experiment's `src` directory
        #[arg(long)]
        no_snapshot: bool,
    },
    /// List registered architecture presets
    Presets {
        /// Only list presets for this role (generator, discriminator, refiner)
        #[arg(short, long)]
        role: Option<NetworkRole>,
    },
    /// Manage project settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum SettingsAction {
    /// Create a default `.bgan/settings.toml`
    Init,
    /// Show the merged settings
    Show,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Toml,
}

/// Command-line overrides, applied above files and environment.
#[derive(clap::Args, Debug, Default)]
struct OverrideArgs {
    /// Experiment name (derived from prefix and presets when omitted)
    #[arg(long)]
    exp_name: Option<String>,
    /// Prefix for derived experiment names
    #[arg(long)]
    prefix: Option<String>,
    /// Visible device list, e.g. "0" or "0,1"
    #[arg(long)]
    gpu: Option<String>,
    /// Training data identifier
    #[arg(long)]
    training_data: Option<String>,
    /// Training phase of a two-stage run: pretrain or train
    #[arg(long, value_parser = parse_phase)]
    phase: Option<TrainingPhase>,
    /// Train generator and refiner jointly (`--joint=false` to turn off)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    joint: Option<bool>,
    /// Train end to end instead of in two stages (`--end2end=false` for two stages)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    end2end: Option<bool>,
    /// Directory with a pretrained model to start from
    #[arg(long)]
    pretrained_dir: Option<PathBuf>,
    /// Checkpoints of the first stage (derived when omitted)
    #[arg(long)]
    first_stage_dir: Option<PathBuf>,
    /// Generator preset
    #[arg(long)]
    preset_g: Option<String>,
    /// Discriminator preset
    #[arg(long)]
    preset_d: Option<String>,
    /// Refiner preset
    #[arg(long)]
    preset_r: Option<String>,
}

impl OverrideArgs {
    fn into_patch(self) -> SettingsPatch {
        SettingsPatch {
            exp_name: self.exp_name,
            prefix: self.prefix,
            gpu: self.gpu,
            training_data: self.training_data,
            two_stage_training: self.end2end.map(|end2end| !end2end),
            training_phase: self.phase,
            joint_training: self.joint,
            pretrained_dir: self.pretrained_dir,
            first_stage_dir: self.first_stage_dir,
            preset_g: self.preset_g,
            preset_d: self.preset_d,
            preset_r: self.preset_r,
        }
    }
}

fn parse_phase(s: &str) -> Result<TrainingPhase, String> {
    match s {
        "pretrain" => Ok(TrainingPhase::Pretrain),
        "train" => Ok(TrainingPhase::Train),
        other => Err(format!("unknown training phase '{other}' (pretrain, train)")),
    }
}

/// Canonical project root. A missing directory is an error, never a fallback
/// to the working directory.
fn project_root(path: &std::path::Path) -> anyhow::Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("Project directory {} not found", path.display()))
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Human-readable layer for stderr (always active)
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // JSON file layer for structured logging
    let log_dir = directories::ProjectDirs::from("org", "bgan", "bgan")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "bgan.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let project = project_root(&cli.project)?;

    commands::handle_command(cli.command, &project, cli.settings.as_deref())
}

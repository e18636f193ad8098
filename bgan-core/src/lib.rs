//! # bgan core
//!
//! Experiment configuration for binarized GAN training runs. Turns a small
//! quick-setup [`Settings`] record into read-only experiment, data, model and
//! training records, and provisions the experiment directory that the
//! training code writes into.
//!
//! Resolution is pure; filesystem and environment changes are explicit:
//!
//! ```no_run
//! use bgan_core::{ConfigResolver, Settings, device, snapshot};
//!
//! let settings = Settings::default();
//! let resolver = ConfigResolver::new("/path/to/project");
//! let resolved = resolver.resolve(&settings)?;
//! device::apply_visibility(&resolved.device);
//! resolved.model.dirs.provision()?;
//! snapshot::snapshot_sources(
//!     resolver.project_root(),
//!     &resolved.model.dirs.src_dir,
//!     &settings.snapshot,
//! )?;
//! # Ok::<(), bgan_core::BganError>(())
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod layout;
pub mod loader;
pub mod naming;
pub mod presets;
pub mod resolver;
pub mod settings;
pub mod snapshot;

// Re-export commonly used types at the crate root.
pub use config::{
    DataConfig, DeviceConfig, ExperimentConfig, GanConfig, GanKind, ModelConfig,
    OptimizerConfig, ResolvedConfig, TrainConfig,
};
pub use error::{BganError, ConfigError, Result};
pub use layout::{DirRole, ExperimentDirs};
pub use loader::{SettingsPatch, load_settings, settings_exist};
pub use presets::{NetworkRole, NetworkSpec};
pub use resolver::ConfigResolver;
pub use settings::{DataLocation, Overrides, Settings, TrainingPhase};
pub use snapshot::{SnapshotReport, SnapshotSettings};

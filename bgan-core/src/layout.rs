//! On-disk layout of an experiment: `<root>/exp/<name>/{checkpoints,samples,eval,logs,src}`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{BganError, Result};

/// Folder under the project root that holds all experiments.
pub const EXP_DIR: &str = "exp";

/// The five directories every experiment owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirRole {
    Checkpoints,
    Samples,
    Eval,
    Logs,
    Src,
}

impl DirRole {
    pub const ALL: [DirRole; 5] = [
        Self::Checkpoints,
        Self::Samples,
        Self::Eval,
        Self::Logs,
        Self::Src,
    ];

    /// Subfolder name inside the experiment directory.
    pub fn subfolder(self) -> &'static str {
        match self {
            Self::Checkpoints => "checkpoints",
            Self::Samples => "samples",
            Self::Eval => "eval",
            Self::Logs => "logs",
            Self::Src => "src",
        }
    }
}

impl fmt::Display for DirRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subfolder())
    }
}

/// `<root>/exp/<exp_name>`.
pub fn experiment_root(project_root: &Path, exp_name: &str) -> PathBuf {
    project_root.join(EXP_DIR).join(exp_name)
}

/// Resolved output directories of an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentDirs {
    pub checkpoint_dir: PathBuf,
    pub sample_dir: PathBuf,
    pub eval_dir: PathBuf,
    pub log_dir: PathBuf,
    pub src_dir: PathBuf,
}

impl ExperimentDirs {
    /// Default layout under `<root>/exp/<exp_name>`.
    pub fn under(project_root: &Path, exp_name: &str) -> Self {
        let base = experiment_root(project_root, exp_name);
        Self {
            checkpoint_dir: base.join(DirRole::Checkpoints.subfolder()),
            sample_dir: base.join(DirRole::Samples.subfolder()),
            eval_dir: base.join(DirRole::Eval.subfolder()),
            log_dir: base.join(DirRole::Logs.subfolder()),
            src_dir: base.join(DirRole::Src.subfolder()),
        }
    }

    pub fn get(&self, role: DirRole) -> &Path {
        match role {
            DirRole::Checkpoints => &self.checkpoint_dir,
            DirRole::Samples => &self.sample_dir,
            DirRole::Eval => &self.eval_dir,
            DirRole::Logs => &self.log_dir,
            DirRole::Src => &self.src_dir,
        }
    }

    fn get_mut(&mut self, role: DirRole) -> &mut PathBuf {
        match role {
            DirRole::Checkpoints => &mut self.checkpoint_dir,
            DirRole::Samples => &mut self.sample_dir,
            DirRole::Eval => &mut self.eval_dir,
            DirRole::Logs => &mut self.log_dir,
            DirRole::Src => &mut self.src_dir,
        }
    }

    /// Replace the directory for `role` when `path` is given.
    pub fn with_override(mut self, role: DirRole, path: Option<&Path>) -> Self {
        if let Some(path) = path {
            *self.get_mut(role) = path.to_path_buf();
        }
        self
    }

    /// Directories in fixed order: checkpoints, samples, eval, logs, src.
    pub fn iter(&self) -> impl Iterator<Item = (DirRole, &Path)> {
        DirRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// Create every directory (and missing ancestors). Existing directories
    /// are left alone, so calling this repeatedly is fine.
    pub fn provision(&self) -> Result<()> {
        for (role, path) in self.iter() {
            if path.is_dir() {
                tracing::debug!(dir = %role, path = %path.display(), "Directory exists");
                continue;
            }
            std::fs::create_dir_all(path).map_err(|e| BganError::io(path, e))?;
            tracing::info!(dir = %role, path = %path.display(), "Created directory");
        }
        Ok(())
    }
}

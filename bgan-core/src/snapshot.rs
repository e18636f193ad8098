//! Source snapshot: copies the project's sources into the experiment's `src`
//! directory so a run can be traced back to the code that produced it.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{BganError, Result};

/// What gets copied by [`snapshot_sources`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotSettings {
    /// Extension of top-level source files, without the dot.
    pub extension: String,
    /// Architecture source tree, relative to the project root. Copied to the
    /// same relative path under the snapshot directory.
    pub tree: PathBuf,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            tree: PathBuf::from("bgan"),
        }
    }
}

/// Number of files copied by each half of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotReport {
    pub top_level_files: usize,
    pub tree_files: usize,
}

/// Copy top-level source files flat into `src_dir`, then merge the source
/// tree into `src_dir/<tree>`. Existing files are overwritten; files that only
/// exist at the destination are kept.
pub fn snapshot_sources(
    project_root: &Path,
    src_dir: &Path,
    settings: &SnapshotSettings,
) -> Result<SnapshotReport> {
    std::fs::create_dir_all(src_dir).map_err(|e| BganError::io(src_dir, e))?;
    ensure_distinct(project_root, src_dir)?;

    let origin = project_root.join(&settings.tree);
    let dest = src_dir.join(&settings.tree);
    if dest.exists() {
        ensure_distinct(&origin, &dest)?;
    }

    let top_level_files = copy_top_level(project_root, src_dir, &settings.extension)?;
    let tree_files = copy_tree(&origin, &dest)?;

    let report = SnapshotReport {
        top_level_files,
        tree_files,
    };
    tracing::info!(
        src_dir = %src_dir.display(),
        top_level = report.top_level_files,
        tree = report.tree_files,
        "Snapshot sources"
    );
    Ok(report)
}

/// Fails when `target` is the same file or directory as `source`, since
/// copying onto itself truncates the source.
fn ensure_distinct(source: &Path, target: &Path) -> Result<()> {
    let source = source.canonicalize().map_err(|e| BganError::io(source, e))?;
    let resolved = target.canonicalize().map_err(|e| BganError::io(target, e))?;
    if source == resolved {
        return Err(BganError::io(
            target,
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("snapshot target is the source itself ({})", source.display()),
            ),
        ));
    }
    Ok(())
}

/// `std::fs::copy` guarded against copying a file onto itself.
fn copy_file(source: &Path, target: &Path) -> Result<()> {
    if target.exists() {
        ensure_distinct(source, target)?;
    }
    std::fs::copy(source, target).map_err(|e| BganError::io(source, e))?;
    Ok(())
}

fn copy_top_level(project_root: &Path, src_dir: &Path, extension: &str) -> Result<usize> {
    let extension = extension.trim_start_matches('.');
    let entries = std::fs::read_dir(project_root).map_err(|e| BganError::io(project_root, e))?;

    let mut copied = 0;
    for entry in entries {
        let path = entry.map_err(|e| BganError::io(project_root, e))?.path();
        if !path.is_file() || path.extension() != Some(OsStr::new(extension)) {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = src_dir.join(file_name);
        copy_file(&path, &target)?;
        copied += 1;
    }
    Ok(copied)
}

/// Recursive merge copy of `origin` into `dest`.
fn copy_tree(origin: &Path, dest: &Path) -> Result<usize> {
    if !origin.is_dir() {
        return Err(BganError::io(
            origin,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "source tree does not exist or is not a directory",
            ),
        ));
    }

    let mut copied = 0;
    // Never descend into the destination when it lives inside the origin.
    let walker = WalkDir::new(origin)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(dest));
    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(origin).to_path_buf();
            BganError::io(path, e.into())
        })?;
        let relative = entry.path().strip_prefix(origin).unwrap_or(entry.path());
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| BganError::io(&target, e))?;
        } else if entry.file_type().is_file() {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

//! Artifact materialization.
//!
//! `create` artifacts are written to a temp file in the target directory and
//! renamed into place, so each file is replaced atomically. `append` adds to
//! the end of the target, creating it with the artifact's mode if absent.
//! Applying a list is not atomic as a whole.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::Write;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

use hostcfg_cri_registry::{FileArtifact, FileOp};
use tracing::info;

use crate::error::ApplyError;

/// Counts of what an apply run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub created: usize,
    pub appended: usize,
    pub bytes: u64,
}

/// Writes generated artifacts to the filesystem.
#[derive(Debug, Clone, Default)]
pub struct ArtifactWriter {
    /// Prefix every artifact path is re-rooted under.
    root: Option<PathBuf>,

    /// Log instead of writing.
    dry_run: bool,
}

impl ArtifactWriter {
    /// Writer targeting the real filesystem root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-root all artifact paths under `root`.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Only log what would be written.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Host path an artifact will be written to.
    pub fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path.trim_start_matches('/')),
            None => PathBuf::from(path),
        }
    }

    /// Apply artifacts in order, stopping at the first failure.
    pub fn apply(&self, artifacts: &[FileArtifact]) -> Result<ApplySummary, ApplyError> {
        let mut summary = ApplySummary::default();

        for artifact in artifacts {
            let target = self.resolve(&artifact.path);

            if self.dry_run {
                info!(
                    path = %target.display(),
                    op = %artifact.op,
                    mode = format_args!("{:o}", artifact.permissions),
                    bytes = artifact.len(),
                    digest = %artifact.content_digest(),
                    "dry run: artifact not written"
                );
            } else {
                match artifact.op {
                    FileOp::Create => write_create(&target, artifact)?,
                    FileOp::Append => write_append(&target, artifact)?,
                }
                info!(
                    path = %target.display(),
                    op = %artifact.op,
                    mode = format_args!("{:o}", artifact.permissions),
                    bytes = artifact.len(),
                    digest = %artifact.content_digest(),
                    "artifact written"
                );
            }

            match artifact.op {
                FileOp::Create => summary.created += 1,
                FileOp::Append => summary.appended += 1,
            }
            summary.bytes += artifact.len() as u64;
        }

        Ok(summary)
    }
}

fn ensure_parent(path: &Path) -> Result<(), ApplyError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            ApplyError::write_failed(path, format!("failed to create directory: {}", e))
        })?;
    }
    Ok(())
}

/// Temp file next to `path`: `<name>.tmp`.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_create(path: &Path, artifact: &FileArtifact) -> Result<(), ApplyError> {
    ensure_parent(path)?;

    let tmp_path = temp_path(path);
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(artifact.permissions)
        .open(&tmp_path)
        .map_err(|e| ApplyError::write_failed(path, format!("open failed: {}", e)))?;

    // The temp file holds secret material; it must not outlive a failure.
    let result = fill_and_rename(file, &tmp_path, path, artifact);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn fill_and_rename(
    mut file: File,
    tmp_path: &Path,
    path: &Path,
    artifact: &FileArtifact,
) -> Result<(), ApplyError> {
    file.write_all(&artifact.content)
        .map_err(|e| ApplyError::write_failed(path, format!("write failed: {}", e)))?;

    // A leftover temp file keeps its old mode; the requested one wins.
    file.set_permissions(Permissions::from_mode(artifact.permissions))
        .map_err(|e| ApplyError::write_failed(path, format!("chmod failed: {}", e)))?;

    file.sync_all()
        .map_err(|e| ApplyError::write_failed(path, format!("sync failed: {}", e)))?;
    drop(file);

    fs::rename(tmp_path, path)
        .map_err(|e| ApplyError::write_failed(path, format!("rename failed: {}", e)))
}

fn write_append(path: &Path, artifact: &FileArtifact) -> Result<(), ApplyError> {
    ensure_parent(path)?;

    let mut file: File = OpenOptions::new()
        .append(true)
        .create(true)
        .mode(artifact.permissions)
        .open(path)
        .map_err(|e| ApplyError::write_failed(path, format!("open failed: {}", e)))?;

    file.write_all(&artifact.content)
        .map_err(|e| ApplyError::write_failed(path, format!("append failed: {}", e)))?;

    file.sync_all()
        .map_err(|e| ApplyError::write_failed(path, format!("sync failed: {}", e)))?;

    Ok(())
}

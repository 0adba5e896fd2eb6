//! The `package` operation: stage, detect the version, archive.
//!
//! Steps run strictly in order and each one is idempotent, but the run as a
//! whole is not a transaction: a failure after staging leaves the staging
//! folder as far as it got. Only the temporary archive directory is cleaned
//! up on failure.
//!
//! Progress is reported through [`PackageEvent`]s handed to a callback, so
//! the CLI can print while library callers and tests can collect or ignore.

use crate::archive::{self, ArchiveError, ArchiveSummary};
use crate::config::PackConfig;
use crate::naming;
use crate::stage::{self, StageError, StageReport};
use crate::version::{self, VersionError, VersionMarker};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Version(#[from] VersionError),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Progress notifications emitted by [`package`], in order.
#[derive(Debug, Clone)]
pub enum PackageEvent {
    Staged(StageReport),
    VersionFound(VersionMarker),
    Archived(ArchiveSummary),
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub staging_dir: PathBuf,
    pub version: VersionMarker,
    pub archive: ArchiveSummary,
}

/// Stage the plugin and write `<plugin_name>_<version>.zip` into `root`.
///
/// All relative paths in `config` resolve against `root`.
pub fn package(
    config: &PackConfig,
    root: &Path,
    mut on_event: impl FnMut(&PackageEvent),
) -> Result<PackageReport, PackageError> {
    let staged = stage::stage(config, root)?;
    let staging_dir = staged.staging_dir.clone();
    on_event(&PackageEvent::Staged(staged));

    let marker = detect_version(config, root)?;
    on_event(&PackageEvent::VersionFound(marker.clone()));

    let archive_path = root.join(naming::archive_file_name(
        &config.plugin_name,
        &marker.version,
    ));
    let summary = archive::build_archive(&staging_dir, &config.plugin_name, &archive_path, root)?;
    on_event(&PackageEvent::Archived(summary.clone()));

    Ok(PackageReport {
        staging_dir,
        version: marker,
        archive: summary,
    })
}

/// Run only the version scan over the configured source tree.
pub fn detect_version(config: &PackConfig, root: &Path) -> Result<VersionMarker, VersionError> {
    version::find_version(&root.join(&config.source), &config.plugin_name)
}

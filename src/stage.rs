//! Staging folder assembly.
//!
//! Builds the distributable plugin folder next to the archive:
//!
//! ```text
//! out/                         # Working directory
//! └── 31edo_tuner/             # Staging folder (plugin_name)
//!     ├── 31EDO_Tuner.qml      # ← ../source/ (merged, recursive)
//!     ├── libs/
//!     │   └── 31EdoUtils.js
//!     ├── LICENSE              # ← ../LICENSE (base name only)
//!     ├── logs/                # created empty if absent
//!     └── thumbnails/          # ← ../thumbnails/*.png
//!         └── tuner.png
//! ```
//!
//! Every step is idempotent. Re-running overwrites same-named files and
//! leaves anything else already in the staging folder untouched; nothing is
//! ever deleted here.

use crate::config::PackConfig;
use globset::{Glob, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk source folder: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid thumbnail pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Source folder not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Auxiliary file not found: {0}")]
    MissingFile(PathBuf),
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// What a staging run touched, for reporting.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    pub staging_dir: PathBuf,
    /// Files copied from the source tree.
    pub source_files: usize,
    /// Auxiliary files, as written into the staging root.
    pub files: Vec<PathBuf>,
    /// Folders that did not exist before this run.
    pub created_folders: Vec<PathBuf>,
    /// Thumbnails, as written into the staging thumbnails folder.
    pub thumbnails: Vec<PathBuf>,
}

/// Assemble the staging folder for `config` under the working directory `root`.
pub fn stage(config: &PackConfig, root: &Path) -> Result<StageReport, StageError> {
    let staging_dir = config.staging_dir(root);

    let source = root.join(&config.source);
    if !source.is_dir() {
        return Err(StageError::SourceNotFound(config.source.clone()));
    }
    let source_files = copy_tree(&source, &staging_dir)?;

    let files = copy_files(root, &config.files, &staging_dir)?;

    let mut created_folders = Vec::new();
    for folder in [&config.logs_folder, &config.thumbnails.folder] {
        let path = staging_dir.join(folder);
        if ensure_dir(&path)? {
            created_folders.push(path);
        }
    }

    let matcher = Glob::new(&config.thumbnails.pattern)?.compile_matcher();
    let thumbnails = copy_matching(
        &root.join(&config.thumbnails.source),
        &matcher,
        &staging_dir.join(&config.thumbnails.folder),
    )?;

    Ok(StageReport {
        staging_dir,
        source_files,
        files,
        created_folders,
        thumbnails,
    })
}

/// Recursively copy `src` into `dst`, merging with whatever `dst` holds.
///
/// Returns the number of files copied. Symlinks are followed, so the copy
/// holds real files.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, StageError> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copy each of `files` (relative to `root`) into `dst` under its base name.
pub fn copy_files(root: &Path, files: &[PathBuf], dst: &Path) -> Result<Vec<PathBuf>, StageError> {
    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let from = root.join(file);
        if !from.is_file() {
            return Err(StageError::MissingFile(file.clone()));
        }
        let Some(name) = file.file_name() else {
            return Err(StageError::MissingFile(file.clone()));
        };
        let to = dst.join(name);
        copy_file(&from, &to)?;
        written.push(to);
    }
    Ok(written)
}

/// Create `path` (and parents) if missing. Returns `true` if it was created.
pub fn ensure_dir(path: &Path) -> Result<bool, StageError> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path)?;
    Ok(true)
}

/// Copy the files directly inside `src` whose name matches `matcher` into `dst`.
///
/// A missing `src` matches nothing. Hidden files are never matched, and
/// results are sorted by name.
pub fn copy_matching(
    src: &Path,
    matcher: &GlobMatcher,
    dst: &Path,
) -> Result<Vec<PathBuf>, StageError> {
    if !src.is_dir() {
        return Ok(Vec::new());
    }

    let mut matches: Vec<PathBuf> = fs::read_dir(src)?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|name| {
                        !name.to_string_lossy().starts_with('.') && matcher.is_match(name)
                    })
                    .unwrap_or(false)
        })
        .collect();
    matches.sort();

    fs::create_dir_all(dst)?;
    let mut written = Vec::with_capacity(matches.len());
    for from in matches {
        let Some(name) = from.file_name() else {
            continue;
        };
        let to = dst.join(name);
        copy_file(&from, &to)?;
        written.push(to);
    }
    Ok(written)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), StageError> {
    fs::copy(from, to).map_err(|source| StageError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

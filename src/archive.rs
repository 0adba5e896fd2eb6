//! Versioned zip archive creation.
//!
//! The archive holds the staging folder under its own name, so unpacking
//! `31edo_tuner_1.2.3.zip` yields a single `31edo_tuner/` folder:
//!
//! ```text
//! 31edo_tuner/
//! 31edo_tuner/31EDO_Tuner.qml
//! 31edo_tuner/LICENSE
//! 31edo_tuner/logs/
//! 31edo_tuner/thumbnails/
//! 31edo_tuner/thumbnails/tuner.png
//! ```
//!
//! To get that prefix the staging folder is first copied into a temporary
//! directory as `<tmp>/<root_name>/`, and the zip is built from `<tmp>`.
//! The temporary directory is a [`tempfile::TempDir`], so it is removed
//! whether archiving succeeds or fails.
//!
//! Entries are written in sorted path order. Folders get explicit entries so
//! empty ones (like `logs/`) survive the round trip, and files are deflated.

use crate::stage::{self, StageError};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// Prefix of the temporary directory created next to the archive.
const TEMP_PREFIX: &str = ".pack-tmp-";

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to copy staging folder: {0}")]
    Copy(#[from] StageError),
    #[error("Failed to walk archive contents: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to write archive {path}: {source}")]
    Zip {
        path: PathBuf,
        source: zip::result::ZipError,
    },
}

/// A written archive.
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Number of zip entries, folders included.
    pub entries: usize,
    /// Hex SHA-256 of the archive file.
    pub sha256: String,
}

/// Zip `staging_dir` into `archive_path` with every entry under `root_name/`.
///
/// The temporary copy is created inside `work_dir`.
pub fn build_archive(
    staging_dir: &Path,
    root_name: &str,
    archive_path: &Path,
    work_dir: &Path,
) -> Result<ArchiveSummary, ArchiveError> {
    let tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir_in(work_dir)?;
    stage::copy_tree(staging_dir, &tmp.path().join(root_name))?;

    let entries = write_zip(tmp.path(), archive_path)?;
    tmp.close()?;

    Ok(ArchiveSummary {
        path: archive_path.to_path_buf(),
        entries,
        sha256: hash_file(archive_path)?,
    })
}

/// Write every file and folder under `src_root` into a new zip at `archive_path`.
///
/// Entry names are relative to `src_root` and always use `/`. Returns the
/// number of entries written.
pub fn write_zip(src_root: &Path, archive_path: &Path) -> Result<usize, ArchiveError> {
    let zip_err = |source| ArchiveError::Zip {
        path: archive_path.to_path_buf(),
        source,
    };

    let mut zip = ZipWriter::new(File::create(archive_path)?);
    let mut entries = 0;

    for entry in WalkDir::new(src_root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src_root)
            .expect("walkdir yields paths under its root");
        let name = entry_name(rel);
        let options = entry_options(&entry.metadata()?);

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(zip_err)?;
        } else {
            zip.start_file(name, options).map_err(zip_err)?;
            let mut file = File::open(entry.path())?;
            io::copy(&mut file, &mut zip)?;
        }
        entries += 1;
    }

    zip.finish().map_err(zip_err)?;
    Ok(entries)
}

/// Zip entry name for a relative path: components joined with `/`.
fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn entry_options(metadata: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn entry_options(_metadata: &fs::Metadata) -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

/// SHA-256 hash of a file's contents, returned as a hex string.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{temp_leftovers, write_file, zip_entries, zip_file_contents};
    use tempfile::TempDir;

    fn staged(tmp: &TempDir) -> PathBuf {
        let staging = tmp.path().join("31edo_tuner");
        write_file(&staging.join("31EDO_Tuner.qml"), "version: \"1.2.3\";\n");
        write_file(&staging.join("libs/31EdoUtils.js"), "// utils\n");
        fs::create_dir_all(staging.join("logs")).unwrap();
        staging
    }

    #[test]
    fn entries_live_under_root_folder() {
        let tmp = TempDir::new().unwrap();
        let staging = staged(&tmp);
        let archive = tmp.path().join("31edo_tuner_1.2.3.zip");

        let summary = build_archive(&staging, "31edo_tuner", &archive, tmp.path()).unwrap();

        let names = zip_entries(&archive);
        assert_eq!(
            names,
            vec![
                "31edo_tuner/",
                "31edo_tuner/31EDO_Tuner.qml",
                "31edo_tuner/libs/",
                "31edo_tuner/libs/31EdoUtils.js",
                "31edo_tuner/logs/",
            ]
        );
        assert_eq!(summary.entries, 5);
        assert_eq!(summary.path, archive);
    }

    #[test]
    fn file_contents_survive() {
        let tmp = TempDir::new().unwrap();
        let staging = staged(&tmp);
        let archive = tmp.path().join("out.zip");

        build_archive(&staging, "31edo_tuner", &archive, tmp.path()).unwrap();

        assert_eq!(
            zip_file_contents(&archive, "31edo_tuner/31EDO_Tuner.qml"),
            "version: \"1.2.3\";\n"
        );
    }

    #[test]
    fn root_name_need_not_match_staging_folder() {
        let tmp = TempDir::new().unwrap();
        let staging = staged(&tmp);
        let archive = tmp.path().join("out.zip");

        build_archive(&staging, "renamed", &archive, tmp.path()).unwrap();

        assert!(zip_entries(&archive).iter().all(|n| n.starts_with("renamed/")));
    }

    #[test]
    fn temp_dir_removed_after_success() {
        let tmp = TempDir::new().unwrap();
        let staging = staged(&tmp);
        let archive = tmp.path().join("out.zip");

        build_archive(&staging, "31edo_tuner", &archive, tmp.path()).unwrap();

        assert!(temp_leftovers(tmp.path()).is_empty());
    }

    #[test]
    fn temp_dir_removed_after_failure() {
        let tmp = TempDir::new().unwrap();
        let staging = staged(&tmp);
        let archive = tmp.path().join("no-such-dir/out.zip");

        let result = build_archive(&staging, "31edo_tuner", &archive, tmp.path());

        assert!(matches!(result, Err(ArchiveError::Io(_))));
        assert!(temp_leftovers(tmp.path()).is_empty());
    }

    #[test]
    fn rebuilding_overwrites_archive() {
        let tmp = TempDir::new().unwrap();
        let staging = staged(&tmp);
        let archive = tmp.path().join("out.zip");

        build_archive(&staging, "31edo_tuner", &archive, tmp.path()).unwrap();
        write_file(&staging.join("LICENSE"), "GPL");
        let summary = build_archive(&staging, "31edo_tuner", &archive, tmp.path()).unwrap();

        assert_eq!(summary.entries, 6);
        assert!(zip_entries(&archive).contains(&"31edo_tuner/LICENSE".to_string()));
    }

    #[test]
    fn checksum_matches_file() {
        let tmp = TempDir::new().unwrap();
        let staging = staged(&tmp);
        let archive = tmp.path().join("out.zip");

        let summary = build_archive(&staging, "31edo_tuner", &archive, tmp.path()).unwrap();

        assert_eq!(summary.sha256.len(), 64);
        assert_eq!(summary.sha256, hash_file(&archive).unwrap());
    }

    #[test]
    fn hash_file_known_value() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("abc");
        fs::write(&path, "abc").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn entry_name_uses_forward_slashes() {
        let rel: PathBuf = ["a", "b", "c.txt"].iter().collect();
        assert_eq!(entry_name(&rel), "a/b/c.txt");
    }
}

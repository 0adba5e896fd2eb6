//! Version detection from plugin source files.
//!
//! The release version lives in the plugin source itself, as a property line:
//!
//! ```text
//! MuseScore {
//!     version: "1.2.3";
//!     ...
//! }
//! ```
//!
//! The scan walks the source tree, considers only files whose name contains
//! the plugin name (see [`naming::matches_plugin`](crate::naming::matches_plugin)),
//! and returns the first line that, once trimmed, starts with
//! `version: "<value>";`. The `version:` literal is case-sensitive.
//!
//! Within a folder, files are visited before subfolders, so a marker at the
//! top of the tree beats a nested one. Among siblings the order is whatever
//! the filesystem reports, so when two files in one folder carry a marker the
//! winner is not guaranteed across platforms. That is why [`VersionMarker`]
//! records where the version came from.

use crate::naming;
use regex::Regex;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

static VERSION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^version:\s*"(.+)";"#).expect("version pattern is valid"));

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Source folder not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Failed to walk source folder: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not find a version number in {source_dir} for plugin {plugin_name}")]
    NotFound {
        source_dir: PathBuf,
        plugin_name: String,
    },
}

/// A version string and where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionMarker {
    pub version: String,
    pub path: PathBuf,
    /// 1-based line number within `path`.
    pub line: usize,
}

/// Extract the version from a single line, if it is a version marker.
///
/// ```text
/// version: "1.2.3";        → Some("1.2.3")
///   version:"1.2.3";  // x → Some("1.2.3")
/// Version: "1.2.3";        → None
/// ```
pub fn parse_version_line(line: &str) -> Option<&str> {
    VERSION_LINE
        .captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Find the version marker for `plugin_name` under `source_dir`.
pub fn find_version(source_dir: &Path, plugin_name: &str) -> Result<VersionMarker, VersionError> {
    if !source_dir.is_dir() {
        return Err(VersionError::SourceNotFound(source_dir.to_path_buf()));
    }

    // Files of a directory are visited before its subdirectories, so a marker
    // at the top of the tree beats one in a nested folder.
    let walk = WalkDir::new(source_dir)
        .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()));

    for entry in walk {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !naming::matches_plugin(plugin_name, &file_name) {
            continue;
        }
        if let Some(marker) = scan_file(entry.path())? {
            return Ok(marker);
        }
    }

    Err(VersionError::NotFound {
        source_dir: source_dir.to_path_buf(),
        plugin_name: plugin_name.to_string(),
    })
}

/// First version marker in a single file.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
fn scan_file(path: &Path) -> Result<Option<VersionMarker>, VersionError> {
    let read_err = |source| VersionError::Read {
        path: path.to_path_buf(),
        source,
    };
    let reader = BufReader::new(File::open(path).map_err(read_err)?);

    let mut line_number = 0;
    for line in reader.lines() {
        let line = line.map_err(read_err)?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        for segment in line.split('\r') {
            line_number += 1;
            if let Some(version) = parse_version_line(segment) {
                return Ok(Some(VersionMarker {
                    version: version.to_string(),
                    path: path.to_path_buf(),
                    line: line_number,
                }));
            }
        }
    }
    Ok(None)
}

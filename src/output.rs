//! CLI output formatting for the packaging steps.
//!
//! Each [`PackageEvent`] renders as a `==>` header line followed by indented
//! context lines. Paths are shown relative to the working directory so the
//! output reads the same wherever the tool is run from.
//!
//! ```text
//! ==> Staged 31edo_tuner/
//!     Source: 3 files
//!     Files: LICENSE
//!     Created: logs/, thumbnails/
//!     Thumbnails: a.png
//! ==> Version 1.2.3
//!     Source: ../source/31EDO_Tuner.qml:5
//! ==> Archive 31edo_tuner_1.2.3.zip (9 entries)
//!     SHA-256: 3f1c...
//! ```
//!
//! Format functions are pure and return `Vec<String>`; the `print_*`
//! wrappers write them to stdout.

use crate::archive::ArchiveSummary;
use crate::package::PackageEvent;
use crate::stage::StageReport;
use crate::version::VersionMarker;
use std::path::{Path, PathBuf};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display `path` relative to `root` when it lives under it.
fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Comma-separated file names, or `none`.
fn name_list<'a>(paths: impl IntoIterator<Item = &'a PathBuf>, suffix: &str) -> String {
    let names: Vec<String> = paths
        .into_iter()
        .map(|p| {
            let name = p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string());
            format!("{name}{suffix}")
        })
        .collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

fn count(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

pub fn format_stage_report(report: &StageReport, root: &Path) -> Vec<String> {
    vec![
        format!("==> Staged {}/", relative(&report.staging_dir, root)),
        format!("{}Source: {}", indent(1), count(report.source_files, "file", "files")),
        format!("{}Files: {}", indent(1), name_list(&report.files, "")),
        format!(
            "{}Created: {}",
            indent(1),
            name_list(&report.created_folders, "/")
        ),
        format!(
            "{}Thumbnails: {}",
            indent(1),
            name_list(&report.thumbnails, "")
        ),
    ]
}

pub fn format_version(marker: &VersionMarker, root: &Path) -> Vec<String> {
    vec![
        format!("==> Version {}", marker.version),
        format!(
            "{}Source: {}:{}",
            indent(1),
            relative(&marker.path, root),
            marker.line
        ),
    ]
}

pub fn format_archive(summary: &ArchiveSummary, root: &Path) -> Vec<String> {
    vec![
        format!(
            "==> Archive {} ({})",
            relative(&summary.path, root),
            count(summary.entries, "entry", "entries")
        ),
        format!("{}SHA-256: {}", indent(1), summary.sha256),
    ]
}

pub fn format_package_event(event: &PackageEvent, root: &Path) -> Vec<String> {
    match event {
        PackageEvent::Staged(report) => format_stage_report(report, root),
        PackageEvent::VersionFound(marker) => format_version(marker, root),
        PackageEvent::Archived(summary) => format_archive(summary, root),
    }
}

pub fn print_package_event(event: &PackageEvent, root: &Path) {
    for line in format_package_event(event, root) {
        println!("{}", line);
    }
}

pub fn print_version(marker: &VersionMarker, root: &Path) {
    for line in format_version(marker, root) {
        println!("{}", line);
    }
}

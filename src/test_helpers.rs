//! Shared test utilities for the plugin-pack test suite.
//!
//! [`setup_project`] lays out the same folders the release script runs in,
//! with the working directory one level below the plugin sources:
//!
//! ```text
//! <tmp>/
//! ├── LICENSE
//! ├── source/
//! │   ├── 31EDO_Tuner.qml      # carries `version: "<version>";`
//! │   ├── Logger.js
//! │   └── libs/31EdoUtils.js
//! ├── thumbnails/
//! │   ├── a.png
//! │   └── b.jpg
//! └── out/                     # working directory
//! ```

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project tree. Dropping it removes everything.
pub struct Project {
    pub root: TempDir,
    pub source: PathBuf,
    pub work: PathBuf,
}

pub fn setup_project(version: &str) -> Project {
    let root = TempDir::new().unwrap();
    let source = root.path().join("source");
    let work = root.path().join("out");

    write_file(
        &source.join("31EDO_Tuner.qml"),
        &format!(
            "import MuseScore 3.0\n\nMuseScore {{\n    menuPath: \"Plugins.31EDO Tuner\";\n    version: \"{version}\";\n}}\n"
        ),
    );
    write_file(&source.join("Logger.js"), "// logger\n");
    write_file(
        &source.join("libs/31EdoUtils.js"),
        "const VERSION = \"0.0.1\";\n",
    );
    write_file(&root.path().join("LICENSE"), "GPL-3.0-or-later\n");
    write_file(&root.path().join("thumbnails/a.png"), "png");
    write_file(&root.path().join("thumbnails/b.jpg"), "jpg");
    fs::create_dir_all(&work).unwrap();

    Project { root, source, work }
}

/// Write `content` to `path`, creating parent folders.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Entry names of a zip archive, in archive order.
pub fn zip_entries(archive: &Path) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

pub fn zip_file_contents(archive: &Path, name: &str) -> String {
    let mut zip = zip::ZipArchive::new(fs::File::open(archive).unwrap()).unwrap();
    let mut content = String::new();
    zip.by_name(name)
        .unwrap_or_else(|e| panic!("entry '{name}' not found: {e}"))
        .read_to_string(&mut content)
        .unwrap();
    content
}

/// Temporary archive folders left behind in `dir`.
pub fn temp_leftovers(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(".pack-tmp-"))
        })
        .collect()
}

//! Packaging configuration.
//!
//! Every setting has a compiled-in default, so running the tool with no
//! config file packages the `31edo_tuner` plugin from the sibling `source/`
//! folder exactly as the release layout expects. A `pack.toml` in the working
//! directory (or one passed with `--config`) overrides individual keys.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! plugin_name = "31edo_tuner"   # Staging folder, archive prefix, version-file filter
//! source = "../source"          # Source tree copied into the staging folder
//! files = ["../LICENSE"]        # Extra files copied into the staging root
//! logs_folder = "logs"          # Empty folder created inside the staging folder
//!
//! [thumbnails]
//! source = "../thumbnails"      # Folder scanned for thumbnail images
//! pattern = "*.png"             # Glob matched against file names
//! folder = "thumbnails"         # Destination folder inside the staging folder
//! ```
//!
//! Relative paths resolve against the working directory (`--dir`), never
//! against the location of the config file.
//!
//! Config files are sparse and unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when `--config` is absent.
pub const CONFIG_FILENAME: &str = "pack.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Packaging configuration loaded from `pack.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackConfig {
    /// Name of the staging folder. Also the root folder inside the archive,
    /// the archive file prefix, and the filter for version-bearing files.
    pub plugin_name: String,
    /// Source tree merged into the staging folder.
    pub source: PathBuf,
    /// Auxiliary files copied into the staging root by base name.
    pub files: Vec<PathBuf>,
    /// Folder created (empty) inside the staging folder for runtime logs.
    pub logs_folder: String,
    /// Thumbnail collection settings.
    pub thumbnails: ThumbnailsConfig,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            plugin_name: "31edo_tuner".to_string(),
            source: PathBuf::from("../source"),
            files: vec![PathBuf::from("../LICENSE")],
            logs_folder: "logs".to_string(),
            thumbnails: ThumbnailsConfig::default(),
        }
    }
}

/// Where thumbnails come from and where they land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub source: PathBuf,
    /// Glob matched against file names in `source` (not recursive).
    pub pattern: String,
    /// Folder inside the staging folder.
    pub folder: String,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("../thumbnails"),
            pattern: "*.png".to_string(),
            folder: "thumbnails".to_string(),
        }
    }
}

impl PackConfig {
    /// Validate names and patterns before any file is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_folder_name("plugin_name", &self.plugin_name)?;
        check_folder_name("logs_folder", &self.logs_folder)?;
        check_folder_name("thumbnails.folder", &self.thumbnails.folder)?;
        if let Err(e) = globset::Glob::new(&self.thumbnails.pattern) {
            return Err(ConfigError::Validation(format!(
                "thumbnails.pattern is not a valid glob: {e}"
            )));
        }
        for file in &self.files {
            if file.file_name().is_none() {
                return Err(ConfigError::Validation(format!(
                    "files entry has no file name: {}",
                    file.display()
                )));
            }
        }
        Ok(())
    }

    /// The staging folder, resolved against the working directory.
    pub fn staging_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.plugin_name)
    }
}

/// Folder names must be a single normal path component.
fn check_folder_name(key: &str, name: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{key} must be a single folder name, got {name:?}"
        ))),
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PackConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value
/// entirely (so `files = [...]` replaces the default list rather than
/// appending to it).
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<PackConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PackConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config for a working directory.
///
/// An explicit path must exist. Without one, `<root>/pack.toml` is used when
/// present and the stock defaults otherwise.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<PackConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => Some(load_raw_config(path)?),
        None => {
            let path = root.join(CONFIG_FILENAME);
            if path.exists() {
                Some(load_raw_config(&path)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `pack.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r#"# plugin-pack configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Relative paths resolve against the working directory (--dir).
# Unknown keys will cause an error.

# Name of the staging folder. It is also the root folder inside the archive,
# the archive prefix (<plugin_name>_<version>.zip), and the filter used to
# pick version-bearing files: underscores are dropped and case is ignored, so
# "31edo_tuner" matches "31EDO_Tuner.qml" and "31EdoTuner.qml".
plugin_name = "31edo_tuner"

# Source tree merged into the staging folder. Staged files that no longer
# exist in the source are left in place.
source = "../source"

# Extra files copied into the staging root (only the file name is kept).
files = ["../LICENSE"]

# Empty folder created inside the staging folder.
logs_folder = "logs"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Folder scanned (non-recursively) for thumbnail images. A missing folder
# simply contributes no thumbnails.
source = "../thumbnails"

# Glob matched against file names.
pattern = "*.png"

# Destination folder inside the staging folder.
folder = "thumbnails"
"#
}

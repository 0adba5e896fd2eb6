//! Name handling shared by the version scan and the archive step.
//!
//! ## Normalization
//!
//! Plugin names and source file names are compared after dropping
//! underscores and lowercasing, so the `31edo_tuner` plugin matches any of:
//! - `31edo_tuner.qml`
//! - `31EDO_Tuner.qml`
//! - `31EdoTuner_v2.qml`
//!
//! ## Archive Names
//!
//! Archives are named `<plugin_name>_<version>.zip`. The version suffix keeps
//! the archive from colliding with the staging folder of the same name.

/// Drop underscores and lowercase.
pub fn normalize_name(name: &str) -> String {
    name.replace('_', "").to_lowercase()
}

/// Whether `file_name` belongs to the plugin, by normalized substring match.
pub fn matches_plugin(plugin_name: &str, file_name: &str) -> bool {
    normalize_name(file_name).contains(&normalize_name(plugin_name))
}

/// Archive stem: `31edo_tuner` + `1.2.3` → `31edo_tuner_1.2.3`.
pub fn archive_stem(plugin_name: &str, version: &str) -> String {
    format!("{plugin_name}_{version}")
}

/// Archive file name: `31edo_tuner` + `1.2.3` → `31edo_tuner_1.2.3.zip`.
pub fn archive_file_name(plugin_name: &str, version: &str) -> String {
    format!("{}.zip", archive_stem(plugin_name, version))
}

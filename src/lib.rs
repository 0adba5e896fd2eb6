//! # plugin-pack
//!
//! Packages a MuseScore plugin folder into a versioned zip archive ready to
//! attach to a release.
//!
//! # Pipeline
//!
//! ```text
//! 1. Stage     ../source, ../LICENSE, ../thumbnails/*.png  →  31edo_tuner/
//! 2. Version   ../source/**/<plugin file>                  →  "1.2.3"
//! 3. Archive   31edo_tuner/                                →  31edo_tuner_1.2.3.zip
//! ```
//!
//! Each step is idempotent: the staging folder is merged into on every run
//! rather than rebuilt, so re-running after editing the sources refreshes the
//! changed files and leaves anything else in place.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`package`] | The `package` operation — runs the steps in order and reports progress |
//! | [`stage`] | Step 1 — merges the source tree, auxiliary files and thumbnails into the staging folder |
//! | [`version`] | Step 2 — finds the `version: "<value>";` marker in the plugin's own source files |
//! | [`archive`] | Step 3 — zips the staging folder under its own name, with temp-dir cleanup and a SHA-256 |
//! | [`config`] | `pack.toml` loading over compiled-in defaults, validation, stock config text |
//! | [`naming`] | Name normalization for the version scan and archive naming |
//! | [`output`] | CLI output formatting |
//!
//! # The Version Marker
//!
//! The version is not kept in a separate file. The plugin declares it in its
//! QML source, and the archive name is derived from that line, so the
//! published archive can never disagree with what the plugin reports about
//! itself once installed.

pub mod archive;
pub mod config;
pub mod naming;
pub mod output;
pub mod package;
pub mod stage;
pub mod version;

#[cfg(test)]
pub(crate) mod test_helpers;

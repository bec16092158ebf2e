// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Hearth quest engine.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, and diagnostic error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use hearth_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::{Path, PathBuf};

pub use diagnostic::{ConfigError, ConfigSource, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{BountySelection, HearthConfig};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Unknown-key diagnostics point into whichever of the hierarchy's files
/// exist on disk.
pub fn load_and_validate() -> Result<HearthConfig, Vec<ConfigError>> {
    checked(loader::load_config(), || {
        hierarchy_paths()
            .iter()
            .filter_map(|path| ConfigSource::read(path))
            .collect()
    })
}

/// Load configuration from an explicit file path (plus env) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<HearthConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || {
        ConfigSource::read(path).into_iter().collect()
    })
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<HearthConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![ConfigSource::inline(toml_content)]
    })
}

/// Run semantic validation on a loaded config, or convert the figment
/// failure using the sources produced by `sources`.
fn checked(
    loaded: Result<HearthConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<ConfigSource>,
) -> Result<HearthConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// The files [`loader::build_figment`] merges, most specific first.
fn hierarchy_paths() -> Vec<PathBuf> {
    let local = std::env::current_dir()
        .map(|dir| dir.join("hearth.toml"))
        .unwrap_or_else(|_| PathBuf::from("hearth.toml"));
    let user = dirs::config_dir().map(|dir| dir.join("hearth/hearth.toml"));
    std::iter::once(local)
        .chain(user)
        .chain(std::iter::once(PathBuf::from("/etc/hearth/hearth.toml")))
        .collect()
}

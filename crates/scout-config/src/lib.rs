// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Scout lead-capture service.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, environment variable overrides, and Elm-style diagnostic
//! error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use scout_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Listening on {}:{}", config.server.host, config.server.port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, TomlSource, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::ScoutConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Parse failures become miette diagnostics pointing into the offending file;
/// a parsed config then goes through [`validation::validate_config`].
pub fn load_and_validate() -> Result<ScoutConfig, Vec<ConfigError>> {
    let config = loader::load_config()
        .map_err(|err| diagnostic::figment_to_config_errors(err, &read_sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<ScoutConfig, Vec<ConfigError>> {
    let config = loader::load_config_from_str(toml_content).map_err(|err| {
        diagnostic::figment_to_config_errors(err, &[TomlSource::new("<inline>", toml_content)])
    })?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Reads whichever config files exist so diagnostics can quote them.
///
/// Names are absolute to match the paths figment records for each file.
fn read_sources() -> Vec<TomlSource> {
    loader::config_paths()
        .into_iter()
        .filter_map(|path| {
            let content = std::fs::read_to_string(&path).ok()?;
            let name = std::path::absolute(&path).unwrap_or(path);
            Some(TomlSource::new(name.display().to_string(), content))
        })
        .collect()
}

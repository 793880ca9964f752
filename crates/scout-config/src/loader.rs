// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./scout.toml` > `~/.config/scout/scout.toml` > `/etc/scout/scout.toml`
//! with environment variable overrides via `SCOUT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ScoutConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/scout/scout.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/scout/scout.toml` (system-wide)
/// 3. `~/.config/scout/scout.toml` (user XDG config)
/// 4. `./scout.toml` (local directory)
/// 5. `SCOUT_*` environment variables
///
/// When no API key is configured, `ANTHROPIC_API_KEY` is used.
pub fn load_config() -> Result<ScoutConfig, figment::Error> {
    build_figment().extract().map(with_api_key_fallback)
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ScoutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScoutConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ScoutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScoutConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
        .map(with_api_key_fallback)
}

/// Config files in merge order, lowest precedence first. Missing files are skipped.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("scout").join("scout.toml"));
    }
    paths.push(PathBuf::from("scout.toml"));
    paths
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(ScoutConfig::default()));
    for path in config_paths() {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

fn with_api_key_fallback(mut config: ScoutConfig) -> ScoutConfig {
    if config.anthropic.api_key.is_none()
        && let Ok(key) = std::env::var("ANTHROPIC_API_KEY")
        && !key.trim().is_empty()
    {
        config.anthropic.api_key = Some(key);
    }
    config
}

/// Top-level config sections addressable from the environment.
const ENV_SECTIONS: &[&str] = &["server", "anthropic", "storage", "media", "chat", "widget"];

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SCOUT_MEDIA_MAX_UPLOAD_BYTES` must map to
/// `media.max_upload_bytes`, not `media.max.upload.bytes`. Only the leading
/// section name is split off, so `SCOUT_WIDGET_SERVER_URL` stays `widget.server_url`.
pub fn env_provider() -> Env {
    Env::prefixed("SCOUT_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        for section in ENV_SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.to_string().into()
    })
}

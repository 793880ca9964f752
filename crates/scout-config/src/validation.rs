// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express, such
//! as a parseable bind address, non-empty paths and sane numeric ranges.

use crate::diagnostic::ConfigError;
use crate::model::ScoutConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &ScoutConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let host = config.server.host.trim();
    if host.is_empty() {
        fail("server.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            fail(format!(
                "server.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if let Some(url) = &config.server.public_base_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        fail(format!(
            "server.public_base_url `{url}` must start with http:// or https://"
        ));
    }

    if config.anthropic.default_model.trim().is_empty() {
        fail("anthropic.default_model must not be empty".to_string());
    }

    if config.anthropic.max_tokens == 0 {
        fail("anthropic.max_tokens must be at least 1".to_string());
    }

    if !(0.0..=1.0).contains(&config.anthropic.temperature) {
        fail(format!(
            "anthropic.temperature must be between 0.0 and 1.0, got {}",
            config.anthropic.temperature
        ));
    }

    if config.anthropic.timeout_secs == 0 {
        fail("anthropic.timeout_secs must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.media.upload_dir.trim().is_empty() {
        fail("media.upload_dir must not be empty".to_string());
    }

    if config.media.max_upload_bytes == 0 {
        fail("media.max_upload_bytes must be at least 1".to_string());
    }

    let prefix = &config.media.url_prefix;
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.starts_with("/api") {
        fail(format!(
            "media.url_prefix `{prefix}` must be a path like `/media` outside `/api`"
        ));
    }

    if config.chat.max_steps == 0 {
        fail("chat.max_steps must be at least 1".to_string());
    }

    if !LOG_LEVELS.contains(&config.chat.log_level.as_str()) {
        fail(format!(
            "chat.log_level `{}` must be one of: {}",
            config.chat.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.widget.server_url.trim().is_empty() {
        fail("widget.server_url must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &ScoutConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ScoutConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = ScoutConfig::default();
        config.storage.database_path = "".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("database_path")));
    }

    #[test]
    fn zero_max_steps_fails_validation() {
        let mut config = ScoutConfig::default();
        config.chat.max_steps = 0;
        assert!(messages(&config).iter().any(|m| m.contains("max_steps")));
    }

    #[test]
    fn media_prefix_cannot_shadow_api_routes() {
        let mut config = ScoutConfig::default();
        config.media.url_prefix = "/api/files".to_string();
        assert!(messages(&config).iter().any(|m| m.contains("url_prefix")));
    }

    #[test]
    fn bad_log_level_and_temperature_are_both_reported() {
        let mut config = ScoutConfig::default();
        config.chat.log_level = "verbose".to_string();
        config.anthropic.temperature = 1.5;
        let errors = messages(&config);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn public_base_url_requires_scheme() {
        let mut config = ScoutConfig::default();
        config.server.public_base_url = Some("scout.example.com".to_string());
        assert!(messages(&config).iter().any(|m| m.contains("public_base_url")));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = ScoutConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.public_base_url = Some("https://leads.example.com".to_string());
        config.storage.database_path = "/tmp/scout.db".to_string();
        config.media.max_upload_bytes = 5 * 1024 * 1024;
        assert!(validate_config(&config).is_ok());
    }
}

// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Scout lead-capture service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Scout configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoutConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Lead and transcript database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Upload validation and blob storage settings.
    #[serde(default)]
    pub media: MediaConfig,

    /// Conversation orchestration settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Terminal widget client settings.
    #[serde(default)]
    pub widget: WidgetConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL used to build media links.
    /// `None` derives `http://{host}:{port}`.
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Origins allowed by CORS. Empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Base URL clients use to reach this server, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` falls back to `ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for chat turns and summaries.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Sampling temperature for chat and summary calls.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Retries on transient API errors. Zero disables retrying.
    #[serde(default)]
    pub max_retries: u32,

    /// Per-request transport timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            temperature: default_temperature(),
            max_retries: 0,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("scout").join("scout.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("scout.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Upload validation and local blob storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MediaConfig {
    /// Directory uploaded files are written to.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Largest accepted upload in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,

    /// Path prefix the upload directory is served under.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            url_prefix: default_url_prefix(),
        }
    }
}

fn default_upload_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("scout").join("media"))
        .unwrap_or_else(|| std::path::PathBuf::from("media"))
        .to_string_lossy()
        .into_owned()
}

fn default_max_upload_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_url_prefix() -> String {
    "/media".to_string()
}

/// Conversation orchestration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Ceiling on model rounds per user turn.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Assistant greeting that opens every transcript.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            greeting: default_greeting(),
            log_level: default_log_level(),
        }
    }
}

fn default_max_steps() -> usize {
    10
}

/// Opening line shown by the widget and seeded into new transcripts.
pub const DEFAULT_GREETING: &str = "Hi there! I'm Scout, your AI Pest Assessment Assistant. \
I help homeowners identify pest issues and recommend the best solutions - whether it's a \
quick DIY fix or something that needs a pro.";

fn default_greeting() -> String {
    DEFAULT_GREETING.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Terminal widget configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetConfig {
    /// Base URL of the Scout server the widget talks to.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// File holding the active session id and transcript cache.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Display name passed along with each turn.
    #[serde(default)]
    pub user_name: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            state_file: default_state_file(),
            user_name: None,
        }
    }
}

fn default_server_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_state_file() -> String {
    dirs::data_dir()
        .map(|p| p.join("scout").join("widget.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("scout-widget.json"))
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_to_bind_address() {
        let server = ServerConfig::default();
        assert_eq!(server.base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let server = ServerConfig {
            public_base_url: Some("https://scout.example.com/".into()),
            ..ServerConfig::default()
        };
        assert_eq!(server.base_url(), "https://scout.example.com");
    }

    #[test]
    fn upload_limit_defaults_to_twenty_mebibytes() {
        assert_eq!(MediaConfig::default().max_upload_bytes, 20_971_520);
    }

    #[test]
    fn greeting_introduces_scout() {
        assert!(ChatConfig::default().greeting.starts_with("Hi there! I'm Scout"));
    }
}

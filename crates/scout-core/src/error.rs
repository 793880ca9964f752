// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Scout lead-capture service.

use thiserror::Error;

/// The primary error type used across all Scout adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller-supplied input was rejected (missing session ID, oversized upload, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage backend errors (database connection, query failure, blob write).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Language model errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Uploaded media was rejected or could not be stored.
    #[error("media error: {message}")]
    Media { message: String },

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// HTTP transport errors seen by the widget client.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScoutError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ScoutError::Storage {
            source: Box::new(err),
        }
    }

    /// Returns true when the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScoutError::Validation(_) | ScoutError::Media { .. })
    }
}

// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the gateway endpoints the widget uses.

use std::time::Duration;

use reqwest::Url;
use scout_core::ScoutError;
use scout_core::types::{HistoryEntry, TranscriptTurn};
use serde::{Deserialize, Serialize};
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    messages: Vec<TranscriptTurn>,
}

/// Answer of `POST /api/upload`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

fn transport(message: String, source: reqwest::Error) -> ScoutError {
    ScoutError::Transport {
        message,
        source: Some(Box::new(source)),
    }
}

/// Thin typed wrapper over the gateway's JSON API.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScoutError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScoutError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turns a non-2xx answer into a transport error carrying the body's `error`.
    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response, ScoutError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(ScoutError::Transport {
            message: format!("{what} failed ({status}): {detail}"),
            source: None,
        })
    }

    pub async fn create_session(&self, session_id: &str) -> Result<(), ScoutError> {
        let response = self
            .http
            .post(self.url("/api/create-session"))
            .json(&serde_json::json!({ "sessionId": session_id }))
            .send()
            .await
            .map_err(|e| transport("create-session request failed".into(), e))?;
        Self::check(response, "create-session").await?;
        debug!(session_id, "session registered");
        Ok(())
    }

    /// Sends one turn and returns the assistant reply.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String, ScoutError> {
        let response = self
            .http
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await
            .map_err(|e| transport("chat request failed".into(), e))?;
        let response = Self::check(response, "chat").await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| transport("malformed chat response".into(), e))?;
        Ok(body.response)
    }

    /// Fetches the stored transcript for a session.
    pub async fn chat_history(&self, session_id: &str) -> Result<Vec<TranscriptTurn>, ScoutError> {
        let url = Url::parse_with_params(
            &self.url("/api/get-chat-history"),
            &[("sessionId", session_id)],
        )
        .map_err(|e| ScoutError::Config(format!("invalid server URL: {e}")))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| transport("chat history request failed".into(), e))?;
        let response = Self::check(response, "get-chat-history").await?;
        let body: HistoryResponse = response
            .json()
            .await
            .map_err(|e| transport("malformed chat history".into(), e))?;
        Ok(body.messages)
    }

    /// Uploads a file as the multipart `file` field.
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, ScoutError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| transport(format!("invalid content type {content_type}"), e))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport("upload request failed".into(), e))?;
        let response = Self::check(response, "upload").await?;
        response
            .json()
            .await
            .map_err(|e| transport("malformed upload response".into(), e))
    }
}

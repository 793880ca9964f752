// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted language model for deterministic orchestrator tests.
//!
//! `MockModel` pops pre-configured [`ModelResponse`]s from a FIFO queue and
//! records every request it receives. When the queue is empty it answers
//! with plain text `"mock response"`.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use scout_core::types::{
    AdapterType, HealthStatus, ModelRequest, ModelResponse, TokenUsage, ToolCall,
};
use scout_core::{LanguageModel, PluginAdapter, ScoutError};
use tokio::sync::Mutex;

enum Scripted {
    Respond(ModelResponse),
    Fail(String),
}

/// A mock language model with scripted responses.
#[derive(Clone)]
pub struct MockModel {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
    repeat: Arc<Mutex<Option<ModelResponse>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            repeat: Arc::new(Mutex::new(None)),
        }
    }

    /// A model that answers every request with the given text.
    pub fn with_text_responses(texts: &[&str]) -> Self {
        let script = texts
            .iter()
            .map(|t| Scripted::Respond(text_response(t)))
            .collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            ..Self::new()
        }
    }

    /// Queues a response.
    pub async fn push(&self, response: ModelResponse) {
        self.script.lock().await.push_back(Scripted::Respond(response));
    }

    pub async fn push_text(&self, text: &str) {
        self.push(text_response(text)).await;
    }

    /// Queues a round that calls one tool with the given JSON input.
    pub async fn push_tool_call(&self, name: &str, input: serde_json::Value) {
        self.push(tool_response("", vec![(name, input)])).await;
    }

    /// Queues a provider failure.
    pub async fn push_failure(&self, message: &str) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Fail(message.to_string()));
    }

    /// Answers every request after the script runs out with this response.
    pub async fn repeat_forever(&self, response: ModelResponse) {
        *self.repeat.lock().await = Some(response);
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

/// A response carrying only text.
pub fn text_response(text: &str) -> ModelResponse {
    ModelResponse {
        text: text.to_string(),
        tool_calls: Vec::new(),
        stop_reason: Some("end_turn".to_string()),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        },
    }
}

/// A response with optional text and one or more tool calls.
pub fn tool_response(text: &str, calls: Vec<(&str, serde_json::Value)>) -> ModelResponse {
    let tool_calls = calls
        .into_iter()
        .enumerate()
        .map(|(i, (name, input))| ToolCall {
            id: format!("toolu_mock_{i}"),
            name: name.to_string(),
            input,
        })
        .collect();
    ModelResponse {
        text: text.to_string(),
        tool_calls,
        stop_reason: Some("tool_use".to_string()),
        usage: TokenUsage {
            input_tokens: 10,
            output_tokens: 20,
        },
    }
}

#[async_trait]
impl PluginAdapter for MockModel {
    fn name(&self) -> &str {
        "mock-model"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, ScoutError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl LanguageModel for MockModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ScoutError> {
        self.requests.lock().await.push(request);
        let next = self.script.lock().await.pop_front();
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail(message)) => Err(ScoutError::Provider {
                message,
                source: None,
            }),
            None => match self.repeat.lock().await.clone() {
                Some(response) => Ok(response),
                None => Ok(text_response("mock response")),
            },
        }
    }
}

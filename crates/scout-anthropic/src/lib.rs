// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude adapter for the Scout lead-capture service.
//!
//! Implements [`LanguageModel`] over the Anthropic Messages API with tool use.
//! Images are passed by URL so the API fetches them itself.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use scout_config::model::AnthropicConfig;
use scout_core::types::{
    AdapterType, HealthStatus, ModelRequest, ModelResponse, TokenUsage, ToolCall,
};
use scout_core::{LanguageModel, PluginAdapter, ScoutError};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest, ResponseBlock};

/// Anthropic Claude model implementing [`LanguageModel`].
///
/// API key resolution order: config, then `ANTHROPIC_API_KEY`, then error.
pub struct AnthropicModel {
    client: AnthropicClient,
    max_tokens: u32,
}

impl AnthropicModel {
    /// Creates a new model adapter from the `[anthropic]` config section.
    pub fn new(config: &AnthropicConfig) -> Result<Self, ScoutError> {
        let api_key = resolve_api_key(&config.api_key)?;
        let client = AnthropicClient::new(
            api_key,
            config.api_version.clone(),
            config.default_model.clone(),
            Duration::from_secs(config.timeout_secs),
        )?
        .with_max_retries(config.max_retries);

        info!(model = config.default_model, "Anthropic model initialized");

        Ok(Self::with_client(client, config.max_tokens))
    }

    /// Creates a model adapter around an existing client.
    pub fn with_client(client: AnthropicClient, max_tokens: u32) -> Self {
        Self { client, max_tokens }
    }

    fn to_message_request(&self, request: ModelRequest) -> MessageRequest {
        MessageRequest {
            model: self.client.default_model().to_string(),
            messages: request.messages.iter().map(ApiMessage::from).collect(),
            system: request.system,
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
            temperature: request.temperature,
            tools: request.tools.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicModel {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, ScoutError> {
        // Avoid spending tokens: a constructed client is considered healthy.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl LanguageModel for AnthropicModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ScoutError> {
        let api_request = self.to_message_request(request);
        let response = self.client.complete_message(&api_request).await?;

        let mut text = Vec::new();
        let mut tool_calls = Vec::new();
        for block in response.content {
            match block {
                ResponseBlock::Text { text: t } => text.push(t),
                ResponseBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolCall { id, name, input })
                }
                ResponseBlock::Other => {}
            }
        }

        debug!(
            stop_reason = response.stop_reason.as_deref().unwrap_or("none"),
            tool_calls = tool_calls.len(),
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model round complete"
        );

        Ok(ModelResponse {
            text: text.join(""),
            tool_calls,
            stop_reason: response.stop_reason,
            usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        })
    }
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: &Option<String>) -> Result<String, ScoutError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }

    std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        ScoutError::Config(
            "Anthropic API key not found. Set anthropic.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::types::{ModelMessage, ToolSpec};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_for(server: &MockServer) -> AnthropicModel {
        let client = AnthropicClient::new(
            "k".into(),
            "2023-06-01".into(),
            "claude-sonnet-4-20250514".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(server.uri());
        AnthropicModel::with_client(client, 1024)
    }

    #[tokio::test]
    async fn generate_collects_text_and_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 1024,
                "tools": [{"name": "updateLead"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "msg_1",
                "type": "message",
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Thanks Dana! "},
                    {"type": "tool_use", "id": "toolu_1", "name": "updateLead",
                     "input": {"name": "Dana", "city": "Sacramento"}}
                ],
                "model": "claude-sonnet-4-20250514",
                "stop_reason": "tool_use",
                "usage": {"input_tokens": 40, "output_tokens": 20}
            })))
            .mount(&server)
            .await;

        let model = model_for(&server);
        let response = model
            .generate(ModelRequest {
                system: Some("You are Scout.".into()),
                messages: vec![ModelMessage::user_text("I'm Dana in Sacramento")],
                tools: vec![ToolSpec {
                    name: "updateLead".into(),
                    description: "save".into(),
                    input_schema: serde_json::json!({"type": "object"}),
                }],
                temperature: Some(0.7),
                max_tokens: None,
            })
            .await
            .unwrap();

        assert_eq!(response.text, "Thanks Dana! ");
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].input["city"], "Sacramento");
        assert_eq!(response.stop_reason.as_deref(), Some("tool_use"));
        assert_eq!(response.usage.output_tokens, 20);
    }

    #[tokio::test]
    async fn generate_surfaces_provider_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let model = model_for(&server);
        let err = model
            .generate(ModelRequest {
                messages: vec![ModelMessage::user_text("hi")],
                ..ModelRequest::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::Provider { .. }));
    }

    #[test]
    fn adapter_identity() {
        let client = AnthropicClient::new(
            "k".into(),
            "2023-06-01".into(),
            "m".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        let model = AnthropicModel::with_client(client, 10);
        assert_eq!(model.name(), "anthropic");
        assert_eq!(model.adapter_type(), AdapterType::Model);
    }
}

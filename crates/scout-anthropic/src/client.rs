// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! One POST per completion. Overload and rate-limit answers can be retried
//! with a doubling delay; everything else fails immediately.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use scout_core::ScoutError;
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";

/// First retry delay; each further retry doubles it.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

fn provider_error(
    message: impl Into<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
) -> ScoutError {
    ScoutError::Provider {
        message: message.into(),
        source,
    }
}

/// Outcome of a single HTTP attempt.
enum Attempt {
    Done(MessageResponse),
    Transient(ScoutError),
    Failed(ScoutError),
}

/// Authenticated client for the Messages endpoint.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    endpoint: String,
    default_model: String,
    max_retries: u32,
}

impl AnthropicClient {
    /// Builds a client that sends `api_key` and `api_version` on every request.
    ///
    /// Malformed header values are configuration errors.
    pub fn new(
        api_key: String,
        api_version: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ScoutError> {
        let header = |name: &'static str, value: &str| {
            HeaderValue::from_str(value)
                .map(|v| (HeaderName::from_static(name), v))
                .map_err(|e| ScoutError::Config(format!("invalid {name} header value: {e}")))
        };
        let headers: HeaderMap = [
            header("x-api-key", &api_key)?,
            header("anthropic-version", &api_version)?,
            header("content-type", "application/json")?,
        ]
        .into_iter()
        .collect();

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                provider_error(format!("failed to build HTTP client: {e}"), Some(Box::new(e)))
            })?;

        Ok(Self {
            http,
            endpoint: MESSAGES_URL.to_string(),
            default_model: model,
            max_retries: 0,
        })
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Retries overload and rate-limit answers up to `max_retries` times.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Points the client at another endpoint, e.g. a mock server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Sends a completion request and returns the full response.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ScoutError> {
        let mut attempt = 0;
        loop {
            match self.attempt(request).await? {
                Attempt::Done(response) => return Ok(response),
                Attempt::Transient(err) if attempt < self.max_retries => {
                    let delay = RETRY_BASE_DELAY.saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(attempt, ?delay, error = %err, "retrying completion request");
                    tokio::time::sleep(delay).await;
                }
                Attempt::Transient(err) | Attempt::Failed(err) => return Err(err),
            }
        }
    }

    async fn attempt(&self, request: &MessageRequest) -> Result<Attempt, ScoutError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| provider_error(format!("HTTP request failed: {e}"), Some(Box::new(e))))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            provider_error(format!("failed to read response body: {e}"), Some(Box::new(e)))
        })?;
        debug!(status = %status, bytes = body.len(), "completion response received");

        if status.is_success() {
            return serde_json::from_str(&body).map(Attempt::Done).map_err(|e| {
                provider_error(format!("failed to parse API response: {e}"), Some(Box::new(e)))
            });
        }

        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api) => format!("Anthropic API error ({}): {}", api.error.kind, api.error.message),
            Err(_) => format!("API returned {status}: {body}"),
        };
        let err = provider_error(message, None);
        Ok(if is_retryable(status) {
            Attempt::Transient(err)
        } else {
            Attempt::Failed(err)
        })
    }
}

/// Rate limits, server errors, and overload (529) are worth another try.
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::INTERNAL_SERVER_ERROR
        || status == StatusCode::SERVICE_UNAVAILABLE
        || status.as_u16() == 529
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use scout_core::types::ModelMessage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> AnthropicClient {
        AnthropicClient::new(
            "test-api-key".into(),
            "2023-06-01".into(),
            "claude-sonnet-4-20250514".into(),
            Duration::from_secs(5),
        )
        .unwrap()
        .with_base_url(base_url)
    }

    fn test_request() -> MessageRequest {
        MessageRequest {
            model: "claude-sonnet-4-20250514".into(),
            messages: vec![ApiMessage::from(&ModelMessage::user_text("I have ants"))],
            system: Some("You are Scout.".into()),
            max_tokens: 1024,
            temperature: Some(0.7),
            tools: Vec::new(),
        }
    }

    fn text_response(id: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        })
    }

    #[tokio::test]
    async fn complete_message_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_partial_json(serde_json::json!({
                "system": "You are Scout.",
                "temperature": 0.7
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(text_response("msg_test", "Hi there!")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete_message(&test_request()).await.unwrap();

        assert_eq!(result.id, "msg_test");
        assert_eq!(result.usage.input_tokens, 10);
        assert_eq!(result.content.len(), 1);
    }

    #[tokio::test]
    async fn transient_error_is_not_retried_by_default() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"type": "overloaded_error", "message": "Service overloaded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete_message(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("overloaded_error"), "got: {err}");
    }

    #[tokio::test]
    async fn retries_on_429_when_enabled() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"type": "rate_limit_error", "message": "Rate limited"}
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(text_response("msg_retry", "After retry")),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri()).with_max_retries(1);
        let result = client.complete_message(&test_request()).await.unwrap();
        assert_eq!(result.id, "msg_retry");
    }

    #[tokio::test]
    async fn complete_message_fails_on_400() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"type": "invalid_request_error", "message": "Bad model"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete_message(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("invalid_request_error"), "got: {err}");
    }

    #[tokio::test]
    async fn client_sends_correct_headers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("msg_h", "ok")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.complete_message(&test_request()).await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::from_u16(529).unwrap()));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn invalid_api_key_is_config_error() {
        let result = AnthropicClient::new(
            "bad\nkey".into(),
            "2023-06-01".into(),
            "m".into(),
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(ScoutError::Config(_))));
    }
}

// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the `/api` surface and `/health`.
//!
//! All bodies use camelCase keys. Malformed JSON is answered with a 400
//! `{error}` body rather than axum's plain-text rejection.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scout_agent::ChatTurn;
use scout_core::types::{HistoryEntry, LeadUpdate, TranscriptTurn, TurnContent, TurnRole};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::server::AppState;

/// Reply shown to the visitor when a chat turn fails.
pub const APOLOGY_REPLY: &str =
    "I apologize, but I'm having trouble responding right now. Please try again!";

/// Summary stored by the finalize endpoint when the caller sends none.
const DEFAULT_FINAL_SUMMARY: &str = "Assessment completed";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// `{success: false, error}` body used by the save endpoints.
fn failure_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "error": message }))).into_response()
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// --- Sessions ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// POST /api/create-session
///
/// Creates an open lead for the session. Repeat calls are harmless.
pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let Some(session_id) = present(body.session_id) else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID required");
    };

    match state.leads.create_lead(&session_id).await {
        Ok(_) => {
            info!(session_id = %session_id, "session created");
            Json(json!({ "success": true, "sessionId": session_id })).into_response()
        }
        Err(e) => {
            error!(session_id = %session_id, error = %e, "failed to create session");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
        }
    }
}

// --- Chat ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Value>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub image_reference: Option<String>,
}

/// Parses history leniently. Entries that are not `{sender, content}` objects are skipped.
fn parse_history(history: Option<Value>) -> Vec<HistoryEntry> {
    match history {
        Some(Value::Array(entries)) => entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid message");
    };
    let Some(message) = body.message.filter(|m| !m.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid message");
    };

    let turn = ChatTurn {
        message,
        history: parse_history(body.history),
        session_id: present(body.session_id),
        image_reference: present(body.image_reference),
        user_name: present(body.user_name),
    };

    match state.orchestrator.respond(turn).await {
        // The transcript task keeps running after its handle is dropped.
        Ok(outcome) => Json(json!({
            "response": outcome.reply,
            "shouldSaveToSheets": false,
        }))
        .into_response(),
        Err(e) if e.is_client_error() => error_response(StatusCode::BAD_REQUEST, "Invalid message"),
        Err(e) => {
            error!(error = %e, "chat turn failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to process message",
                    "response": APOLOGY_REPLY,
                })),
            )
                .into_response()
        }
    }
}

// --- Leads ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub fields: LeadUpdate,
}

/// POST /api/update-lead
///
/// Merges the provided fields into the lead, creating it if needed.
pub async fn update_lead(
    State(state): State<AppState>,
    body: Result<Json<UpdateLeadRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let Some(session_id) = present(body.session_id) else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let fields = body.fields.normalized();

    match state.leads.update_lead(&session_id, &fields).await {
        Ok(lead) => {
            info!(session_id = %session_id, fields = ?fields.field_names(), "lead updated");
            Json(json!({
                "success": true,
                "message": "Lead updated successfully",
                "data": [lead],
            }))
            .into_response()
        }
        Err(e) => {
            error!(session_id = %session_id, error = %e, "failed to update lead");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update lead")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeLeadRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub final_note: Option<String>,
}

/// POST /api/finalize-lead
///
/// Completes the lead unconditionally. Unknown sessions yield an empty `data` array.
pub async fn finalize_lead(
    State(state): State<AppState>,
    body: Result<Json<FinalizeLeadRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let Some(session_id) = present(body.session_id) else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let summary = present(body.summary).unwrap_or_else(|| DEFAULT_FINAL_SUMMARY.to_string());
    let note = present(body.final_note);

    match state
        .leads
        .finalize_lead(&session_id, &summary, note.as_deref())
        .await
    {
        Ok(lead) => {
            if lead.is_none() {
                warn!(session_id = %session_id, "finalize requested for unknown session");
            }
            Json(json!({
                "success": true,
                "message": "Lead finalized successfully",
                "data": lead.into_iter().collect::<Vec<_>>(),
            }))
            .into_response()
        }
        Err(e) => {
            error!(session_id = %session_id, error = %e, "failed to finalize lead");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to finalize lead")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLeadRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub fields: LeadUpdate,
}

/// POST /api/save-lead
///
/// Merges lead fields and, when given, the summary. Blank values never clear a field.
pub async fn save_lead(
    State(state): State<AppState>,
    body: Result<Json<SaveLeadRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return failure_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let Some(session_id) = present(body.session_id) else {
        return failure_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let fields = body.fields.normalized();
    let summary = present(body.summary);

    let result = async {
        state.leads.update_lead(&session_id, &fields).await?;
        if let Some(summary) = &summary {
            state.leads.save_summary(&session_id, &summary).await?;
        }
        Ok::<_, scout_core::ScoutError>(())
    }
    .await;

    match result {
        Ok(()) => Json(json!({ "success": true, "message": "Lead saved successfully" }))
            .into_response(),
        Err(e) => {
            error!(session_id = %session_id, error = %e, "failed to save lead");
            failure_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save lead")
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummaryRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// POST /api/save-session-summary
pub async fn save_session_summary(
    State(state): State<AppState>,
    body: Result<Json<SaveSummaryRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID and summary required");
    };
    let (Some(session_id), Some(summary)) = (present(body.session_id), present(body.summary))
    else {
        return error_response(StatusCode::BAD_REQUEST, "Session ID and summary required");
    };

    match state.leads.save_summary(&session_id, &summary).await {
        Ok(lead) => {
            if lead.is_none() {
                debug!(session_id = %session_id, "summary for unknown session ignored");
            }
            Json(json!({ "success": true })).into_response()
        }
        Err(e) => {
            error!(session_id = %session_id, error = %e, "failed to save summary");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save summary")
        }
    }
}

/// POST /api/save-assessment
///
/// Retired endpoint kept so old widgets get a clear answer.
pub async fn save_assessment() -> Response {
    failure_response(
        StatusCode::GONE,
        "This endpoint is deprecated. Use /api/save-lead instead.",
    )
}

// --- Transcripts ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<TranscriptTurn>,
}

/// GET /api/get-chat-history?sessionId=
///
/// Unknown sessions and storage failures both yield an empty list.
pub async fn get_chat_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let Some(session_id) = present(query.session_id) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing sessionId");
    };

    let messages = match state.transcripts.transcript(&session_id).await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(session_id = %session_id, error = %e, "failed to load chat history");
            Vec::new()
        }
    };
    Json(HistoryResponse { messages }).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveChatMessageRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_message: Option<Value>,
    #[serde(default)]
    pub bot_response: Option<String>,
}

/// Reads a user message sent as a string, a `{text, imageUrl}` object, or a
/// list of `{type: "text" | "image"}` parts.
fn parse_user_message(value: Value) -> Option<TurnContent> {
    match value {
        Value::String(text) => Some(TurnContent::Text(text)),
        Value::Array(parts) => {
            let mut texts = Vec::new();
            let mut image = None;
            for part in &parts {
                match part["type"].as_str() {
                    Some("text") => {
                        if let Some(text) = part["text"].as_str() {
                            texts.push(text.to_string());
                        }
                    }
                    Some("image") if image.is_none() => {
                        image = part["image"].as_str().map(str::to_string);
                    }
                    _ => {}
                }
            }
            Some(TurnContent::new(texts.join(" "), image))
        }
        other @ Value::Object(_) => serde_json::from_value(other).ok(),
        _ => None,
    }
}

/// POST /api/save-chat-message
///
/// Appends one user turn and one reply, seeding a new transcript with the greeting.
pub async fn save_chat_message(
    State(state): State<AppState>,
    body: Result<Json<SaveChatMessageRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        return failure_response(StatusCode::BAD_REQUEST, "Invalid request body");
    };
    let Some(session_id) = present(body.session_id) else {
        return failure_response(StatusCode::BAD_REQUEST, "Session ID required");
    };
    let (Some(user_content), Some(bot_response)) = (
        body.user_message.and_then(parse_user_message),
        body.bot_response,
    ) else {
        return failure_response(
            StatusCode::BAD_REQUEST,
            "userMessage and botResponse required",
        );
    };

    let turns = [
        TranscriptTurn::new(TurnRole::User, user_content),
        TranscriptTurn::new(TurnRole::Assistant, bot_response),
    ];
    let opening = TranscriptTurn::new(TurnRole::Assistant, state.orchestrator.greeting());

    match state
        .transcripts
        .append_turns(&session_id, &turns, Some(&opening))
        .await
    {
        Ok(()) => Json(json!({
            "success": true,
            "message": "Chat message saved successfully",
        }))
        .into_response(),
        Err(e) => {
            error!(session_id = %session_id, error = %e, "failed to save chat history");
            failure_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save chat history",
            )
        }
    }
}

// --- Health ---

/// Response body for GET /health.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub components: serde_json::Map<String, Value>,
}

/// GET /health
///
/// Reports the worst component status as the overall status.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut components = serde_json::Map::new();
    let mut overall = "healthy";
    for adapter in &state.health.components {
        let label = match adapter.health_check().await {
            Ok(status) => status.label(),
            Err(e) => {
                warn!(adapter = adapter.name(), error = %e, "health check failed");
                "unhealthy"
            }
        };
        overall = match (overall, label) {
            (_, "unhealthy") | ("unhealthy", _) => "unhealthy",
            (_, "degraded") | ("degraded", _) => "degraded",
            _ => "healthy",
        };
        components.insert(adapter.name().to_string(), Value::String(label.to_string()));
    }

    Json(HealthResponse {
        status: overall.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_parsing_skips_malformed_entries() {
        let history = json!([
            { "sender": "bot", "content": "Hi there!" },
            { "content": "no sender" },
            42,
            { "sender": "user", "content": { "text": "look", "imageUrl": "https://x/a.png" } },
        ]);
        let entries = parse_history(Some(history));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].content.image_reference(), Some("https://x/a.png"));
        assert!(parse_history(Some(json!("not a list"))).is_empty());
        assert!(parse_history(None).is_empty());
    }

    #[test]
    fn user_message_accepts_part_lists() {
        let content = parse_user_message(json!([
            { "type": "image", "image": "https://x/wasp.jpg" },
            { "type": "text", "text": "what is this?" },
        ]))
        .unwrap();
        assert_eq!(content.text(), "what is this?");
        assert_eq!(content.image_reference(), Some("https://x/wasp.jpg"));
    }

    #[test]
    fn user_message_accepts_plain_text() {
        assert_eq!(
            parse_user_message(json!("ants again")),
            Some(TurnContent::Text("ants again".into()))
        );
        assert_eq!(parse_user_message(json!(7)), None);
    }
}

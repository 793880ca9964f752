// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the Scout service.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for one visitor conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

impl HealthStatus {
    /// Short label used in health responses.
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded(_) => "degraded",
            HealthStatus::Unhealthy(_) => "unhealthy",
        }
    }
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Model,
    Storage,
    Blob,
}

// --- Leads ---

/// Lifecycle of a lead. Transitions `Open -> Completed` only.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    Open,
    Completed,
}

/// One prospective customer record, keyed by session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRecord {
    pub session_id: String,
    pub name: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub preferred_contact_time: Option<String>,
    pub summary: Option<String>,
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
}

impl LeadRecord {
    /// A fresh open lead with no captured fields.
    pub fn new(session_id: impl Into<String>, now: impl Into<String>) -> Self {
        let now = now.into();
        Self {
            session_id: session_id.into(),
            name: None,
            city: None,
            phone: None,
            email: None,
            preferred_contact_time: None,
            summary: None,
            notes: None,
            status: LeadStatus::Open,
            created_at: now.clone(),
            updated_at: now,
            completed_at: None,
        }
    }

    pub fn has_contact_method(&self) -> bool {
        is_present(&self.phone) || is_present(&self.email)
    }

    /// Name, city, and at least one contact method are all captured.
    pub fn is_ready_for_finalization(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Minimum fields still missing before the lead may be completed.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !is_present(&self.name) {
            missing.push("name");
        }
        if !is_present(&self.city) {
            missing.push("city");
        }
        if !self.has_contact_method() {
            missing.push("phone or email");
        }
        missing
    }

    pub fn is_completed(&self) -> bool {
        self.status == LeadStatus::Completed
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// A partial set of lead fields. Absent or blank fields leave the record untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, alias = "preferredContactTime")]
    pub preferred_time: Option<String>,
}

impl LeadUpdate {
    /// Trims every field and drops the ones left empty.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }
        Self {
            name: clean(self.name),
            phone: clean(self.phone),
            email: clean(self.email),
            city: clean(self.city),
            preferred_time: clean(self.preferred_time),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.city.is_none()
            && self.preferred_time.is_none()
    }

    /// Names of the fields this update carries, for logging.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.name.is_some() {
            names.push("name");
        }
        if self.phone.is_some() {
            names.push("phone");
        }
        if self.email.is_some() {
            names.push("email");
        }
        if self.city.is_some() {
            names.push("city");
        }
        if self.preferred_time.is_some() {
            names.push("preferredTime");
        }
        names
    }
}

// --- Transcripts ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

/// Text with an attached image or video reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichContent {
    pub text: String,
    #[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

/// The content of a turn: plain text, or text plus an image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnContent {
    Text(String),
    Rich(RichContent),
}

impl TurnContent {
    /// Builds plain text content, or rich content when an image is attached.
    pub fn new(text: impl Into<String>, image_reference: Option<String>) -> Self {
        let text = text.into();
        match image_reference {
            Some(image_reference) => TurnContent::Rich(RichContent {
                text,
                image_reference: Some(image_reference),
            }),
            None => TurnContent::Text(text),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TurnContent::Text(text) => text,
            TurnContent::Rich(rich) => &rich.text,
        }
    }

    pub fn image_reference(&self) -> Option<&str> {
        match self {
            TurnContent::Text(_) => None,
            TurnContent::Rich(rich) => rich.image_reference.as_deref(),
        }
    }
}

impl From<&str> for TurnContent {
    fn from(text: &str) -> Self {
        TurnContent::Text(text.to_string())
    }
}

impl From<String> for TurnContent {
    fn from(text: String) -> Self {
        TurnContent::Text(text)
    }
}

/// One persisted transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptTurn {
    pub role: TurnRole,
    pub content: TurnContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl TranscriptTurn {
    pub fn new(role: TurnRole, content: impl Into<TurnContent>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Who sent a prior turn, as reported by the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    #[serde(other)]
    Unknown,
}

/// A prior conversation turn sent along with a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub sender: Sender,
    pub content: TurnContent,
}

impl HistoryEntry {
    /// Maps the client sender onto a transcript role; unknown senders map to `None`.
    pub fn role(&self) -> Option<TurnRole> {
        match self.sender {
            Sender::User => Some(TurnRole::User),
            Sender::Bot => Some(TurnRole::Assistant),
            Sender::Unknown => None,
        }
    }
}

// --- Language model ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelRole {
    User,
    Assistant,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// A single part of a model message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Publicly reachable image URL.
    Image { url: String },
    ToolCall(ToolCall),
    ToolResult {
        call_id: String,
        content: String,
        is_error: bool,
    },
}

/// One message of model context.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMessage {
    pub role: ModelRole,
    pub parts: Vec<ContentPart>,
}

impl ModelMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ModelRole::User,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self {
            role: ModelRole::Assistant,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    /// Concatenated text parts, ignoring images and tool blocks.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A tool advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// A single generation request.
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub system: Option<String>,
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ToolSpec>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Token usage statistics for one model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Result of one generation round: text plus zero or more tool invocations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- Media ---

/// Where a blob landed after being written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub key: String,
    pub url: String,
}

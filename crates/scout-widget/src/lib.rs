// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side chat session for the Scout gateway.
//!
//! [`WidgetSession`] owns everything a chat widget remembers: the active
//! session id, the displayed messages, and an image waiting to be attached to
//! the next turn. The id and a transcript cache persist in a JSON state file
//! so a later run can pick the conversation back up.

pub mod client;
pub mod state;

use std::path::Path;

use scout_config::model::{ScoutConfig, WidgetConfig};
use scout_core::types::{HistoryEntry, Sender, TurnContent, TurnRole};
use scout_core::{ScoutError, generate_session_id};
use tracing::{debug, info, warn};

pub use client::{ChatRequest, GatewayClient, UploadedFile};
pub use state::{StateStore, WidgetMessage, WidgetState};

/// Stand-in text when a turn carries only an image.
pub const IMAGE_ONLY_TEXT: &str = "Here's an image of the pest";

/// Shown when the gateway could not be reached for a reply.
pub const REPLY_FAILED_TEXT: &str = "I apologize, but I'm having trouble responding right now. Please try again or continue with your assessment.";

/// Shown when the session could not be registered.
pub const SESSION_FAILED_TEXT: &str =
    "Sorry, I'm having trouble starting the conversation. Please refresh and try again.";

/// Shown when an upload fails.
pub const UPLOAD_FAILED_TEXT: &str = "Sorry, I had trouble uploading that image. Please try again.";

/// One visitor's conversation as seen from the client.
///
/// Turns are sent one at a time: [`WidgetSession::send`] takes `&mut self`
/// and returns only after the reply arrives.
pub struct WidgetSession {
    client: GatewayClient,
    store: StateStore,
    greeting: String,
    user_name: Option<String>,
    session_id: Option<String>,
    session_created: bool,
    messages: Vec<WidgetMessage>,
    pending_image: Option<String>,
}

impl WidgetSession {
    pub fn new(client: GatewayClient, store: StateStore, greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        Self {
            client,
            store,
            messages: vec![WidgetMessage::new(Sender::Bot, greeting.clone(), None)],
            greeting,
            user_name: None,
            session_id: None,
            session_created: false,
            pending_image: None,
        }
    }

    /// Builds a session from the `[widget]` and `[chat]` configuration sections.
    pub fn from_config(config: &ScoutConfig) -> Result<Self, ScoutError> {
        let WidgetConfig {
            server_url,
            state_file,
            user_name,
        } = &config.widget;
        let client = GatewayClient::new(server_url.clone())?;
        let session = Self::new(client, StateStore::new(state_file), config.chat.greeting.clone())
            .with_user_name(user_name.clone());
        Ok(session)
    }

    pub fn with_user_name(mut self, user_name: Option<String>) -> Self {
        self.user_name = user_name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn messages(&self) -> &[WidgetMessage] {
        &self.messages
    }

    pub fn pending_image(&self) -> Option<&str> {
        self.pending_image.as_deref()
    }

    /// Picks up a persisted session, rehydrating its messages from the server.
    ///
    /// Falls back to the local transcript cache when the server has nothing or
    /// cannot be reached. Returns false when no session was persisted.
    pub async fn restore(&mut self) -> Result<bool, ScoutError> {
        let state = self.store.load().await?;
        let Some(session_id) = state.session_id.clone() else {
            return Ok(false);
        };

        let remote = match self.client.chat_history(&session_id).await {
            Ok(turns) => turns
                .into_iter()
                .map(|turn| {
                    let sender = match turn.role {
                        TurnRole::User => Sender::User,
                        TurnRole::Assistant | TurnRole::System => Sender::Bot,
                    };
                    let mut message = WidgetMessage::new(
                        sender,
                        turn.content.text(),
                        turn.content.image_reference().map(str::to_string),
                    );
                    if let Some(ts) = turn.timestamp {
                        message.timestamp = ts;
                    }
                    message
                })
                .collect(),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "could not load chat history");
                Vec::new()
            }
        };

        let cached = state.transcripts.get(&session_id).cloned().unwrap_or_default();
        if !remote.is_empty() {
            self.messages = remote;
        } else if !cached.is_empty() {
            debug!(session_id = %session_id, "restored messages from local cache");
            self.messages = cached;
        }

        info!(session_id = %session_id, messages = self.messages.len(), "session restored");
        self.session_id = Some(session_id);
        self.session_created = true;
        Ok(true)
    }

    /// Ensures a registered session exists, creating one on first use.
    ///
    /// The new id is persisted before the gateway is asked to register it.
    pub async fn init(&mut self) -> Result<String, ScoutError> {
        if let (true, Some(id)) = (self.session_created, &self.session_id) {
            return Ok(id.clone());
        }
        let session_id = self
            .session_id
            .clone()
            .unwrap_or_else(|| generate_session_id().0);
        self.session_id = Some(session_id.clone());

        let mut state = self.store.load().await?;
        state.session_id = Some(session_id.clone());
        self.store.save(&state).await?;

        self.client.create_session(&session_id).await?;
        self.session_created = true;
        info!(session_id = %session_id, "session started");
        Ok(session_id)
    }

    /// Forgets the session: clears the persisted id and cache and shows the greeting again.
    pub async fn reset(&mut self) -> Result<(), ScoutError> {
        let mut state = self.store.load().await?;
        if let Some(id) = self.session_id.take().or(state.session_id.clone()) {
            state.transcripts.remove(&id);
        }
        state.session_id = None;
        self.store.save(&state).await?;

        self.session_created = false;
        self.pending_image = None;
        self.messages = vec![WidgetMessage::new(Sender::Bot, self.greeting.clone(), None)];
        info!("session reset");
        Ok(())
    }

    /// Uploads a file and holds its URL for the next turn.
    pub async fn upload(&mut self, path: &Path) -> Result<UploadedFile, ScoutError> {
        let result = self.try_upload(path).await;
        match &result {
            Ok(uploaded) => self.pending_image = Some(uploaded.url.clone()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "upload failed");
                self.push_message(WidgetMessage::new(Sender::Bot, UPLOAD_FAILED_TEXT, None))
                    .await;
            }
        }
        result
    }

    async fn try_upload(&self, path: &Path) -> Result<UploadedFile, ScoutError> {
        let bytes = tokio::fs::read(path).await.map_err(ScoutError::storage)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        self.client.upload(&filename, &content_type, bytes).await
    }

    /// Sends one turn and returns the reply that was displayed.
    ///
    /// Gateway failures become apology messages rather than errors; only an
    /// empty turn is rejected.
    pub async fn send(&mut self, text: &str) -> Result<String, ScoutError> {
        let text = text.trim();
        let image = self.pending_image.take();
        if text.is_empty() && image.is_none() {
            return Err(ScoutError::Validation("nothing to send".into()));
        }
        let text = if text.is_empty() { IMAGE_ONLY_TEXT } else { text };

        let history: Vec<HistoryEntry> = self
            .messages
            .iter()
            .map(|m| HistoryEntry {
                sender: m.sender,
                content: TurnContent::new(m.content.clone(), m.image_reference.clone()),
            })
            .collect();
        self.push_message(WidgetMessage::new(Sender::User, text, image.clone()))
            .await;

        let session_id = match self.init().await {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "could not start session");
                self.push_message(WidgetMessage::new(Sender::Bot, SESSION_FAILED_TEXT, None))
                    .await;
                return Ok(SESSION_FAILED_TEXT.to_string());
            }
        };

        let request = ChatRequest {
            message: text.to_string(),
            history,
            session_id: Some(session_id),
            user_name: self.user_name.clone(),
            image_reference: image,
        };
        let reply = match self.client.chat(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "chat request failed");
                REPLY_FAILED_TEXT.to_string()
            }
        };
        self.push_message(WidgetMessage::new(Sender::Bot, reply.clone(), None))
            .await;
        Ok(reply)
    }

    /// Appends a message and refreshes the local cache. Cache failures are logged only.
    async fn push_message(&mut self, message: WidgetMessage) {
        self.messages.push(message);
        let Some(session_id) = self.session_id.clone() else {
            return;
        };
        let result = async {
            let mut state = self.store.load().await?;
            state.transcripts.insert(session_id, self.messages.clone());
            self.store.save(&state).await
        }
        .await;
        if let Err(e) = result {
            warn!(error = %e, "failed to cache transcript");
        }
    }
}

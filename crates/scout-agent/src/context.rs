// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Assembles model context from client-supplied history and the current turn.

use scout_core::types::{ContentPart, HistoryEntry, ModelMessage, ModelRole, TurnContent, TurnRole};
use tracing::debug;

/// Converts turn content into model message parts. Images follow the text.
pub fn content_parts(content: &TurnContent) -> Vec<ContentPart> {
    let mut parts = vec![ContentPart::Text(content.text().to_string())];
    if let Some(url) = content.image_reference() {
        parts.push(ContentPart::Image {
            url: url.to_string(),
        });
    }
    parts
}

/// Maps prior history and the current utterance into model messages.
///
/// Entries from unknown senders are dropped.
pub fn build_messages(
    history: &[HistoryEntry],
    message: &str,
    image_reference: Option<&str>,
) -> Vec<ModelMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    for entry in history {
        let role = match entry.role() {
            Some(TurnRole::User) => ModelRole::User,
            Some(TurnRole::Assistant) => ModelRole::Assistant,
            Some(TurnRole::System) | None => {
                debug!(sender = ?entry.sender, "dropping history entry");
                continue;
            }
        };
        messages.push(ModelMessage {
            role,
            parts: content_parts(&entry.content),
        });
    }

    let current = TurnContent::new(message, image_reference.map(str::to_string));
    messages.push(ModelMessage {
        role: ModelRole::User,
        parts: content_parts(&current),
    });
    messages
}

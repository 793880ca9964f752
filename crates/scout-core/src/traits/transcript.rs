// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation transcript persistence.

use async_trait::async_trait;

use crate::error::ScoutError;
use crate::traits::adapter::PluginAdapter;
use crate::types::TranscriptTurn;

/// Append-only, ordered log of conversation turns per session.
#[async_trait]
pub trait TranscriptStore: PluginAdapter {
    /// Appends turns in order as one atomic write.
    ///
    /// When the session has no transcript yet, `opening` is written first.
    async fn append_turns(
        &self,
        session_id: &str,
        turns: &[TranscriptTurn],
        opening: Option<&TranscriptTurn>,
    ) -> Result<(), ScoutError>;

    /// Returns the full transcript in append order. Unknown sessions yield an empty list.
    async fn transcript(&self, session_id: &str) -> Result<Vec<TranscriptTurn>, ScoutError>;
}

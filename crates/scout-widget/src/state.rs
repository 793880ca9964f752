// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local persistence for the widget: the active session id and a per-session
//! transcript cache, kept in one JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use scout_core::ScoutError;
use scout_core::types::Sender;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One message as displayed by the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetMessage {
    pub id: String,
    pub sender: Sender,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
    pub timestamp: String,
}

impl WidgetMessage {
    pub fn new(sender: Sender, content: impl Into<String>, image_reference: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            content: content.into(),
            image_reference,
            timestamp: scout_core::timestamp_now(),
        }
    }
}

/// Everything the widget remembers between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetState {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub transcripts: BTreeMap<String, Vec<WidgetMessage>>,
}

/// Reads and writes [`WidgetState`] at a fixed path.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state. A missing file is empty state; an unreadable one is
    /// logged and treated as empty.
    pub async fn load(&self) -> Result<WidgetState, ScoutError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(WidgetState::default());
            }
            Err(e) => return Err(ScoutError::storage(e)),
        };
        match serde_json::from_slice(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "discarding corrupt widget state");
                Ok(WidgetState::default())
            }
        }
    }

    /// Writes the state through a sibling temp file and a rename.
    pub async fn save(&self, state: &WidgetState) -> Result<(), ScoutError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ScoutError::storage)?;
        }
        let json = serde_json::to_vec_pretty(state)
            .map_err(|e| ScoutError::Internal(format!("failed to encode widget state: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(ScoutError::storage)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(ScoutError::storage)?;
        Ok(())
    }
}

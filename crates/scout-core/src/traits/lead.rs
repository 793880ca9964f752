// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead record persistence.

use async_trait::async_trait;

use crate::error::ScoutError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{LeadRecord, LeadUpdate};

/// Durable store holding one [`LeadRecord`] per session.
///
/// Captured fields are never cleared: updates merge non-empty values only,
/// and status only moves from `open` to `completed`.
#[async_trait]
pub trait LeadStore: PluginAdapter {
    /// Creates an open lead for the session. Creating an existing lead is a no-op.
    async fn create_lead(&self, session_id: &str) -> Result<LeadRecord, ScoutError>;

    /// Fetches the lead for a session, if one exists.
    async fn get_lead(&self, session_id: &str) -> Result<Option<LeadRecord>, ScoutError>;

    /// Merges the given fields into the lead, creating it if needed.
    async fn update_lead(
        &self,
        session_id: &str,
        update: &LeadUpdate,
    ) -> Result<LeadRecord, ScoutError>;

    /// Overwrites the summary without touching status.
    async fn save_summary(
        &self,
        session_id: &str,
        summary: &str,
    ) -> Result<Option<LeadRecord>, ScoutError>;

    /// Stores the summary and notes and marks the lead completed.
    ///
    /// Returns `None` when no lead exists for the session.
    async fn finalize_lead(
        &self,
        session_id: &str,
        summary: &str,
        notes: Option<&str>,
    ) -> Result<Option<LeadRecord>, ScoutError>;
}

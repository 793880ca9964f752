// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The two lead-capture tools: progressive field updates and finalization.
//!
//! Both tools are bound to one session and never fail the turn. Storage or
//! model errors are logged and reported to the model as `success: false`.

use std::sync::Arc;

use async_trait::async_trait;
use scout_core::ScoutError;
use scout_core::traits::LeadStore;
use scout_core::types::{LeadUpdate, ModelMessage};
use serde::Deserialize;
use tracing::{info, warn};

use crate::summarizer::Summarizer;
use crate::tools::{Tool, ToolOutput};

pub const UPDATE_LEAD: &str = "updateLead";
pub const FINALIZE_LEAD: &str = "finalizeLead";

/// Merges whatever contact details the visitor just shared into their lead.
pub struct UpdateLeadTool {
    leads: Arc<dyn LeadStore>,
    session_id: String,
}

impl UpdateLeadTool {
    pub fn new(leads: Arc<dyn LeadStore>, session_id: impl Into<String>) -> Self {
        Self {
            leads,
            session_id: session_id.into(),
        }
    }
}

#[async_trait]
impl Tool for UpdateLeadTool {
    fn name(&self) -> &str {
        UPDATE_LEAD
    }

    fn description(&self) -> &str {
        "Update the lead information in the database. Call this IMMEDIATELY whenever the user provides ANY piece of information (name, phone, email, city, or preferred time). You can call this multiple times throughout the conversation to progressively save data."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Customer's full name" },
                "phone": { "type": "string", "description": "Customer's phone number" },
                "email": { "type": "string", "description": "Customer's email address" },
                "city": { "type": "string", "description": "Customer's city or area" },
                "preferredTime": { "type": "string", "description": "Preferred time to be contacted" }
            }
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, ScoutError> {
        let update = match serde_json::from_value::<LeadUpdate>(input) {
            Ok(update) => update.normalized(),
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "malformed updateLead input");
                return Ok(ToolOutput::ack(false, "Failed to update lead"));
            }
        };

        match self.leads.update_lead(&self.session_id, &update).await {
            Ok(_) => {
                info!(
                    session_id = %self.session_id,
                    fields = ?update.field_names(),
                    "lead updated"
                );
                Ok(ToolOutput::ack(true, "Lead updated successfully"))
            }
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "lead update failed");
                Ok(ToolOutput::ack(false, "Failed to update lead"))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinalizeInput {
    #[serde(default)]
    final_note: Option<String>,
}

/// Summarizes the conversation and marks the lead completed.
///
/// Refuses unless name, city, and a contact method are on file, and refuses
/// to finalize a lead twice.
pub struct FinalizeLeadTool {
    leads: Arc<dyn LeadStore>,
    summarizer: Arc<Summarizer>,
    session_id: String,
    conversation: Vec<ModelMessage>,
}

impl FinalizeLeadTool {
    pub fn new(
        leads: Arc<dyn LeadStore>,
        summarizer: Arc<Summarizer>,
        session_id: impl Into<String>,
        conversation: Vec<ModelMessage>,
    ) -> Self {
        Self {
            leads,
            summarizer,
            session_id: session_id.into(),
            conversation,
        }
    }
}

#[async_trait]
impl Tool for FinalizeLeadTool {
    fn name(&self) -> &str {
        FINALIZE_LEAD
    }

    fn description(&self) -> &str {
        "Call this ONLY when you have collected the minimum required information: name, city, and at least one contact method (phone OR email). This generates a summary and marks the lead as complete. Only call this once per conversation."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "finalNote": { "type": "string", "description": "Any final notes about the pest issue" }
            }
        })
    }

    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, ScoutError> {
        let session_id = self.session_id.as_str();
        let input: FinalizeInput = serde_json::from_value(input).unwrap_or_default();
        let note = input
            .final_note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let lead = match self.leads.get_lead(session_id).await {
            Ok(lead) => lead,
            Err(e) => {
                warn!(session_id, error = %e, "could not load lead for finalization");
                return Ok(ToolOutput::ack(false, "Failed to finalize lead"));
            }
        };
        let missing = match &lead {
            Some(lead) if lead.is_completed() => {
                info!(session_id, "lead already finalized");
                return Ok(ToolOutput::ack(false, "Lead already finalized"));
            }
            Some(lead) => lead.missing_fields(),
            None => vec!["name", "city", "phone or email"],
        };
        if !missing.is_empty() {
            info!(session_id, ?missing, "finalization refused");
            return Ok(ToolOutput::ack(
                false,
                &format!("Cannot finalize yet; missing: {}", missing.join(", ")),
            ));
        }

        let summary = match self.summarizer.summarize(&self.conversation).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(session_id, error = %e, "summary generation failed");
                return Ok(ToolOutput::ack(false, "Failed to finalize lead"));
            }
        };

        match self.leads.finalize_lead(session_id, &summary, note).await {
            Ok(Some(_)) => {
                info!(session_id, "lead finalized");
                Ok(ToolOutput::ack(true, "Lead finalized successfully"))
            }
            Ok(None) => {
                warn!(session_id, "lead vanished before finalization");
                Ok(ToolOutput::ack(false, "Failed to finalize lead"))
            }
            Err(e) => {
                warn!(session_id, error = %e, "lead finalization failed");
                Ok(ToolOutput::ack(false, "Failed to finalize lead"))
            }
        }
    }
}

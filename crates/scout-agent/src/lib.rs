// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation orchestrator for the Scout lead-capture assistant.
//!
//! One call to [`Orchestrator::respond`] handles one visitor turn: it builds
//! the model context, runs a bounded tool loop in which the model may save
//! lead fields and finalize the lead, and returns the final reply text. When
//! a session is known the turn is appended to the transcript in a detached
//! background task.

pub mod context;
pub mod lead_tools;
pub mod prompt;
pub mod summarizer;
pub mod tools;

use std::sync::Arc;

use scout_config::model::ScoutConfig;
use scout_core::ScoutError;
use scout_core::traits::{LanguageModel, LeadStore, TranscriptStore};
use scout_core::types::{
    ContentPart, HistoryEntry, ModelMessage, ModelRequest, ModelRole, TranscriptTurn,
    TurnContent, TurnRole,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use lead_tools::{FinalizeLeadTool, UpdateLeadTool};
pub use summarizer::Summarizer;
pub use tools::{Tool, ToolOutput, ToolRegistry};

/// Reply used when the model's final round produced no text.
pub const FALLBACK_REPLY: &str =
    "Thanks for chatting with me! I'll make sure you get all the information you need.";

/// Tunables for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum model rounds per visitor turn.
    pub max_steps: usize,
    pub temperature: f32,
    /// Opening assistant turn that seeds every new transcript.
    pub greeting: String,
}

impl OrchestratorConfig {
    pub fn from_config(config: &ScoutConfig) -> Self {
        Self {
            max_steps: config.chat.max_steps,
            temperature: config.anthropic.temperature,
            greeting: config.chat.greeting.clone(),
        }
    }
}

/// One visitor turn as received from the chat endpoint.
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub session_id: Option<String>,
    pub image_reference: Option<String>,
    pub user_name: Option<String>,
}

/// Result of one turn.
#[derive(Debug)]
pub struct TurnOutcome {
    pub reply: String,
    /// Background transcript append, present when the turn had a session.
    pub transcript_task: Option<JoinHandle<()>>,
}

/// Drives a single chat turn through the language model and lead tools.
pub struct Orchestrator {
    model: Arc<dyn LanguageModel>,
    leads: Arc<dyn LeadStore>,
    transcripts: Arc<dyn TranscriptStore>,
    summarizer: Arc<Summarizer>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        leads: Arc<dyn LeadStore>,
        transcripts: Arc<dyn TranscriptStore>,
        config: OrchestratorConfig,
    ) -> Self {
        let summarizer = Arc::new(Summarizer::new(model.clone(), config.temperature));
        Self {
            model,
            leads,
            transcripts,
            summarizer,
            config,
        }
    }

    pub fn greeting(&self) -> &str {
        &self.config.greeting
    }

    /// Builds the per-turn tool registry. Without a session no tools are exposed.
    fn registry_for(&self, session_id: Option<&str>, conversation: &[ModelMessage]) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        if let Some(session_id) = session_id {
            registry.register(Arc::new(UpdateLeadTool::new(self.leads.clone(), session_id)));
            registry.register(Arc::new(FinalizeLeadTool::new(
                self.leads.clone(),
                self.summarizer.clone(),
                session_id,
                conversation.to_vec(),
            )));
        }
        registry
    }

    /// Handles one visitor turn and returns the reply.
    ///
    /// Model failures propagate; tool failures are reported to the model only.
    pub async fn respond(&self, turn: ChatTurn) -> Result<TurnOutcome, ScoutError> {
        if turn.message.trim().is_empty() {
            return Err(ScoutError::Validation("Invalid message".into()));
        }
        let session_id = turn
            .session_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let image_reference = turn
            .image_reference
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let system = prompt::system_prompt(turn.user_name.as_deref());
        let mut messages = context::build_messages(&turn.history, &turn.message, image_reference);
        let registry = self.registry_for(session_id, &messages);
        let tools = registry.tool_specs();

        info!(
            session_id = session_id.unwrap_or("-"),
            history = turn.history.len(),
            has_image = image_reference.is_some(),
            "chat turn"
        );

        let mut final_text = String::new();
        for round in 1..=self.config.max_steps {
            let request = ModelRequest {
                system: Some(system.clone()),
                messages: messages.clone(),
                tools: tools.clone(),
                temperature: Some(self.config.temperature),
                max_tokens: None,
            };
            let response = self.model.generate(request).await?;
            final_text = response.text;

            if response.tool_calls.is_empty() {
                debug!(round, "model finished without tool calls");
                break;
            }

            let mut assistant_parts = Vec::with_capacity(response.tool_calls.len() + 1);
            if !final_text.is_empty() {
                assistant_parts.push(ContentPart::Text(final_text.clone()));
            }
            assistant_parts.extend(response.tool_calls.iter().cloned().map(ContentPart::ToolCall));
            messages.push(ModelMessage {
                role: ModelRole::Assistant,
                parts: assistant_parts,
            });

            let mut results = Vec::with_capacity(response.tool_calls.len());
            for call in &response.tool_calls {
                debug!(round, tool = %call.name, "executing tool");
                let output = match registry.get(&call.name) {
                    Some(tool) => match tool.invoke(call.input.clone()).await {
                        Ok(output) => output,
                        Err(e) => ToolOutput {
                            content: format!("Tool error: {e}"),
                            is_error: true,
                        },
                    },
                    None => {
                        warn!(tool = %call.name, "model requested an unknown tool");
                        ToolOutput {
                            content: format!("Unknown tool: {}", call.name),
                            is_error: true,
                        }
                    }
                };
                results.push(ContentPart::ToolResult {
                    call_id: call.id.clone(),
                    content: output.content,
                    is_error: output.is_error,
                });
            }
            messages.push(ModelMessage {
                role: ModelRole::User,
                parts: results,
            });

            if round == self.config.max_steps {
                warn!(max_steps = self.config.max_steps, "maximum model rounds reached");
            }
        }

        let reply = if final_text.trim().is_empty() {
            FALLBACK_REPLY.to_string()
        } else {
            final_text
        };

        let transcript_task = session_id.map(|sid| {
            self.spawn_transcript_append(
                sid.to_string(),
                TurnContent::new(turn.message.clone(), image_reference.map(str::to_string)),
                reply.clone(),
            )
        });

        Ok(TurnOutcome {
            reply,
            transcript_task,
        })
    }

    /// Appends the user turn and the reply without blocking the response.
    fn spawn_transcript_append(
        &self,
        session_id: String,
        user_content: TurnContent,
        reply: String,
    ) -> JoinHandle<()> {
        let transcripts = self.transcripts.clone();
        let opening = TranscriptTurn::new(TurnRole::Assistant, self.config.greeting.clone());
        tokio::spawn(async move {
            let turns = [
                TranscriptTurn::new(TurnRole::User, user_content),
                TranscriptTurn::new(TurnRole::Assistant, reply),
            ];
            if let Err(e) = transcripts
                .append_turns(&session_id, &turns, Some(&opening))
                .await
            {
                warn!(session_id = %session_id, error = %e, "failed to save transcript turn");
            }
        })
    }
}

// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lead finalization summarizer: condenses a consultation into a short report
//! for the pest control team with a second, tool-free model call.

use std::sync::Arc;

use scout_core::ScoutError;
use scout_core::traits::LanguageModel;
use scout_core::types::{ContentPart, ModelMessage, ModelRequest, ModelRole};
use tracing::debug;

const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert at summarizing pest consultation chats into clear, concise reports for pest control professionals.";

const SUMMARY_INSTRUCTIONS: &str = "Summarize this pest consultation conversation into a short report (under 120 words) with bullet points covering:

- Main pest issue and evidence
- Images shared (if any, note the link)
- Homeowner concerns
- Context (location, duration, etc.)
- Next steps or recommendations";

/// Renders a conversation as `ROLE: text` paragraphs. Images appear as `[Image: <url>]`.
pub fn render_conversation(messages: &[ModelMessage]) -> String {
    messages
        .iter()
        .map(|msg| {
            let role = match msg.role {
                ModelRole::User => "USER",
                ModelRole::Assistant => "ASSISTANT",
            };
            let body = msg
                .parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text(text) => Some(text.clone()),
                    ContentPart::Image { url } => Some(format!("[Image: {url}]")),
                    ContentPart::ToolCall(_) | ContentPart::ToolResult { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{role}: {body}")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Generates finalization summaries through a [`LanguageModel`].
pub struct Summarizer {
    model: Arc<dyn LanguageModel>,
    temperature: f32,
}

impl Summarizer {
    pub fn new(model: Arc<dyn LanguageModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    /// Summarizes the conversation. Model failures propagate unchanged.
    pub async fn summarize(&self, messages: &[ModelMessage]) -> Result<String, ScoutError> {
        let prompt = format!(
            "{SUMMARY_INSTRUCTIONS}\n\nConversation:\n{}",
            render_conversation(messages)
        );
        let request = ModelRequest {
            system: Some(SUMMARY_SYSTEM_PROMPT.to_string()),
            messages: vec![ModelMessage::user_text(prompt)],
            tools: Vec::new(),
            temperature: Some(self.temperature),
            max_tokens: None,
        };
        let response = self.model.generate(request).await?;
        debug!(chars = response.text.len(), "summary generated");
        Ok(response.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use scout_core::types::ToolCall;

    use super::*;

    #[test]
    fn renders_roles_and_images() {
        let messages = vec![
            ModelMessage::assistant_text("Hi there!"),
            ModelMessage {
                role: ModelRole::User,
                parts: vec![
                    ContentPart::Text("look at this".into()),
                    ContentPart::Image {
                        url: "https://cdn/ant.jpg".into(),
                    },
                ],
            },
        ];
        assert_eq!(
            render_conversation(&messages),
            "ASSISTANT: Hi there!\n\nUSER: look at this [Image: https://cdn/ant.jpg]"
        );
    }

    #[test]
    fn tool_blocks_are_not_rendered() {
        let messages = vec![ModelMessage {
            role: ModelRole::Assistant,
            parts: vec![
                ContentPart::Text("Got it".into()),
                ContentPart::ToolCall(ToolCall {
                    id: "t1".into(),
                    name: "updateLead".into(),
                    input: serde_json::json!({ "name": "Dana" }),
                }),
            ],
        }];
        assert_eq!(render_conversation(&messages), "ASSISTANT: Got it");
    }
}

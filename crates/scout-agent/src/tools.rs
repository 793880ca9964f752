// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool trait and registry for model-callable operations.
//!
//! The orchestrator builds a [`ToolRegistry`] per chat turn, advertises its
//! [`ToolSpec`]s to the model, and dispatches each requested call by name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use scout_core::ScoutError;
use scout_core::types::ToolSpec;
use serde::{Deserialize, Serialize};

/// Output from a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The content returned to the model (usually JSON text).
    pub content: String,
    /// Whether the tool invocation resulted in an error.
    pub is_error: bool,
}

impl ToolOutput {
    /// The `{success, message}` acknowledgement the lead tools return.
    pub fn ack(success: bool, message: &str) -> Self {
        Self {
            content: serde_json::json!({ "success": success, "message": message }).to_string(),
            is_error: false,
        }
    }
}

/// A model-callable operation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's unique name (used for lookup and API serialization).
    fn name(&self) -> &str;

    /// Returns a description of when the model should call the tool.
    fn description(&self) -> &str;

    /// Returns the JSON Schema describing the tool's input parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Invokes the tool with the JSON input from the model's tool call.
    async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, ScoutError>;
}

/// Registry of available tools, indexed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool. The tool is indexed by its `name()`.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Tool specs for the model request, sorted by name.
    pub fn tool_specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .tools
            .values()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.parameters_schema(),
            })
            .collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes the input text"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }

        async fn invoke(&self, input: serde_json::Value) -> Result<ToolOutput, ScoutError> {
            let text = input["text"].as_str().unwrap_or("").to_string();
            Ok(ToolOutput {
                content: text,
                is_error: false,
            })
        }
    }

    struct PingTool;

    #[async_trait]
    impl Tool for PingTool {
        fn name(&self) -> &str {
            "ping"
        }

        fn description(&self) -> &str {
            "Replies pong"
        }

        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({ "type": "object", "properties": {} })
        }

        async fn invoke(&self, _input: serde_json::Value) -> Result<ToolOutput, ScoutError> {
            Ok(ToolOutput {
                content: "pong".into(),
                is_error: false,
            })
        }
    }

    #[test]
    fn empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.tool_specs().is_empty());
        assert!(registry.get("echo").is_none());
    }

    #[test]
    fn specs_are_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(PingTool));
        registry.register(Arc::new(EchoTool));
        let names: Vec<_> = registry.tool_specs().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["echo", "ping"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn lookup_and_invoke() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));
        let tool = registry.get("echo").unwrap();
        let out = tool
            .invoke(serde_json::json!({ "text": "hello" }))
            .await
            .unwrap();
        assert_eq!(out.content, "hello");
        assert!(!out.is_error);
    }

    #[test]
    fn ack_is_success_message_json() {
        let out = ToolOutput::ack(false, "Failed to update lead");
        let json: serde_json::Value = serde_json::from_str(&out.content).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Failed to update lead");
        assert!(!out.is_error);
    }
}

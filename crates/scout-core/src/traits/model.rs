// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language model trait: the external "decision oracle".

use async_trait::async_trait;

use crate::error::ScoutError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ModelRequest, ModelResponse};

/// A hosted generative model that may answer with text, tool calls, or both.
///
/// One call is one generation round. The conversation orchestrator drives
/// the tool-call loop; implementations never execute tools themselves.
#[async_trait]
pub trait LanguageModel: PluginAdapter {
    /// Runs one generation round over the given context.
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ScoutError>;
}

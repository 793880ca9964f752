// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod blob;
pub mod lead;
pub mod model;
pub mod transcript;

pub use adapter::PluginAdapter;
pub use blob::BlobStore;
pub use lead::LeadStore;
pub use model::LanguageModel;
pub use transcript::TranscriptStore;

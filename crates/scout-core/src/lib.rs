// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Scout lead-capture service.
//!
//! Defines the error type, the lead/transcript domain model, session
//! identifier generation, and the adapter traits that storage, model and
//! blob backends implement.

pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::ScoutError;
pub use session::{generate_session_id, timestamp_now};
pub use types::{
    AdapterType, HealthStatus, LeadRecord, LeadStatus, LeadUpdate, SessionId, TranscriptTurn,
    TurnContent, TurnRole,
};

pub use traits::{BlobStore, LanguageModel, LeadStore, PluginAdapter, TranscriptStore};

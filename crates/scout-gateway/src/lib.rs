// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Scout lead-capture chat service.
//!
//! Exposes the chat, lead, transcript, and upload endpoints used by the chat
//! widget, serves stored uploads, and reports adapter health.

pub mod handlers;
pub mod server;
pub mod upload;

pub use handlers::APOLOGY_REPLY;
pub use server::{AppState, GatewayConfig, HealthState, router, start_server};

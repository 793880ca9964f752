// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Scout integration tests.
//!
//! # Components
//!
//! - [`MockModel`] - Scripted language model that records requests
//! - [`TestHarness`] - Temp SQLite database, blob directory, and mock model

pub mod harness;
pub mod mock_model;

pub use harness::{TEST_BASE_URL, TestHarness};
pub use mock_model::{MockModel, text_response, tool_response};

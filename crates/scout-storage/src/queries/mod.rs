// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for lead and transcript persistence.

pub mod leads;
pub mod transcripts;

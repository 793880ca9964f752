// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blob storage for uploaded media.

use async_trait::async_trait;

use crate::error::ScoutError;
use crate::traits::adapter::PluginAdapter;
use crate::types::StoredBlob;

/// Publicly readable object storage.
#[async_trait]
pub trait BlobStore: PluginAdapter {
    /// Writes `bytes` under `key` and returns its public URL.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredBlob, ScoutError>;
}

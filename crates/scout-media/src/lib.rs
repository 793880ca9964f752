// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media ingestion for photos and videos of pest evidence.
//!
//! [`MediaIngestor`] validates an upload, derives a unique object key and
//! hands the bytes to a [`BlobStore`]. [`LocalBlobStore`] keeps blobs in a
//! directory the gateway serves read-only.

pub mod local;

use std::sync::Arc;

use scout_core::{BlobStore, ScoutError};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

pub use local::LocalBlobStore;

/// Prefix for every stored object key.
const KEY_PREFIX: &str = "pest-assessment";

/// Longest sanitized file name kept in an object key.
const MAX_NAME_LEN: usize = 100;

/// MIME type prefixes accepted for upload.
const ALLOWED_TYPE_PREFIXES: &[&str] = &["image/", "video/"];

/// Result of a successful upload, returned to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedMedia {
    pub url: String,
    /// The client's original file name.
    pub filename: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Validates and stores uploaded media.
#[derive(Clone)]
pub struct MediaIngestor {
    store: Arc<dyn BlobStore>,
    max_bytes: u64,
}

impl MediaIngestor {
    pub fn new(store: Arc<dyn BlobStore>, max_bytes: u64) -> Self {
        Self { store, max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validates the upload and writes it to the blob store.
    ///
    /// Validation failures are [`ScoutError::Media`]; blob store failures pass through.
    pub async fn ingest(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<UploadedMedia, ScoutError> {
        validate(bytes.len() as u64, content_type, self.max_bytes)?;

        let nonce = Uuid::new_v4().simple().to_string();
        let key = object_key(filename, chrono::Utc::now().timestamp_millis(), &nonce);
        let stored = self.store.put(&key, content_type, bytes).await?;
        info!(key = %stored.key, size = bytes.len(), content_type, "media stored");

        Ok(UploadedMedia {
            url: stored.url,
            filename: filename.to_string(),
            size: bytes.len() as u64,
            content_type: content_type.to_string(),
        })
    }
}

/// Checks size and type limits for an upload.
pub fn validate(size: u64, content_type: &str, max_bytes: u64) -> Result<(), ScoutError> {
    if size == 0 {
        return Err(ScoutError::Media {
            message: "No file provided".into(),
        });
    }
    if size > max_bytes {
        return Err(ScoutError::Media {
            message: format!("File size exceeds {} limit", format_limit(max_bytes)),
        });
    }
    if !ALLOWED_TYPE_PREFIXES
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
    {
        return Err(ScoutError::Media {
            message: "Only image and video files are allowed".into(),
        });
    }
    Ok(())
}

/// Human-readable size limit, e.g. `20MB`.
fn format_limit(max_bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if max_bytes >= MIB && max_bytes % MIB == 0 {
        format!("{}MB", max_bytes / MIB)
    } else {
        format!("{max_bytes} bytes")
    }
}

/// Object key `pest-assessment-{millis}-{nonce}-{name}` with the name made path-safe.
///
/// `nonce` must be unique per upload; same-named uploads within one
/// millisecond are otherwise indistinguishable.
pub fn object_key(filename: &str, millis: i64, nonce: &str) -> String {
    format!("{KEY_PREFIX}-{millis}-{nonce}-{}", sanitize_filename(filename))
}

fn sanitize_filename(filename: &str) -> String {
    // Browsers may send a full client path; keep only the last component.
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

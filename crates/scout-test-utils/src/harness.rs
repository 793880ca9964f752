// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring real adapters onto throwaway directories.
//!
//! `TestHarness` owns a temp directory holding a fresh SQLite database and a
//! blob directory, plus a scripted [`MockModel`]. The directory is removed
//! when the harness is dropped.

use std::sync::Arc;

use scout_config::model::{MediaConfig, ScoutConfig, StorageConfig};
use scout_core::ScoutError;
use scout_media::{LocalBlobStore, MediaIngestor};
use scout_storage::SqliteStorage;

use crate::mock_model::MockModel;

/// Base URL the harness pretends the server listens on.
pub const TEST_BASE_URL: &str = "http://127.0.0.1:3000";

/// A complete set of adapters for integration tests.
pub struct TestHarness {
    pub config: ScoutConfig,
    pub storage: Arc<SqliteStorage>,
    pub blobs: Arc<LocalBlobStore>,
    pub model: MockModel,
    temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Creates the temp directory, opens SQLite, and points media at `media/`.
    pub async fn new() -> Result<Self, ScoutError> {
        let temp_dir = tempfile::TempDir::new().map_err(ScoutError::storage)?;
        let db_path = temp_dir.path().join("scout-test.db");
        let media_dir = temp_dir.path().join("media");

        let mut config = ScoutConfig::default();
        config.server.public_base_url = Some(TEST_BASE_URL.to_string());
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };
        config.media = MediaConfig {
            upload_dir: media_dir.to_string_lossy().into_owned(),
            ..MediaConfig::default()
        };

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;

        let blobs = LocalBlobStore::from_config(&config.media, &config.server.base_url());

        Ok(Self {
            config,
            storage: Arc::new(storage),
            blobs: Arc::new(blobs),
            model: MockModel::new(),
            temp_dir,
        })
    }

    /// A media ingestor over the harness blob directory.
    pub fn ingestor(&self) -> MediaIngestor {
        MediaIngestor::new(self.blobs.clone(), self.config.media.max_upload_bytes)
    }

    pub fn temp_path(&self) -> &std::path::Path {
        self.temp_dir.path()
    }
}

// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the lead and transcript store traits.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use scout_config::model::StorageConfig;
use scout_core::types::{LeadRecord, LeadUpdate, TranscriptTurn};
use scout_core::{
    AdapterType, HealthStatus, LeadStore, PluginAdapter, ScoutError, TranscriptStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed lead and transcript store.
///
/// The database is opened on the first call to [`SqliteStorage::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database and run migrations.
    pub async fn initialize(&self) -> Result<(), ScoutError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| ScoutError::Storage {
            source: "storage already initialized".into(),
        })?;
        info!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, ScoutError> {
        self.db.get().ok_or_else(|| ScoutError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, ScoutError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ScoutError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl LeadStore for SqliteStorage {
    async fn create_lead(&self, session_id: &str) -> Result<LeadRecord, ScoutError> {
        queries::leads::create_lead(self.db()?, session_id).await
    }

    async fn get_lead(&self, session_id: &str) -> Result<Option<LeadRecord>, ScoutError> {
        queries::leads::get_lead(self.db()?, session_id).await
    }

    async fn update_lead(
        &self,
        session_id: &str,
        update: &LeadUpdate,
    ) -> Result<LeadRecord, ScoutError> {
        queries::leads::update_lead(self.db()?, session_id, update).await
    }

    async fn save_summary(
        &self,
        session_id: &str,
        summary: &str,
    ) -> Result<Option<LeadRecord>, ScoutError> {
        queries::leads::save_summary(self.db()?, session_id, summary).await
    }

    async fn finalize_lead(
        &self,
        session_id: &str,
        summary: &str,
        notes: Option<&str>,
    ) -> Result<Option<LeadRecord>, ScoutError> {
        queries::leads::finalize_lead(self.db()?, session_id, summary, notes).await
    }
}

#[async_trait]
impl TranscriptStore for SqliteStorage {
    async fn append_turns(
        &self,
        session_id: &str,
        turns: &[TranscriptTurn],
        opening: Option<&TranscriptTurn>,
    ) -> Result<(), ScoutError> {
        queries::transcripts::append_turns(self.db()?, session_id, turns, opening).await
    }

    async fn transcript(&self, session_id: &str) -> Result<Vec<TranscriptTurn>, ScoutError> {
        queries::transcripts::transcript(self.db()?, session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::types::{LeadStatus, TurnRole};
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_storage_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        assert_eq!(storage.version(), semver::Version::new(0, 1, 0));
        assert_eq!(storage.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        storage.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn health_check_requires_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        storage.initialize().await.unwrap();
        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn lead_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));
        storage.initialize().await.unwrap();

        storage.create_lead("sess-1").await.unwrap();
        let update = LeadUpdate {
            name: Some("Dana".into()),
            city: Some("Sacramento".into()),
            ..LeadUpdate::default()
        };
        let lead = storage.update_lead("sess-1", &update).await.unwrap();
        assert!(!lead.is_ready_for_finalization());

        let update = LeadUpdate {
            email: Some("dana@example.com".into()),
            ..LeadUpdate::default()
        };
        let lead = storage.update_lead("sess-1", &update).await.unwrap();
        assert!(lead.is_ready_for_finalization());

        let done = storage
            .finalize_lead("sess-1", "- Ants", None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, LeadStatus::Completed);

        storage
            .append_turns(
                "sess-1",
                &[TranscriptTurn::new(TurnRole::User, "hello")],
                None,
            )
            .await
            .unwrap();
        assert_eq!(storage.transcript("sess-1").await.unwrap().len(), 1);

        storage.shutdown().await.unwrap();
    }
}

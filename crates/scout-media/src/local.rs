// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scout_config::model::MediaConfig;
use scout_core::types::{AdapterType, HealthStatus, StoredBlob};
use scout_core::{BlobStore, PluginAdapter, ScoutError};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Writes blobs into a directory and links them under a public URL prefix.
pub struct LocalBlobStore {
    root: PathBuf,
    public_url: String,
}

impl LocalBlobStore {
    /// `public_url` is the absolute URL the directory is served at, e.g.
    /// `http://127.0.0.1:3000/media`.
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Builds a store from the `[media]` section and the server's base URL.
    pub fn from_config(config: &MediaConfig, base_url: &str) -> Self {
        let public_url = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            config.url_prefix.trim_matches('/')
        );
        Self::new(&config.upload_dir, public_url)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PluginAdapter for LocalBlobStore {
    fn name(&self) -> &str {
        "local-blob"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Blob
    }

    async fn health_check(&self) -> Result<HealthStatus, ScoutError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            // Created lazily on first upload.
            Err(_) => Ok(HealthStatus::Degraded(format!(
                "{} does not exist yet",
                self.root.display()
            ))),
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredBlob, ScoutError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ScoutError::Internal(format!("invalid blob key `{key}`")));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(ScoutError::storage)?;
        let path = self.root.join(key);
        // Never replace an existing blob.
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(ScoutError::storage)?;
        file.write_all(bytes).await.map_err(ScoutError::storage)?;
        file.flush().await.map_err(ScoutError::storage)?;
        debug!(path = %path.display(), content_type, "blob written");

        Ok(StoredBlob {
            key: key.to_string(),
            url: format!("{}/{key}", self.public_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediaIngestor;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn put_writes_file_and_returns_url() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("media"), "http://localhost:3000/media/");

        let blob = store.put("pest-1-a.png", "image/png", b"png").await.unwrap();
        assert_eq!(blob.url, "http://localhost:3000/media/pest-1-a.png");
        let written = std::fs::read(dir.path().join("media/pest-1-a.png")).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn put_rejects_path_like_keys() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://x/media");
        assert!(store.put("../escape", "image/png", b"x").await.is_err());
    }

    #[tokio::test]
    async fn put_refuses_to_overwrite_existing_key() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://x/media");

        store.put("same.jpg", "image/jpeg", b"first").await.unwrap();
        let err = store.put("same.jpg", "image/jpeg", b"second").await.unwrap_err();
        assert!(matches!(err, ScoutError::Storage { .. }));
        assert_eq!(std::fs::read(dir.path().join("same.jpg")).unwrap(), b"first");
    }

    #[tokio::test]
    async fn from_config_joins_base_url_and_prefix() {
        let dir = tempdir().unwrap();
        let config = MediaConfig {
            upload_dir: dir.path().to_string_lossy().into_owned(),
            ..MediaConfig::default()
        };
        let store = LocalBlobStore::from_config(&config, "https://leads.example.com/");
        let blob = store.put("k.jpg", "image/jpeg", b"j").await.unwrap();
        assert_eq!(blob.url, "https://leads.example.com/media/k.jpg");
    }

    #[tokio::test]
    async fn health_reports_missing_directory_as_degraded() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("later"), "http://x/media");
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
        store.put("a.png", "image/png", b"a").await.unwrap();
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn ingestor_stores_valid_upload() {
        let dir = tempdir().unwrap();
        let store = Arc::new(LocalBlobStore::new(dir.path(), "http://x/media"));
        let ingestor = MediaIngestor::new(store, 20 * 1024 * 1024);

        let bytes = vec![7u8; 5 * 1024 * 1024];
        let media = ingestor.ingest("ants.png", "image/png", &bytes).await.unwrap();
        assert_eq!(media.filename, "ants.png");
        assert_eq!(media.size, bytes.len() as u64);
        assert!(media.url.starts_with("http://x/media/pest-assessment-"));
        assert!(media.url.ends_with("-ants.png"));

        let stored = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn ingestor_keeps_same_named_uploads_apart() {
        let dir = tempdir().unwrap();
        let store = Arc::new(LocalBlobStore::new(dir.path(), "http://x/media"));
        let ingestor = MediaIngestor::new(store, 1024);

        let mut urls = Vec::new();
        for round in 0..50 {
            let first = ingestor
                .ingest("photo.jpg", "image/jpeg", b"visitor-A")
                .await
                .unwrap();
            let second = ingestor
                .ingest("photo.jpg", "image/jpeg", b"visitor-B")
                .await
                .unwrap();
            assert_ne!(first.url, second.url, "round {round}");

            let on_disk = |url: &str| {
                let key = url.rsplit('/').next().unwrap().to_string();
                std::fs::read(dir.path().join(key)).unwrap()
            };
            assert_eq!(on_disk(&first.url), b"visitor-A");
            assert_eq!(on_disk(&second.url), b"visitor-B");
            urls.push(first.url);
            urls.push(second.url);
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), urls.len());
    }

    #[tokio::test]
    async fn ingestor_rejects_pdf_without_writing() {
        let dir = tempdir().unwrap();
        let store = Arc::new(LocalBlobStore::new(dir.path(), "http://x/media"));
        let ingestor = MediaIngestor::new(store, 1024);

        let err = ingestor
            .ingest("report.pdf", "application/pdf", b"%PDF")
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::Media { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `scout serve` command implementation.
//!
//! Opens SQLite storage, connects the Anthropic model, prepares the media
//! store, and runs the gateway until SIGINT or SIGTERM.

use std::sync::Arc;
use std::time::Instant;

use scout_agent::{Orchestrator, OrchestratorConfig};
use scout_anthropic::AnthropicModel;
use scout_config::model::ScoutConfig;
use scout_core::{PluginAdapter, ScoutError};
use scout_gateway::{AppState, GatewayConfig, HealthState};
use scout_media::{LocalBlobStore, MediaIngestor};
use scout_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Runs the `scout serve` command.
pub async fn run_serve(config: ScoutConfig) -> Result<(), ScoutError> {
    info!("starting scout serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    let model = Arc::new(AnthropicModel::new(&config.anthropic).inspect_err(|_| {
        eprintln!(
            "error: Anthropic API key required. Set `anthropic.api_key` in scout.toml or the ANTHROPIC_API_KEY env var"
        );
    })?);

    let blobs = Arc::new(LocalBlobStore::from_config(
        &config.media,
        &config.server.base_url(),
    ));
    if let Err(e) = tokio::fs::create_dir_all(blobs.root()).await {
        warn!(path = %blobs.root().display(), error = %e, "could not create media directory");
    }
    let ingestor = MediaIngestor::new(blobs.clone(), config.media.max_upload_bytes);

    let orchestrator = Arc::new(Orchestrator::new(
        model.clone(),
        storage.clone(),
        storage.clone(),
        OrchestratorConfig::from_config(&config),
    ));

    let components: Vec<Arc<dyn PluginAdapter>> = vec![
        storage.clone() as Arc<dyn PluginAdapter>,
        blobs as Arc<dyn PluginAdapter>,
        model as Arc<dyn PluginAdapter>,
    ];
    let state = AppState {
        orchestrator,
        leads: storage.clone(),
        transcripts: storage.clone(),
        ingestor,
        health: HealthState {
            start_time: Instant::now(),
            components,
        },
    };

    let gateway_config = GatewayConfig::from_config(&config);
    scout_gateway::start_server(&gateway_config, state, shutdown::signal()).await?;

    // Background transcript writes may still be in flight; the checkpoint
    // only flushes what has landed.
    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }

    info!("scout serve shutdown complete");
    Ok(())
}

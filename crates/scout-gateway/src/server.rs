// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use scout_agent::Orchestrator;
use scout_config::model::ScoutConfig;
use scout_core::{LeadStore, PluginAdapter, ScoutError, TranscriptStore};
use scout_media::MediaIngestor;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::handlers;
use crate::upload;

/// Health state for the `/health` endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Adapters whose health is reported.
    pub components: Vec<Arc<dyn PluginAdapter>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub leads: Arc<dyn LeadStore>,
    pub transcripts: Arc<dyn TranscriptStore>,
    pub ingestor: MediaIngestor,
    pub health: HealthState,
}

/// Listener, CORS, and media settings for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
    /// Directory served read-only under `media_prefix`.
    pub media_dir: String,
    pub media_prefix: String,
    pub max_upload_bytes: u64,
}

impl GatewayConfig {
    pub fn from_config(config: &ScoutConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            cors_origins: config.server.cors_origins.clone(),
            media_dir: config.media.upload_dir.clone(),
            media_prefix: config.media.url_prefix.clone(),
            max_upload_bytes: config.media.max_upload_bytes,
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the full application router.
///
/// - `GET /health`
/// - `POST /api/...` lead, chat, transcript, and upload endpoints
/// - `GET {media_prefix}/{name}` stored uploads
pub fn router(state: AppState, config: &GatewayConfig) -> Router {
    // Headroom for multipart framing; the file size itself is enforced by the ingestor.
    let body_limit = usize::try_from(config.max_upload_bytes.saturating_mul(2))
        .unwrap_or(usize::MAX)
        .saturating_add(1024 * 1024);

    let api_routes = Router::new()
        .route("/api/create-session", post(handlers::create_session))
        .route("/api/chat", post(handlers::chat))
        .route("/api/update-lead", post(handlers::update_lead))
        .route("/api/finalize-lead", post(handlers::finalize_lead))
        .route("/api/save-lead", post(handlers::save_lead))
        .route(
            "/api/save-session-summary",
            post(handlers::save_session_summary),
        )
        .route("/api/save-assessment", post(handlers::save_assessment))
        .route("/api/get-chat-history", get(handlers::get_chat_history))
        .route("/api/save-chat-message", post(handlers::save_chat_message))
        .route(
            "/api/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/health", get(handlers::get_health))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .nest_service(&config.media_prefix, ServeDir::new(&config.media_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
}

/// Binds the listener and serves until `shutdown` resolves.
pub async fn start_server<F>(
    config: &GatewayConfig,
    state: AppState,
    shutdown: F,
) -> Result<(), ScoutError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(state, config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ScoutError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ScoutError::Internal(format!("gateway server error: {e}")))?;

    info!("gateway stopped");
    Ok(())
}

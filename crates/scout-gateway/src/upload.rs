// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multipart upload endpoint for pest photos and videos.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scout_core::ScoutError;
use serde_json::json;
use tracing::{error, info};

use crate::server::AppState;

const FILE_FIELD: &str = "file";

fn upload_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// POST /api/upload
///
/// Expects a multipart `file` field and answers `{url, filename, size, type}`.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut file = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(FILE_FIELD) {
                    continue;
                }
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        file = Some((filename, content_type, bytes));
                        break;
                    }
                    Err(e) => return upload_error(e.status(), &e.body_text()),
                }
            }
            Ok(None) => break,
            Err(e) => return upload_error(e.status(), &e.body_text()),
        }
    }

    let Some((filename, content_type, bytes)) = file else {
        return upload_error(StatusCode::BAD_REQUEST, "No file provided");
    };

    match state.ingestor.ingest(&filename, &content_type, &bytes).await {
        Ok(media) => {
            info!(url = %media.url, size = media.size, "upload stored");
            Json(media).into_response()
        }
        Err(ScoutError::Media { message }) => upload_error(StatusCode::BAD_REQUEST, &message),
        Err(e) => {
            error!(filename = %filename, error = %e, "upload failed");
            upload_error(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed")
        }
    }
}

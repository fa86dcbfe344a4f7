use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::state::AppState;

const CONTENT_TYPE: &str = "audio/wav";

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub recording: Option<String>,
}

fn is_valid_recording_id(recording_id: &str) -> bool {
    !recording_id.is_empty()
        && !recording_id.contains("..")
        && !recording_id.contains('/')
        && !recording_id.contains('\\')
}

/// Serve a downloaded recording as `{audio_dir}/{recording}.wav`
///
/// Used as the playback URL for test clips. Not part of the call state
/// machine, so it answers with ordinary 4xx errors.
pub async fn serve_recording(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AudioQuery>,
) -> Response {
    let Some(recording_id) = query.recording.filter(|id| is_valid_recording_id(id)) else {
        error!("Invalid or missing recording id for audio request");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid recording id"})),
        )
            .into_response();
    };

    let path = state.config.audio_dir.join(format!("{recording_id}.wav"));
    debug!(path = %path.display(), "Serving recording");

    let body = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(recording_id, "Recording not found");
            return (
                StatusCode::NOT_FOUND,
                Json(json!({"error": format!("Recording not found: {}", recording_id)})),
            )
                .into_response();
        }
        Err(e) => {
            error!(recording_id, "Failed to read recording: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to read recording"})),
            )
                .into_response();
        }
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE));
    if let Ok(len) = HeaderValue::from_str(&body.len().to_string()) {
        headers.insert(header::CONTENT_LENGTH, len);
    }

    (StatusCode::OK, headers, body).into_response()
}

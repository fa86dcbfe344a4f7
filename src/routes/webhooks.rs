//! Provider-facing routes
//!
//! Every route accepts both GET and POST since the callback method is chosen in
//! the provider-side configuration.

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::handlers::{audio, voice, webhook};
use crate::state::AppState;
use std::sync::Arc;

/// Create the webhook router
///
/// # Endpoints
///
/// - `/incoming-call` - playback markup for a connecting call
/// - `/webhook` - call progress and AMD result notifications
/// - `/audio.wav?recording=<id>` - recording download
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/incoming-call",
            get(voice::incoming_call).post(voice::incoming_call),
        )
        .route("/webhook", get(webhook::call_status).post(webhook::call_status))
        .route(
            "/audio.wav",
            get(audio::serve_recording).post(audio::serve_recording),
        )
        .layer(TraceLayer::new_for_http())
}

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    response::Response,
};
use bytes::Bytes;
use tracing::{info, warn};

use super::params::WebhookParams;
use crate::core::{CallEvent, now_timestamp};
use crate::state::AppState;
use crate::utils::twiml;

/// Connect webhook: tell the provider which clip to play on this call.
///
/// The first request for a call binds it to the current clip; redeliveries
/// resolve to the same clip and only add another log row. The response is
/// always `200` with valid markup, even when nothing can be played.
pub async fn incoming_call(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let params = WebhookParams::parse(query.as_deref(), &body);
    let call_sid = params.get("CallSid").unwrap_or_default();

    let clip = state.orchestrator.resolve(call_sid);
    info!(call_sid, clip = %clip, "Incoming call");

    let timestamp = params.owned("Timestamp").unwrap_or_else(now_timestamp);
    state
        .record_event(CallEvent::inbound(timestamp, call_sid, &clip))
        .await;

    if clip.is_empty() {
        warn!(call_sid, "No clip available for incoming call");
        return twiml::respond(twiml::empty());
    }
    twiml::respond(twiml::play(clip.as_str()))
}

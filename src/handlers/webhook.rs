use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    response::Response,
};
use bytes::Bytes;
use tracing::{debug, info, warn};

use super::params::WebhookParams;
use crate::core::{AnsweredBy, CallEvent, CallStatus, LaunchOutcome, now_timestamp};
use crate::state::AppState;
use crate::utils::twiml;

/// Status webhook: call progress events and AMD verdicts.
///
/// Every delivery is logged, whatever it contains. Unknown calls are logged
/// against an empty clip and never registered. The first `completed` status
/// for a call advances the run to the next clip; repeats do not. Other
/// terminal statuses only advance with `advance_on_any_terminal`.
pub async fn call_status(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let params = WebhookParams::parse(query.as_deref(), &body);
    let call_sid = params.get("CallSid").unwrap_or_default();
    let call_status = params.get("CallStatus");
    let answered_by = params.get("AnsweredBy");
    let sequence = params.get("SequenceNumber");
    let callback_source = params.get_any(&["CallbackSource", "callbacksource"]);

    let clip = state.orchestrator.lookup(call_sid);

    state
        .record_event(CallEvent {
            timestamp: params.owned("Timestamp").unwrap_or_else(now_timestamp),
            call_sid: call_sid.to_string(),
            clip: clip.clone(),
            sequence: sequence.map(str::to_string),
            call_status: call_status.map(str::to_string),
            answered_by: answered_by.map(str::to_string),
            callback_source: callback_source.map(str::to_string),
        })
        .await;

    if let Some(verdict) = answered_by.map(AnsweredBy::parse) {
        info!(call_sid, clip = %clip, answered_by = %verdict.label(), "AMD verdict");
    }

    match call_status.map(CallStatus::parse) {
        Some(CallStatus::Completed) => {
            info!(call_sid, sequence, clip = %clip, "Call completed");
            advance(&state, call_sid);
        }
        Some(status) if status.is_terminal() => {
            if state.config.advance_on_any_terminal {
                info!(call_sid, status = %status, clip = %clip, "Call ended without completing");
                advance(&state, call_sid);
            } else {
                warn!(
                    call_sid,
                    status = %status,
                    clip = %clip,
                    "Call ended without completing; run will not advance (set ADVANCE_ON_ANY_TERMINAL to move on)"
                );
            }
        }
        Some(status) => {
            info!(call_sid, sequence, status = %status, source = callback_source, "Call progress");
        }
        None => debug!(call_sid, source = callback_source, "Callback without call status"),
    }

    twiml::respond(twiml::empty())
}

fn advance(state: &AppState, call_sid: &str) {
    if call_sid.is_empty() {
        warn!("Completed event without CallSid, not advancing");
        return;
    }
    match state.orchestrator.on_call_completed(call_sid) {
        Some(LaunchOutcome::Launched(next)) => {
            info!(call_sid, next = %next, "Advancing to next clip");
        }
        Some(LaunchOutcome::Exhausted) => {
            info!(call_sid, "No clips left to test");
        }
        None => {}
    }
}

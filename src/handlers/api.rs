use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::state::AppState;

/// Health check with a summary of the test run.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let snapshot = state.orchestrator.snapshot();
    Json(json!({
        "status": "OK",
        "pending": snapshot.pending,
        "registered_calls": snapshot.registered_calls,
        "completed_calls": snapshot.completed_calls,
        "current_clip": snapshot.current_clip,
        "run_complete": snapshot.run_complete,
    }))
}

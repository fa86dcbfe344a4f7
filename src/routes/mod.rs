pub mod api;
pub mod webhooks;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Full application router with state attached
pub fn create_app(state: Arc<AppState>) -> Router {
    webhooks::create_webhook_router()
        .merge(api::create_api_router())
        .with_state(state)
}

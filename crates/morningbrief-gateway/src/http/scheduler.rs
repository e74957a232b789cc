use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use morningbrief_core::config::REFERENCE_TIMEZONE;

use crate::app::AppState;

/// GET /api/v1/scheduler/status — live registry contents, for
/// reconciliation checks and debugging.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "running",
        "timezone": REFERENCE_TIMEZONE,
        "active_jobs": state.registry.len(),
        "chat_ids": state.registry.list_active(),
    }))
}

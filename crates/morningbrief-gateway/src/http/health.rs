use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::app::AppState;

/// GET /health — liveness plus a database probe.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.ping() {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "timestamp": Utc::now().to_rfc3339(),
                "database": "connected",
            })),
        ),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "timestamp": Utc::now().to_rfc3339(),
                    "database": "disconnected",
                    "error": e.to_string(),
                })),
            )
        }
    }
}

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use morningbrief_pipeline::{BriefingResult, PipelineError};

use crate::app::AppState;

#[derive(Debug, Deserialize)]
pub struct BriefingRequest {
    pub categories: Vec<String>,
}

/// GET /api/v1/categories — the category labels a subscriber may pick.
pub async fn categories(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "categories": state.config.categories.available,
        "max_categories": state.config.categories.max_per_user,
    }))
}

/// POST /api/v1/briefing — on-demand generation for an explicit category
/// list, bypassing the subscriber registry.
pub async fn briefing(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BriefingRequest>,
) -> Result<Json<BriefingResult>, (StatusCode, Json<Value>)> {
    if req.categories.is_empty() {
        return Err(bad_request("at least one category is required"));
    }
    if req.categories.len() > state.config.categories.max_per_user {
        return Err(bad_request("too many categories"));
    }
    for category in &req.categories {
        if !state.config.categories.available.contains(category) {
            return Err(bad_request(&format!("unknown category: {category}")));
        }
    }

    match state.pipeline.produce_briefing(&req.categories).await {
        Ok(result) => Ok(Json(result)),
        Err(PipelineError::NoArticles) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({"error": "no articles matched the requested categories"})),
        )),
        Err(e) => Err((
            StatusCode::BAD_GATEWAY,
            Json(json!({"error": e.to_string()})),
        )),
    }
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({"error": message})))
}

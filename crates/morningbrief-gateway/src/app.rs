use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use morningbrief_core::MorningBriefConfig;
use morningbrief_pipeline::ContentPipeline;
use morningbrief_scheduler::ScheduleRegistry;
use morningbrief_store::PreferenceStore;

use crate::http;

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub config: MorningBriefConfig,
    pub store: PreferenceStore,
    pub registry: Arc<ScheduleRegistry>,
    pub pipeline: Arc<dyn ContentPipeline>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(http::health::health))
        .route("/api/v1/categories", get(http::briefing::categories))
        .route("/api/v1/briefing", post(http::briefing::briefing))
        .route("/api/v1/scheduler/status", get(http::scheduler::status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

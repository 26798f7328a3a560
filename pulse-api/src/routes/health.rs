//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    articles: usize,
    stale: bool,
    enabled_sources: usize,
    checked_at: DateTime<Utc>,
}

/// Health check handler
///
/// Degraded when every source is disabled.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let service = &state.news_service;
    let enabled_sources = service
        .get_news_sources()
        .iter()
        .filter(|s| s.enabled)
        .count();
    let articles = service.article_count();

    let healthy = enabled_sources > 0;
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        articles,
        stale: service.is_stale(),
        enabled_sources,
        checked_at: Utc::now(),
    };

    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}

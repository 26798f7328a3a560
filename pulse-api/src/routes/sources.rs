//! Source management endpoints

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use super::error_response;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sources", get(list_sources))
        .route("/sources/stats", get(source_stats))
        .route("/sources/{name}/enable", post(enable_source))
        .route("/sources/{name}/disable", post(disable_source))
}

async fn list_sources(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.news_service.get_news_sources())
}

async fn source_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.news_service.get_source_stats())
}

async fn enable_source(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.news_service.enable_source(&name) {
        Ok(source) => Json(source).into_response(),
        Err(e) => error_response(e.into()),
    }
}

async fn disable_source(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.news_service.disable_source(&name) {
        Ok(source) => Json(source).into_response(),
        Err(e) => error_response(e.into()),
    }
}

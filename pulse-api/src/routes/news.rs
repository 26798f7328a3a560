//! News-related API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use pulse_core::{Article, ArticleSort, NewArticle, PulseError};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error_response;
use crate::AppState;

/// Query parameters for listing news
#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    /// created_date (default), sentiment_score, impact_level or relevance_score
    pub sort: Option<String>,
    /// Maximum number of results
    pub limit: Option<usize>,
}

/// Query parameters for age cleanup
#[derive(Debug, Deserialize)]
pub struct CleanupQuery {
    pub days: Option<u32>,
}

/// Response for listing news
#[derive(Debug, Serialize)]
pub struct NewsResponse {
    pub articles: Vec<Article>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub deleted: usize,
}

/// Create news routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_news).post(create_article))
        .route("/news/refresh", post(refresh_news))
        .route("/news/sentiment", get(get_sentiment))
        .route("/news/old", delete(delete_old_news))
        .route("/news/cache", delete(clear_cache))
        .route("/news/{id}", get(get_article))
}

/// GET /api/news - Stored articles, refreshed in the background when stale
async fn list_news(
    State(state): State<AppState>,
    Query(params): Query<NewsQuery>,
) -> impl IntoResponse {
    let sort = match params.sort.as_deref() {
        None => ArticleSort::default(),
        Some(raw) => match raw.parse::<ArticleSort>() {
            Ok(sort) => sort,
            Err(e) => return error_response(PulseError::parse(e)),
        },
    };

    let articles = state.news_service.list(sort, params.limit);
    let count = articles.len();
    (StatusCode::OK, Json(NewsResponse { articles, count })).into_response()
}

/// POST /api/news - Score and store a hand-entered article
async fn create_article(
    State(state): State<AppState>,
    Json(article): Json<NewArticle>,
) -> impl IntoResponse {
    match state.news_service.create_article(article) {
        Ok(article) => (StatusCode::CREATED, Json(article)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// GET /api/news/{id}
async fn get_article(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.news_service.get_article(&id) {
        Ok(article) => (StatusCode::OK, Json(article)).into_response(),
        Err(e) => error_response(e.into()),
    }
}

/// POST /api/news/refresh - Run a refresh cycle now
async fn refresh_news(State(state): State<AppState>) -> impl IntoResponse {
    let articles = state.news_service.update_news().await;
    let count = articles.len();
    info!("Manual refresh returned {} articles", count);
    (StatusCode::OK, Json(NewsResponse { articles, count }))
}

/// GET /api/news/sentiment - Summary over the most recent articles
async fn get_sentiment(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.news_service.get_sentiment_summary())
}

/// DELETE /api/news/old?days=N - Remove articles older than N days
async fn delete_old_news(
    State(state): State<AppState>,
    Query(params): Query<CleanupQuery>,
) -> impl IntoResponse {
    let days = params
        .days
        .unwrap_or(state.news_service.config().retention_days);
    let deleted = state.news_service.delete_old_news(days);
    Json(CleanupResponse { deleted })
}

/// DELETE /api/news/cache - Empty the store
async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.news_service.clear_cache();
    StatusCode::NO_CONTENT
}

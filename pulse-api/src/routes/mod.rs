//! API route definitions

mod health;
mod news;
mod sources;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use pulse_core::PulseError;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map a pipeline error onto an HTTP status and JSON body
pub fn error_response(err: PulseError) -> Response {
    let status = match &err {
        PulseError::NotFound(_) => StatusCode::NOT_FOUND,
        PulseError::Parse(_) => StatusCode::BAD_REQUEST,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(news::routes())
        .merge(sources::routes())
        .merge(health::routes())
}

/// Full application: `/api` routes with CORS for the dashboard
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", api_routes())
        .layer(cors)
        .with_state(state)
}

//! REST API endpoints.
//!
//! Axum-based HTTP API for querying the aggregated match tables and
//! requesting team suggestions.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// All API routes with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(routes::catalog::status))
        .route("/api/items", get(routes::catalog::items))
        .route("/api/augments", get(routes::catalog::augments))
        .route("/api/units", get(routes::catalog::units))
        .route("/api/units/:unit", get(routes::units::unit_detail))
        .route("/api/compositions", get(routes::compositions::overview))
        .route(
            "/api/compositions/augments",
            get(routes::compositions::augments),
        )
        .route("/api/compositions/damage", get(routes::compositions::damage))
        .route("/api/suggestions", post(routes::suggestions::suggest))
        .route("/api/refresh", post(routes::refresh::start_refresh))
        .route("/api/refresh/status", get(routes::refresh::status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS layer for a configured origin; `*` allows any origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        Err(_) => {
            warn!("Ignoring invalid CORS origin {:?}", origin);
            CorsLayer::new()
        }
    }
}

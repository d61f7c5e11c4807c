//! REST API endpoints.
//!
//! Axum-based HTTP API for recording games and penalties and for the
//! statistics, dashboard and recap views.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};

use crate::models::ValidationError;
use crate::storage::StorageError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

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
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
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

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        error!("Storage failure: {}", e);
        ApiError::Internal(e.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        warn!("Rejected write: {}", e);
        ApiError::BadRequest(e.to_string())
    }
}

/// CORS for the configured origin; `*` allows any origin.
fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        "*" => layer.allow_origin(Any),
        origin => match HeaderValue::from_str(origin) {
            Ok(value) => layer.allow_origin(value),
            Err(_) => {
                warn!("Invalid CORS origin {:?}, allowing any origin", origin);
                layer.allow_origin(Any)
            }
        },
    }
}

async fn health() -> &'static str {
    "ok"
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        // Games
        .route(
            "/api/games",
            get(routes::games::list_games)
                .post(routes::games::create_game)
                .delete(routes::games::clear_games),
        )
        .route("/api/games/:id", delete(routes::games::delete_game))
        // Penalties
        .route(
            "/api/penalties",
            get(routes::penalties::list_penalties).post(routes::penalties::create_penalty),
        )
        .route(
            "/api/penalties/:id",
            delete(routes::penalties::delete_penalty),
        )
        // Statistics
        .route("/api/years", get(routes::stats::list_years))
        .route("/api/stats", get(routes::stats::get_stats))
        .route("/api/stats/rank-up", get(routes::stats::get_rank_up))
        .route("/api/dashboard/events", get(routes::dashboard::get_events))
        .route("/api/recap/:year", get(routes::recap::get_recap))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let resp = ApiError::Forbidden("too old".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "FORBIDDEN");
        assert_eq!(json["error"]["message"], "Forbidden: too old");
    }

    #[tokio::test]
    async fn test_validation_error_maps_to_bad_request() {
        let resp = ApiError::from(ValidationError::TeamSize).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[test]
    fn test_storage_error_maps_to_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = ApiError::from(StorageError::from(io));
        assert!(matches!(err, ApiError::Internal(_)));
    }
}

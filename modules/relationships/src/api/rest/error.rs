use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::domain::error::DomainError;

/// REST error envelope for the follow graph.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            DomainError::UserNotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "User not found" })),
            )
                .into_response(),
            DomainError::SelfFollow => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "errors": [{ "field": "followed_id", "message": "can't follow yourself" }]
                })),
            )
                .into_response(),
            DomainError::DuplicateEdge { .. } => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "errors": [{ "field": "followed_id", "message": "is already followed" }]
                })),
            )
                .into_response(),
            DomainError::Database { message } => {
                error!("Database error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::domain::error::DomainError;

/// REST error envelope for microposts.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    Forbidden(String),
}

impl ApiError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(DomainError::Validation { errors }) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::Domain(DomainError::PostNotFound { .. }) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Micropost not found" })),
            )
                .into_response(),
            ApiError::Domain(DomainError::UserNotFound { .. }) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "User not found" })),
            )
                .into_response(),
            ApiError::Domain(DomainError::Database { message }) => {
                error!("Database error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                Json(serde_json::json!({ "error": message })),
            )
                .into_response(),
        }
    }
}

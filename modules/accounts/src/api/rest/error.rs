use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::domain::error::DomainError;

/// REST error envelope: maps domain errors to status codes with JSON
/// bodies a form client can consume.
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    Message { status: StatusCode, message: String },
}

impl ApiError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Message {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Message {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Message {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Message {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
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
            ApiError::Domain(DomainError::EmailTaken { .. }) => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({
                    "errors": [{ "field": "email", "message": "has already been taken" }]
                })),
            )
                .into_response(),
            ApiError::Domain(DomainError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "error": "Invalid email/password combination." })),
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
            ApiError::Message { status, message } => {
                (status, Json(serde_json::json!({ "error": message }))).into_response()
            }
        }
    }
}

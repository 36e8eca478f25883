use thiserror::Error;
use uuid::Uuid;
use validation::FieldError;

/// Domain-specific errors using thiserror.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Micropost not found: {id}")]
    PostNotFound { id: Uuid },

    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn post_not_found(id: Uuid) -> Self {
        Self::PostNotFound { id }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

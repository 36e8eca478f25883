use thiserror::Error;
use uuid::Uuid;
use validation::FieldError;

/// Domain-specific errors using thiserror.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    /// Wrong email or wrong password; the caller cannot tell which.
    #[error("Invalid email/password combination")]
    InvalidCredentials,

    #[error("Email '{email}' has already been taken")]
    EmailTaken { email: String },

    #[error("Validation failed")]
    Validation { errors: Vec<FieldError> },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn email_taken(email: impl Into<String>) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
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

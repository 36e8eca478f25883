use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors using thiserror.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Already following user {followed_id}")]
    DuplicateEdge { followed_id: Uuid },

    #[error("Users cannot follow themselves")]
    SelfFollow,

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: Uuid) -> Self {
        Self::UserNotFound { id }
    }

    pub fn duplicate_edge(followed_id: Uuid) -> Self {
        Self::DuplicateEdge { followed_id }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

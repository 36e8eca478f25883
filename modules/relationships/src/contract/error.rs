use thiserror::Error;
use uuid::Uuid;

/// Errors that are safe to expose to other modules.
#[derive(Error, Debug, Clone)]
pub enum RelationshipsError {
    #[error("User not found: {id}")]
    UserNotFound { id: Uuid },

    #[error("Already following user {followed_id}")]
    DuplicateEdge { followed_id: Uuid },

    #[error("Users cannot follow themselves")]
    SelfFollow,

    #[error("Internal error")]
    Internal,
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Pure follow-edge model for inter-module communication (no serde).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Pure micropost model (no serde/schemars).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Micropost {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

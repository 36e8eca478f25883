use async_trait::async_trait;
use uuid::Uuid;

/// Public API of the relationships module that other modules can use.
#[async_trait]
pub trait RelationshipsApi: Send + Sync {
    /// The ids of every user `user_id` follows.
    async fn followed_ids(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>>;

    /// Whether `follower_id` currently follows `followed_id`.
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<bool>;
}

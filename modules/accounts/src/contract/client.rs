use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::User;

/// Public API of the accounts module that other modules can use.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Get a user by ID.
    async fn get_user(&self, id: Uuid) -> anyhow::Result<User>;

    /// Check that a user id refers to an existing account.
    async fn user_exists(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Load the users for a set of ids, in no particular order. Unknown
    /// ids are skipped.
    async fn users_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>>;
}

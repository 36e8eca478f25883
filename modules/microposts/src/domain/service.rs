use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};
use uuid::Uuid;
use validation::Validator;

use accounts::contract::client::AccountsApi;
use relationships::contract::client::RelationshipsApi;

use crate::contract::model::Micropost;
use crate::domain::error::DomainError;
use crate::infra::storage::entity::{self, NewMicropostEntity};
use crate::infra::storage::mapper::entity_to_contract;

/// Domain service for microposts and the home feed.
#[derive(Clone)]
pub struct Service {
    db: DatabaseConnection,
    accounts: Arc<dyn AccountsApi>,
    relationships: Arc<dyn RelationshipsApi>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_content_length: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_content_length: 140,
            default_page_size: 50,
            max_page_size: 100,
        }
    }
}

impl Service {
    pub fn new(
        db: DatabaseConnection,
        accounts: Arc<dyn AccountsApi>,
        relationships: Arc<dyn RelationshipsApi>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            db,
            accounts,
            relationships,
            config,
        }
    }

    /// Post a micropost as `user_id`.
    #[instrument(name = "microposts.service.create_post", skip(self, content), fields(user_id = %user_id))]
    pub async fn create_post(
        &self,
        user_id: Uuid,
        content: String,
    ) -> Result<Micropost, DomainError> {
        self.validate_content(&content)?;

        let created = entity::create(
            &self.db,
            NewMicropostEntity {
                id: Uuid::new_v4(),
                user_id,
                content,
                created_at: Utc::now(),
            },
        )
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Micropost created: {}", created.id);
        Ok(entity_to_contract(created))
    }

    #[instrument(name = "microposts.service.get_post", skip(self), fields(post_id = %id))]
    pub async fn get_post(&self, id: Uuid) -> Result<Micropost, DomainError> {
        let post = entity::find_by_id(&self.db, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::post_not_found(id))?;
        Ok(entity_to_contract(post))
    }

    #[instrument(name = "microposts.service.delete_post", skip(self), fields(post_id = %id))]
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = entity::delete(&self.db, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if !deleted {
            return Err(DomainError::post_not_found(id));
        }

        info!("Micropost deleted");
        Ok(())
    }

    /// A user's own posts, newest first.
    #[instrument(name = "microposts.service.posts_by_user", skip(self))]
    pub async fn posts_by_user(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Micropost>, DomainError> {
        let exists = self
            .accounts
            .user_exists(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !exists {
            return Err(DomainError::user_not_found(user_id));
        }

        let (limit, offset) = self.page(limit, offset);
        let posts = entity::find_by_author(&self.db, user_id, limit, offset)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(posts.into_iter().map(entity_to_contract).collect())
    }

    /// The home feed: the user's own posts plus everyone they follow,
    /// newest first. One author-set query — never a per-followee loop.
    #[instrument(name = "microposts.service.feed", skip(self), fields(user_id = %user_id))]
    pub async fn feed(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Micropost>, DomainError> {
        let mut author_ids = self
            .relationships
            .followed_ids(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        // The feed always includes the user's own posts, follows or not.
        author_ids.push(user_id);

        let (limit, offset) = self.page(limit, offset);
        let posts = entity::find_by_authors(&self.db, &author_ids, limit, offset)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(posts.into_iter().map(entity_to_contract).collect())
    }

    fn page(&self, limit: Option<u32>, offset: Option<u32>) -> (u32, u32) {
        (
            limit
                .unwrap_or(self.config.default_page_size)
                .min(self.config.max_page_size),
            offset.unwrap_or(0),
        )
    }

    fn validate_content(&self, content: &str) -> Result<(), DomainError> {
        let mut v = Validator::new();
        v.presence("content", content)
            .length_max("content", content, self.config.max_content_length);
        v.finish().map_err(DomainError::validation)
    }
}

use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use accounts::contract::{client::AccountsApi, model::User};

use crate::contract::model::Relationship;
use crate::domain::error::DomainError;
use crate::infra::storage::entity::{self, NewEdgeEntity};
use crate::infra::storage::mapper::entity_to_contract;

/// Domain service for the follow graph.
#[derive(Clone)]
pub struct Service {
    db: DatabaseConnection,
    accounts: Arc<dyn AccountsApi>,
    config: ServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 100,
        }
    }
}

impl Service {
    pub fn new(db: DatabaseConnection, accounts: Arc<dyn AccountsApi>, config: ServiceConfig) -> Self {
        Self {
            db,
            accounts,
            config,
        }
    }

    /// Insert a follow edge. Rejects self-follow, unknown followed user
    /// and duplicate edges.
    #[instrument(name = "relationships.service.follow", skip(self))]
    pub async fn follow(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<Relationship, DomainError> {
        if follower_id == followed_id {
            return Err(DomainError::SelfFollow);
        }

        let exists = self
            .accounts
            .user_exists(followed_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if !exists {
            return Err(DomainError::user_not_found(followed_id));
        }

        if entity::edge_exists(&self.db, follower_id, followed_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::duplicate_edge(followed_id));
        }

        let created = entity::create(
            &self.db,
            NewEdgeEntity {
                id: Uuid::new_v4(),
                follower_id,
                followed_id,
                created_at: Utc::now(),
            },
        )
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        info!("User {follower_id} now follows {followed_id}");
        Ok(entity_to_contract(created))
    }

    /// Delete a follow edge. A missing edge is a no-op: unfollow is
    /// idempotent.
    #[instrument(name = "relationships.service.unfollow", skip(self))]
    pub async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), DomainError> {
        let removed = entity::delete_edge(&self.db, follower_id, followed_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if removed {
            info!("User {follower_id} unfollowed {followed_id}");
        } else {
            debug!("Unfollow with no edge: {follower_id} -> {followed_id}");
        }
        Ok(())
    }

    pub async fn is_following(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, DomainError> {
        entity::edge_exists(&self.db, follower_id, followed_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// Everyone `user_id` follows.
    pub async fn followed_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DomainError> {
        entity::followed_ids(&self.db, user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }

    /// The users `user_id` follows, in follow order.
    #[instrument(name = "relationships.service.following", skip(self))]
    pub async fn following(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<User>, DomainError> {
        self.ensure_user(user_id).await?;
        let (limit, offset) = self.page(limit, offset);

        let ids = entity::followed_ids_paginated(&self.db, user_id, limit, offset)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.users_in_order(&ids).await
    }

    /// The users following `user_id`, in follow order.
    #[instrument(name = "relationships.service.followers", skip(self))]
    pub async fn followers(
        &self,
        user_id: Uuid,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<User>, DomainError> {
        self.ensure_user(user_id).await?;
        let (limit, offset) = self.page(limit, offset);

        let ids = entity::follower_ids_paginated(&self.db, user_id, limit, offset)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        self.users_in_order(&ids).await
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), DomainError> {
        let exists = self
            .accounts
            .user_exists(user_id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        if exists {
            Ok(())
        } else {
            Err(DomainError::user_not_found(user_id))
        }
    }

    fn page(&self, limit: Option<u32>, offset: Option<u32>) -> (u32, u32) {
        (
            limit
                .unwrap_or(self.config.default_page_size)
                .min(self.config.max_page_size),
            offset.unwrap_or(0),
        )
    }

    /// Fetch users for an id page, preserving the page's order.
    async fn users_in_order(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        let users = self
            .accounts
            .users_by_ids(ids)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        let mut by_id: std::collections::HashMap<Uuid, User> =
            users.into_iter().map(|u| (u.id, u)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}

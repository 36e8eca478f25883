use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{client::RelationshipsApi, error::RelationshipsError};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the RelationshipsApi trait that delegates to
/// the domain service.
pub struct RelationshipsLocalClient {
    service: Arc<Service>,
}

impl RelationshipsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RelationshipsApi for RelationshipsLocalClient {
    async fn followed_ids(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        self.service
            .followed_ids(user_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid) -> anyhow::Result<bool> {
        self.service
            .is_following(follower_id, followed_id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow.
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::UserNotFound { id } => RelationshipsError::UserNotFound { id },
        DomainError::DuplicateEdge { followed_id } => {
            RelationshipsError::DuplicateEdge { followed_id }
        }
        DomainError::SelfFollow => RelationshipsError::SelfFollow,
        DomainError::Database { .. } => RelationshipsError::Internal,
    };

    anyhow::Error::new(contract_error)
}

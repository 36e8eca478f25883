use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{client::AccountsApi, error::AccountsError, model::User};
use crate::domain::{error::DomainError, service::Service};

/// Local implementation of the AccountsApi trait that delegates to the
/// domain service.
pub struct AccountsLocalClient {
    service: Arc<Service>,
}

impl AccountsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AccountsApi for AccountsLocalClient {
    async fn get_user(&self, id: Uuid) -> anyhow::Result<User> {
        self.service
            .get_user(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn user_exists(&self, id: Uuid) -> anyhow::Result<bool> {
        self.service
            .user_exists(id)
            .await
            .map_err(map_domain_error_to_anyhow)
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> anyhow::Result<Vec<User>> {
        self.service
            .users_by_ids(ids)
            .await
            .map_err(map_domain_error_to_anyhow)
    }
}

/// Map domain errors to contract errors wrapped in anyhow.
fn map_domain_error_to_anyhow(domain_error: DomainError) -> anyhow::Error {
    let contract_error = match domain_error {
        DomainError::UserNotFound { id } => AccountsError::not_found(id),
        DomainError::EmailTaken { email } => AccountsError::email_taken(email),
        DomainError::Validation { errors } => AccountsError::validation(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        DomainError::InvalidCredentials => {
            AccountsError::validation("invalid credentials".to_string())
        }
        DomainError::Database { .. } => AccountsError::internal(),
    };

    anyhow::Error::new(contract_error)
}

use chrono::Utc;
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validation::{email_regex, Validator};

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::password;
use crate::infra::storage::entity::{self, NewUserEntity, UpdateUserEntity};
use crate::infra::storage::mapper::entity_to_contract;

/// Domain service with the account business rules: signup validation,
/// the uniqueness constraint, credential checks and profile updates.
#[derive(Clone)]
pub struct Service {
    db: DatabaseConnection,
    config: ServiceConfig,
}

/// Configuration for the domain service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub min_password_length: usize,
    pub max_password_length: usize,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 50,
            min_password_length: 6,
            max_password_length: 40,
            default_page_size: 50,
            max_page_size: 100,
        }
    }
}

impl Service {
    pub fn new(db: DatabaseConnection, config: ServiceConfig) -> Self {
        Self { db, config }
    }

    /// Register a new account. The email is normalized to lowercase so
    /// the unique index doubles as the case-insensitive constraint.
    #[instrument(name = "accounts.service.sign_up", skip(self, new_user), fields(email = %new_user.email))]
    pub async fn sign_up(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Signing up new user");

        self.validate_new_user(&new_user)?;

        let email = new_user.email.trim().to_lowercase();
        if entity::email_exists(&self.db, &email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Err(DomainError::email_taken(email));
        }

        let now = Utc::now();
        let salt = password::make_salt(&now, &new_user.password);
        let password_hash = password::encrypt(&salt, &new_user.password);

        let created = entity::create(
            &self.db,
            NewUserEntity {
                id: Uuid::new_v4(),
                name: new_user.name,
                email,
                password_hash,
                salt,
                admin: false,
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Created user with id={}", created.id);
        Ok(entity_to_contract(created))
    }

    /// Check credentials. Unknown email and wrong password are
    /// indistinguishable to the caller; neither ever panics.
    #[instrument(name = "accounts.service.authenticate", skip_all)]
    pub async fn authenticate(&self, email: &str, submitted: &str) -> Result<User, DomainError> {
        let email = email.trim().to_lowercase();
        let found = entity::find_by_email(&self.db, &email)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        match found {
            Some(user) if password::verify(&user.password_hash, &user.salt, submitted) => {
                debug!("Authenticated user id={}", user.id);
                Ok(entity_to_contract(user))
            }
            _ => Err(DomainError::InvalidCredentials),
        }
    }

    #[instrument(name = "accounts.service.get_user", skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        let user = entity::find_by_id(&self.db, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        Ok(entity_to_contract(user))
    }

    /// Identity lookup for the remember-token middleware: the user plus
    /// the stored salt the cookie claim must match. A missing user is
    /// Ok(None), never an error — forged cookies degrade to anonymous.
    pub async fn find_for_session(&self, id: Uuid) -> Result<Option<(User, String)>, DomainError> {
        let found = entity::find_by_id(&self.db, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(found.map(|m| {
            let salt = m.salt.clone();
            (entity_to_contract(m), salt)
        }))
    }

    #[instrument(name = "accounts.service.list_users", skip(self))]
    pub async fn list_users(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<User>, DomainError> {
        let limit = limit
            .unwrap_or(self.config.default_page_size)
            .min(self.config.max_page_size);
        let offset = offset.unwrap_or(0);

        let users = entity::find_paginated(&self.db, limit, offset)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(users.into_iter().map(entity_to_contract).collect())
    }

    pub async fn users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = entity::find_by_ids(&self.db, ids)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;
        Ok(users.into_iter().map(entity_to_contract).collect())
    }

    pub async fn user_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(entity::find_by_id(&self.db, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .is_some())
    }

    #[instrument(name = "accounts.service.update_user", skip(self, patch), fields(user_id = %id))]
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<User, DomainError> {
        info!("Updating user");

        self.validate_patch(&patch)?;

        let current = entity::find_by_id(&self.db, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let email = match patch.email {
            Some(raw) => {
                let email = raw.trim().to_lowercase();
                if email != current.email
                    && entity::email_exists(&self.db, &email)
                        .await
                        .map_err(|e| DomainError::database(e.to_string()))?
                {
                    return Err(DomainError::email_taken(email));
                }
                Some(email)
            }
            None => None,
        };

        let now = Utc::now();
        // A password change re-derives the salt, which also invalidates
        // every outstanding remember token for the account.
        let (salt, password_hash) = match patch.password.as_deref() {
            Some(new_password) => {
                let salt = password::make_salt(&now, new_password);
                let hash = password::encrypt(&salt, new_password);
                (Some(salt), Some(hash))
            }
            None => (None, None),
        };

        let updated = entity::update(
            &self.db,
            id,
            UpdateUserEntity {
                name: patch.name,
                email,
                password_hash,
                salt,
                updated_at: now,
            },
        )
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        Ok(entity_to_contract(updated))
    }

    #[instrument(name = "accounts.service.delete_user", skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), DomainError> {
        let deleted = entity::delete(&self.db, id)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Deleted user");
        Ok(())
    }

    /// Idempotent admin seeding at startup: reuses an existing account
    /// with the same email, otherwise creates one with the admin flag.
    #[instrument(name = "accounts.service.ensure_admin", skip(self, password), fields(email = %email))]
    pub async fn ensure_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        let normalized = email.trim().to_lowercase();
        if let Some(existing) = entity::find_by_email(&self.db, &normalized)
            .await
            .map_err(|e| DomainError::database(e.to_string()))?
        {
            return Ok(entity_to_contract(existing));
        }

        let new_user = NewUser {
            name: name.to_string(),
            email: normalized,
            password: password.to_string(),
            password_confirmation: password.to_string(),
        };
        self.validate_new_user(&new_user)?;

        let now = Utc::now();
        let salt = password::make_salt(&now, password);
        let password_hash = password::encrypt(&salt, password);

        let created = entity::create(
            &self.db,
            NewUserEntity {
                id: Uuid::new_v4(),
                name: new_user.name,
                email: new_user.email,
                password_hash,
                salt,
                admin: true,
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        info!("Seeded admin user id={}", created.id);
        Ok(entity_to_contract(created))
    }

    // --- validation ---

    fn validate_new_user(&self, new_user: &NewUser) -> Result<(), DomainError> {
        let mut v = Validator::new();
        v.presence("name", &new_user.name)
            .length_max("name", &new_user.name, self.config.max_name_length);
        v.presence("email", &new_user.email)
            .format("email", new_user.email.trim(), email_regex());
        v.length_range(
            "password",
            &new_user.password,
            self.config.min_password_length,
            self.config.max_password_length,
        )
        .confirmation(
            "password",
            &new_user.password,
            &new_user.password_confirmation,
        );
        v.finish().map_err(DomainError::validation)
    }

    fn validate_patch(&self, patch: &UserPatch) -> Result<(), DomainError> {
        let mut v = Validator::new();
        if let Some(ref name) = patch.name {
            v.presence("name", name)
                .length_max("name", name, self.config.max_name_length);
        }
        if let Some(ref email) = patch.email {
            v.presence("email", email)
                .format("email", email.trim(), email_regex());
        }
        if let Some(ref new_password) = patch.password {
            v.length_range(
                "password",
                new_password,
                self.config.min_password_length,
                self.config.max_password_length,
            )
            .confirmation(
                "password",
                new_password,
                patch.password_confirmation.as_deref().unwrap_or(""),
            );
        }
        v.finish().map_err(DomainError::validation)
    }
}

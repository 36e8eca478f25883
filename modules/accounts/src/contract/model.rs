use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Pure user model for inter-module communication (no serde/schemars).
/// Never carries the password hash or salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user. Exactly the fields a signup form may
/// set; the admin flag is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Partial update data for a user. A password change must come with its
/// confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// The request-scoped identity resolved from the remember-token cookie.
/// Threaded through request extensions by the identity middleware;
/// never stored globally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub admin: bool,
}

impl CurrentUser {
    /// Owner-or-admin access rule for mutating a resource owned by
    /// `owner_id`.
    pub fn can_modify(&self, owner_id: Uuid) -> bool {
        self.admin || self.id == owner_id
    }
}

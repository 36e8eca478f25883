use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use accounts::contract::model::User;

use crate::contract::model::Relationship;

/// REST DTO for a follow edge.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RelationshipDto {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub followed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Follow request: the follower is always the session user, so the body
/// carries only the target.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FollowReq {
    pub followed_id: Uuid,
}

/// Compact user representation for follower/following listings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// REST DTO for follower/following list responses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FollowListDto {
    pub users: Vec<UserSummaryDto>,
    pub total: usize,
    pub limit: u32,
    pub offset: u32,
}

/// REST DTO for query parameters.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListQuery {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl From<Relationship> for RelationshipDto {
    fn from(edge: Relationship) -> Self {
        Self {
            id: edge.id,
            follower_id: edge.follower_id,
            followed_id: edge.followed_id,
            created_at: edge.created_at,
        }
    }
}

impl From<User> for UserSummaryDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contract::model::Micropost;

/// REST DTO for a micropost.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MicropostDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Post request: the author is always the session user, so the body is
/// the content alone.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateMicropostReq {
    pub content: String,
}

/// REST DTO for post listings (feed and per-user pages).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MicropostListDto {
    pub microposts: Vec<MicropostDto>,
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

impl From<Micropost> for MicropostDto {
    fn from(post: Micropost) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            content: post.content,
            created_at: post.created_at,
        }
    }
}

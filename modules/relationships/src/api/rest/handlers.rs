use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use accounts::api::middleware::Authenticated;

use crate::api::rest::dto::{
    FollowListDto, FollowReq, ListQuery, RelationshipDto, UserSummaryDto,
};
use crate::api::rest::error::ApiError;
use crate::domain::service::Service;

/// Follow a user.
pub async fn create_relationship(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
    Json(req): Json<FollowReq>,
) -> Result<(StatusCode, Json<RelationshipDto>), ApiError> {
    let edge = svc.follow(current.id, req.followed_id).await?;
    Ok((StatusCode::CREATED, Json(RelationshipDto::from(edge))))
}

/// Unfollow a user. Idempotent: a missing edge still yields 204.
pub async fn delete_relationship(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
    Path(followed_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    svc.unfollow(current.id, followed_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Users the given user follows.
pub async fn list_following(
    Extension(svc): Extension<Arc<Service>>,
    _current: Authenticated,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<FollowListDto>, ApiError> {
    let users = svc
        .following(user_id, query.limit, query.offset)
        .await?;
    Ok(Json(to_list_dto(users, &query)))
}

/// Users following the given user.
pub async fn list_followers(
    Extension(svc): Extension<Arc<Service>>,
    _current: Authenticated,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<FollowListDto>, ApiError> {
    let users = svc
        .followers(user_id, query.limit, query.offset)
        .await?;
    Ok(Json(to_list_dto(users, &query)))
}

fn to_list_dto(users: Vec<accounts::contract::model::User>, query: &ListQuery) -> FollowListDto {
    let users: Vec<UserSummaryDto> = users.into_iter().map(UserSummaryDto::from).collect();
    FollowListDto {
        total: users.len(),
        limit: query.limit.unwrap_or(50),
        offset: query.offset.unwrap_or(0),
        users,
    }
}

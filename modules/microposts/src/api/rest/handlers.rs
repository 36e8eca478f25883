use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use accounts::api::middleware::Authenticated;

use crate::api::rest::dto::{CreateMicropostReq, ListQuery, MicropostDto, MicropostListDto};
use crate::api::rest::error::ApiError;
use crate::domain::service::Service;

/// Post a micropost as the session user.
pub async fn create_micropost(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
    Json(req): Json<CreateMicropostReq>,
) -> Result<(StatusCode, Json<MicropostDto>), ApiError> {
    let post = svc.create_post(current.id, req.content).await?;
    Ok((StatusCode::CREATED, Json(MicropostDto::from(post))))
}

/// Delete a micropost. Owner or admin only.
pub async fn delete_micropost(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let post = svc.get_post(id).await?;
    if !current.can_modify(post.user_id) {
        return Err(ApiError::forbidden("You can only delete your own posts."));
    }

    svc.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The session user's home feed.
pub async fn feed(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
    Query(query): Query<ListQuery>,
) -> Result<Json<MicropostListDto>, ApiError> {
    let posts = svc.feed(current.id, query.limit, query.offset).await?;
    Ok(Json(to_list_dto(posts, &query)))
}

/// One user's posts (profile page listing).
pub async fn list_user_microposts(
    Extension(svc): Extension<Arc<Service>>,
    _current: Authenticated,
    Path(user_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<Json<MicropostListDto>, ApiError> {
    let posts = svc
        .posts_by_user(user_id, query.limit, query.offset)
        .await?;
    Ok(Json(to_list_dto(posts, &query)))
}

fn to_list_dto(posts: Vec<crate::contract::model::Micropost>, query: &ListQuery) -> MicropostListDto {
    let microposts: Vec<MicropostDto> = posts.into_iter().map(MicropostDto::from).collect();
    MicropostListDto {
        total: microposts.len(),
        limit: query.limit.unwrap_or(50),
        offset: query.offset.unwrap_or(0),
        microposts,
    }
}

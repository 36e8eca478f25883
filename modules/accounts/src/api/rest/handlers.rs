use std::sync::Arc;

use axum::{
    extract::Path,
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::api::cookies;
use crate::api::middleware::{Authenticated, MaybeUser};
use crate::api::rest::dto::{
    ListUsersQuery, SignInReq, SignUpReq, UpdateUserReq, UserDto, UserListDto,
};
use crate::api::rest::error::ApiError;
use crate::domain::service::Service;
use crate::domain::token::TokenCodec;

/// List users with optional pagination. Signed-in callers only.
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
    _current: Authenticated,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<UserListDto>, ApiError> {
    let users = svc.list_users(query.limit, query.offset).await?;
    let dto_users: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();
    Ok(Json(UserListDto {
        total: dto_users.len(),
        limit: query.limit.unwrap_or(50),
        offset: query.offset.unwrap_or(0),
        users: dto_users,
    }))
}

/// Public profile page data.
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserDto>, ApiError> {
    let user = svc.get_user(id).await?;
    Ok(Json(UserDto::from(user)))
}

/// Sign up. The new user is signed in right away, so the response also
/// carries the remember cookie.
pub async fn create_user(
    Extension(svc): Extension<Arc<Service>>,
    Extension(tokens): Extension<Arc<TokenCodec>>,
    MaybeUser(current): MaybeUser,
    Json(req): Json<SignUpReq>,
) -> Result<Response, ApiError> {
    if current.is_some() {
        return Err(ApiError::conflict("Already signed in."));
    }

    let user = svc.sign_up(req.into()).await?;
    info!("New signup: {}", user.id);

    let cookie = issue_remember_cookie(&svc, &tokens, user.id).await?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserDto::from(user)),
    )
        .into_response())
}

/// Update a profile. Owner or admin only.
pub async fn update_user(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserReq>,
) -> Result<Json<UserDto>, ApiError> {
    if !current.can_modify(id) {
        return Err(ApiError::forbidden("You can only edit your own profile."));
    }

    let user = svc.update_user(id, req.into()).await?;
    Ok(Json(UserDto::from(user)))
}

/// Delete an account. Admins only, and never their own account.
pub async fn delete_user(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !current.admin {
        return Err(ApiError::forbidden("Admins only."));
    }
    if current.id == id {
        return Err(ApiError::bad_request("Can not delete your own user account."));
    }

    svc.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Sign in: check credentials and set the remember cookie.
pub async fn create_session(
    Extension(svc): Extension<Arc<Service>>,
    Extension(tokens): Extension<Arc<TokenCodec>>,
    Json(req): Json<SignInReq>,
) -> Result<Response, ApiError> {
    let user = svc.authenticate(&req.email, &req.password).await?;
    info!("Signed in: {}", user.id);

    let cookie = issue_remember_cookie(&svc, &tokens, user.id).await?;
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserDto::from(user)),
    )
        .into_response())
}

/// Who am I — the identity behind the cookie.
pub async fn show_session(
    Extension(svc): Extension<Arc<Service>>,
    Authenticated(current): Authenticated,
) -> Result<Json<UserDto>, ApiError> {
    let user = svc.get_user(current.id).await?;
    Ok(Json(UserDto::from(user)))
}

/// Sign out: clear the remember cookie. Works for anonymous callers too.
pub async fn delete_session() -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cookies::clear_remember_cookie())],
    )
        .into_response()
}

async fn issue_remember_cookie(
    svc: &Service,
    tokens: &TokenCodec,
    user_id: Uuid,
) -> Result<String, ApiError> {
    let (_, salt) = svc
        .find_for_session(user_id)
        .await?
        .ok_or_else(ApiError::internal)?;
    let token = tokens
        .issue(user_id, &salt, Utc::now())
        .map_err(|_| ApiError::internal())?;
    Ok(cookies::remember_cookie(&token, tokens.ttl_seconds()))
}

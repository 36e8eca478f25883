use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::{service::Service, token::TokenCodec};

/// Users and session routes. The identity middleware is layered by the
/// server over the whole application router.
pub fn router(service: Arc<Service>, tokens: Arc<TokenCodec>) -> Router {
    Router::new()
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route(
            "/session",
            get(handlers::show_session)
                .post(handlers::create_session)
                .delete(handlers::delete_session),
        )
        .layer(Extension(service))
        .layer(Extension(tokens))
}

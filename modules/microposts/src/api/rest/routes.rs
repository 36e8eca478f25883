use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Micropost routes: create/destroy, the home feed, and the per-user
/// listing nested under /users.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/microposts", post(handlers::create_micropost))
        .route("/microposts/{id}", delete(handlers::delete_micropost))
        .route("/feed", get(handlers::feed))
        .route(
            "/users/{id}/microposts",
            get(handlers::list_user_microposts),
        )
        .layer(Extension(service))
}

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Follow-graph routes, including the per-user following/followers
/// listings nested under /users.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/relationships", post(handlers::create_relationship))
        .route(
            "/relationships/{followed_id}",
            axum::routing::delete(handlers::delete_relationship),
        )
        .route("/users/{id}/following", get(handlers::list_following))
        .route("/users/{id}/followers", get(handlers::list_followers))
        .layer(Extension(service))
}

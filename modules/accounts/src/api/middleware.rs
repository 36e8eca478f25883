//! Identity resolution for every request, plus the guard extractors the
//! handlers compose explicitly.
//!
//! The middleware decodes the remember-token cookie once per request and
//! threads the verified identity through request extensions — a
//! request-scoped value, never a global. Handlers that require a signed-in
//! caller take [`Authenticated`]; public handlers that only personalize
//! take [`MaybeUser`].

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::cookies;
use crate::contract::model::CurrentUser;
use crate::domain::{service::Service, token::TokenCodec};

/// Shared state for the identity middleware.
#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<Service>,
    pub tokens: Arc<TokenCodec>,
}

impl AuthState {
    pub fn new(service: Arc<Service>, tokens: Arc<TokenCodec>) -> Self {
        Self { service, tokens }
    }
}

/// Middleware that resolves the caller's identity from the remember
/// cookie. Missing, forged or stale cookies degrade silently to an
/// anonymous request — never an error.
pub async fn identity_loader(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = resolve_identity(&auth, request.headers()).await {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

async fn resolve_identity(auth: &AuthState, headers: &HeaderMap) -> Option<CurrentUser> {
    let token = cookies::cookie_value(headers, cookies::REMEMBER_COOKIE)?;
    let claims = auth.tokens.decode(&token)?;
    let (user, salt) = auth
        .service
        .find_for_session(claims.sub)
        .await
        .ok()
        .flatten()?;

    // The token is only good while the salt it was issued with is still
    // the stored one.
    if salt != claims.salt {
        return None;
    }

    Some(CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
        admin: user.admin,
    })
}

/// Extractor for handlers that require a signed-in caller.
pub struct Authenticated(pub CurrentUser);

impl<S: Send + Sync> FromRequestParts<S> for Authenticated {
    type Rejection = AuthRequired;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(Authenticated)
            .ok_or_else(|| AuthRequired {
                return_to: parts.uri.path().to_string(),
            })
    }
}

/// Denial response carrying the originally requested path so the client
/// can come back after signing in.
#[derive(Debug)]
pub struct AuthRequired {
    pub return_to: String,
}

impl IntoResponse for AuthRequired {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "Please sign in to access this page.",
                "return_to": self.return_to,
            })),
        )
            .into_response()
    }
}

/// Extractor for public handlers that behave differently for signed-in
/// callers.
pub struct MaybeUser(pub Option<CurrentUser>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<CurrentUser>().cloned()))
    }
}

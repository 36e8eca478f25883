use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower::ServiceExt;
use uuid::Uuid;

use accounts::{
    api::middleware::{identity_loader, AuthState},
    api::rest::dto::{SignInReq, SignUpReq, UserDto},
    contract::model::{NewUser, UserPatch},
    domain::error::DomainError,
    domain::service::{Service, ServiceConfig},
    domain::token::TokenCodec,
    Migrator,
};

/// Create a fresh test database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    Arc::new(Service::new(db, ServiceConfig::default()))
}

fn test_tokens() -> Arc<TokenCodec> {
    Arc::new(TokenCodec::new("integration-test-secret", 20 * 365))
}

/// Router with the identity middleware layered the way the server does.
async fn create_test_router() -> Router {
    let service = create_test_service().await;
    let tokens = test_tokens();
    let auth_state = AuthState::new(service.clone(), tokens.clone());

    accounts::api::rest::routes::router(service, tokens).layer(
        axum::middleware::from_fn_with_state(auth_state, identity_loader),
    )
}

fn signup(name: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        password_confirmation: password.to_string(),
    }
}

/// Pull the remember cookie pair out of a Set-Cookie header.
fn remember_cookie_pair(response: &axum::response::Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie present")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

#[tokio::test]
async fn test_sign_up_then_authenticate() -> Result<()> {
    let service = create_test_service().await;

    let user = service
        .sign_up(signup("Alice", "alice@example.com", "secret1"))
        .await?;
    assert_eq!(user.name, "Alice");
    assert_eq!(user.email, "alice@example.com");
    assert!(!user.admin);

    let authenticated = service.authenticate("alice@example.com", "secret1").await?;
    assert_eq!(authenticated.id, user.id);

    Ok(())
}

#[tokio::test]
async fn test_authenticate_rejects_wrong_password() -> Result<()> {
    let service = create_test_service().await;
    service
        .sign_up(signup("Alice", "alice@example.com", "secret1"))
        .await?;

    let result = service.authenticate("alice@example.com", "wrongpass").await;
    assert!(matches!(result, Err(DomainError::InvalidCredentials)));

    // Unknown email is indistinguishable from a wrong password.
    let result = service.authenticate("nobody@example.com", "secret1").await;
    assert!(matches!(result, Err(DomainError::InvalidCredentials)));

    Ok(())
}

#[tokio::test]
async fn test_email_uniqueness_is_case_insensitive() -> Result<()> {
    let service = create_test_service().await;
    service
        .sign_up(signup("Alice", "alice@example.com", "secret1"))
        .await?;

    let result = service
        .sign_up(signup("Impostor", "ALICE@example.com", "secret2"))
        .await;
    assert!(matches!(result, Err(DomainError::EmailTaken { .. })));

    // Authentication is case-insensitive on email too.
    let user = service.authenticate("Alice@Example.COM", "secret1").await?;
    assert_eq!(user.name, "Alice");

    Ok(())
}

#[tokio::test]
async fn test_signup_validation_boundaries() -> Result<()> {
    let service = create_test_service().await;

    // Name of exactly 50 characters is accepted, 51 rejected.
    let ok = service
        .sign_up(signup(&"a".repeat(50), "longname@example.com", "secret1"))
        .await;
    assert!(ok.is_ok());

    let result = service
        .sign_up(signup(&"a".repeat(51), "longer@example.com", "secret1"))
        .await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));

    // Password of exactly 6 characters is accepted, 5 rejected.
    let ok = service
        .sign_up(signup("Bob", "bob@example.com", "sixsix"))
        .await;
    assert!(ok.is_ok());

    let result = service
        .sign_up(signup("Carol", "carol@example.com", "five5"))
        .await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));

    Ok(())
}

#[tokio::test]
async fn test_signup_rejects_bad_email_and_mismatched_confirmation() -> Result<()> {
    let service = create_test_service().await;

    let result = service
        .sign_up(signup("Alice", "alice_at_example.com", "secret1"))
        .await;
    let Err(DomainError::Validation { errors }) = result else {
        panic!("expected validation error");
    };
    assert!(errors.iter().any(|e| e.field == "email"));

    let mut req = signup("Alice", "alice@example.com", "secret1");
    req.password_confirmation = "secret2".to_string();
    let result = service.sign_up(req).await;
    let Err(DomainError::Validation { errors }) = result else {
        panic!("expected validation error");
    };
    assert!(errors.iter().any(|e| e.field == "password"));

    Ok(())
}

#[tokio::test]
async fn test_update_profile_and_password_rotation() -> Result<()> {
    let service = create_test_service().await;
    let user = service
        .sign_up(signup("Alice", "alice@example.com", "secret1"))
        .await?;

    let (_, old_salt) = service.find_for_session(user.id).await?.unwrap();

    let updated = service
        .update_user(
            user.id,
            UserPatch {
                name: Some("Alice Cooper".to_string()),
                email: None,
                password: Some("newsecret".to_string()),
                password_confirmation: Some("newsecret".to_string()),
            },
        )
        .await?;
    assert_eq!(updated.name, "Alice Cooper");

    // The old password no longer works, the new one does.
    assert!(service
        .authenticate("alice@example.com", "secret1")
        .await
        .is_err());
    service.authenticate("alice@example.com", "newsecret").await?;

    // Changing the password rotated the salt.
    let (_, new_salt) = service.find_for_session(user.id).await?.unwrap();
    assert_ne!(old_salt, new_salt);

    Ok(())
}

#[tokio::test]
async fn test_update_rejects_taken_email() -> Result<()> {
    let service = create_test_service().await;
    service
        .sign_up(signup("Alice", "alice@example.com", "secret1"))
        .await?;
    let bob = service
        .sign_up(signup("Bob", "bob@example.com", "secret2"))
        .await?;

    let result = service
        .update_user(
            bob.id,
            UserPatch {
                email: Some("ALICE@example.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::EmailTaken { .. })));

    Ok(())
}

#[tokio::test]
async fn test_delete_user() -> Result<()> {
    let service = create_test_service().await;
    let user = service
        .sign_up(signup("Alice", "alice@example.com", "secret1"))
        .await?;

    service.delete_user(user.id).await?;
    assert!(service.get_user(user.id).await.is_err());

    // Deleting again reports not found.
    let result = service.delete_user(user.id).await;
    assert!(matches!(result, Err(DomainError::UserNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_ensure_admin_is_idempotent() -> Result<()> {
    let service = create_test_service().await;

    let first = service
        .ensure_admin("Site Admin", "admin@example.com", "changeme")
        .await?;
    assert!(first.admin);

    let second = service
        .ensure_admin("Site Admin", "admin@example.com", "changeme")
        .await?;
    assert_eq!(first.id, second.id);

    Ok(())
}

#[tokio::test]
async fn test_rest_signup_sets_cookie_and_recalls_user() -> Result<()> {
    let router = create_test_router().await;

    let signup_req = SignUpReq {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret1".to_string(),
        password_confirmation: "secret1".to_string(),
    };

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&signup_req)?))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let cookie = remember_cookie_pair(&response);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let created: UserDto = serde_json::from_slice(&body)?;

    // Fresh request object carrying only the cookie — a new page load.
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/session")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let recalled: UserDto = serde_json::from_slice(&body)?;
    assert_eq!(recalled.id, created.id);

    Ok(())
}

#[tokio::test]
async fn test_rest_sign_in_round_trip() -> Result<()> {
    let router = create_test_router().await;

    let signup_req = SignUpReq {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret1".to_string(),
        password_confirmation: "secret1".to_string(),
    };
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&signup_req)?))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let signin = SignInReq {
        email: "alice@example.com".to_string(),
        password: "secret1".to_string(),
    };
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&signin)?))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = remember_cookie_pair(&response);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/session")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_rest_sign_in_rejects_bad_credentials() -> Result<()> {
    let router = create_test_router().await;

    let signin = SignInReq {
        email: "nobody@example.com".to_string(),
        password: "whatever".to_string(),
    };
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&signin)?))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_rest_protected_route_requires_sign_in() -> Result<()> {
    let router = create_test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/users")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&body)?;
    // The denial carries the originally requested path.
    assert_eq!(json["return_to"], "/users");

    Ok(())
}

#[tokio::test]
async fn test_rest_forged_cookie_degrades_to_anonymous() -> Result<()> {
    let router = create_test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/session")
                .header(header::COOKIE, "remember_token=forged.token.value")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    // Not a crash, not a 500 — just not signed in.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_rest_delete_requires_admin() -> Result<()> {
    let router = create_test_router().await;

    let signup_req = SignUpReq {
        name: "Alice".to_string(),
        email: "alice@example.com".to_string(),
        password: "secret1".to_string(),
        password_confirmation: "secret1".to_string(),
    };
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&signup_req)?))
                .unwrap(),
        )
        .await
        .unwrap();
    let cookie = remember_cookie_pair(&response);

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/users/{}", Uuid::new_v4()))
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_rest_update_other_user_is_forbidden() -> Result<()> {
    let service = create_test_service().await;
    let tokens = test_tokens();
    let auth_state = AuthState::new(service.clone(), tokens.clone());
    let router = accounts::api::rest::routes::router(service.clone(), tokens).layer(
        axum::middleware::from_fn_with_state(auth_state, identity_loader),
    );

    let alice = service
        .sign_up(signup("Alice", "alice@example.com", "secret1"))
        .await?;
    service
        .sign_up(signup("Bob", "bob@example.com", "secret2"))
        .await?;

    // Sign in as Bob over HTTP to get a real cookie.
    let signin = SignInReq {
        email: "bob@example.com".to_string(),
        password: "secret2".to_string(),
    };
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/session")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&signin)?))
                .unwrap(),
        )
        .await
        .unwrap();
    let cookie = remember_cookie_pair(&response);

    let response = router
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(&format!("/users/{}", alice.id))
                .header("content-type", "application/json")
                .header(header::COOKIE, cookie)
                .body(Body::from(r#"{"name":"Hacked"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    Ok(())
}

//! Router assembly: wires the module services together through their
//! contract clients and layers the identity middleware over the whole
//! application.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use accounts::api::middleware::{identity_loader, AuthState};
use accounts::contract::client::AccountsApi;
use accounts::domain::token::TokenCodec;
use accounts::gateways::local::AccountsLocalClient;
use relationships::contract::client::RelationshipsApi;
use relationships::gateways::local::RelationshipsLocalClient;
use runtime::AuthConfig;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Apply every module's migrations. Users first: the other tables carry
/// foreign keys into it.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    accounts::Migrator::up(db, None)
        .await
        .context("accounts migrations failed")?;
    relationships::Migrator::up(db, None)
        .await
        .context("relationships migrations failed")?;
    microposts::Migrator::up(db, None)
        .await
        .context("microposts migrations failed")?;
    Ok(())
}

/// Create the configured admin account when it does not exist yet.
pub async fn seed_bootstrap_admin(db: &DatabaseConnection, auth: &AuthConfig) -> Result<()> {
    let Some(admin) = &auth.bootstrap_admin else {
        return Ok(());
    };

    let service =
        accounts::domain::service::Service::new(db.clone(), Default::default());
    let user = service
        .ensure_admin(&admin.name, &admin.email, &admin.password)
        .await
        .map_err(|e| anyhow::anyhow!("bootstrap admin failed: {e}"))?;
    tracing::info!("Bootstrap admin ready: {} <{}>", user.name, user.email);
    Ok(())
}

/// Assemble the application router from the three modules.
pub fn build_router(db: DatabaseConnection, auth: &AuthConfig, timeout_sec: u64) -> Router {
    let tokens = Arc::new(TokenCodec::new(&auth.secret, auth.remember_days));

    let accounts_service = Arc::new(accounts::domain::service::Service::new(
        db.clone(),
        Default::default(),
    ));
    let accounts_client: Arc<dyn AccountsApi> =
        Arc::new(AccountsLocalClient::new(accounts_service.clone()));

    let relationships_service = Arc::new(relationships::domain::service::Service::new(
        db.clone(),
        accounts_client.clone(),
        Default::default(),
    ));
    let relationships_client: Arc<dyn RelationshipsApi> =
        Arc::new(RelationshipsLocalClient::new(relationships_service.clone()));

    let microposts_service = Arc::new(microposts::domain::service::Service::new(
        db,
        accounts_client,
        relationships_client,
        Default::default(),
    ));

    let auth_state = AuthState::new(accounts_service.clone(), tokens.clone());

    let mut app = Router::new()
        .merge(accounts::api::rest::routes::router(accounts_service, tokens))
        .merge(relationships::api::rest::routes::router(relationships_service))
        .merge(microposts::api::rest::routes::router(microposts_service))
        .route("/health", get(health))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            identity_loader,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    if timeout_sec > 0 {
        app = app.layer(TimeoutLayer::new(Duration::from_secs(timeout_sec)));
    }

    app
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Resolves on ctrl-c (or SIGTERM on Unix) for graceful shutdown.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

use std::sync::Arc;

use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use accounts::contract::client::AccountsApi;
use accounts::contract::model::{NewUser, User};
use accounts::gateways::local::AccountsLocalClient;
use relationships::contract::client::RelationshipsApi;
use relationships::domain::error::DomainError;
use relationships::domain::service::{Service, ServiceConfig};
use relationships::gateways::local::RelationshipsLocalClient;

/// Fresh database with the users and relationships tables.
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");

    accounts::Migrator::up(&db, None)
        .await
        .expect("Failed to run accounts migrations");
    relationships::Migrator::up(&db, None)
        .await
        .expect("Failed to run relationships migrations");

    db
}

struct TestEnv {
    accounts: Arc<accounts::domain::service::Service>,
    service: Arc<Service>,
}

async fn create_test_env() -> TestEnv {
    let db = create_test_db().await;
    let accounts_service = Arc::new(accounts::domain::service::Service::new(
        db.clone(),
        Default::default(),
    ));
    let accounts_client: Arc<dyn AccountsApi> =
        Arc::new(AccountsLocalClient::new(accounts_service.clone()));
    let service = Arc::new(Service::new(db, accounts_client, ServiceConfig::default()));

    TestEnv {
        accounts: accounts_service,
        service,
    }
}

async fn create_user(env: &TestEnv, name: &str, email: &str) -> User {
    env.accounts
        .sign_up(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            password_confirmation: "secret1".to_string(),
        })
        .await
        .expect("signup should succeed")
}

#[tokio::test]
async fn test_follow_then_unfollow() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;
    let bob = create_user(&env, "Bob", "bob@example.com").await;

    assert!(!env.service.is_following(alice.id, bob.id).await?);

    let edge = env.service.follow(alice.id, bob.id).await?;
    assert_eq!(edge.follower_id, alice.id);
    assert_eq!(edge.followed_id, bob.id);
    assert!(env.service.is_following(alice.id, bob.id).await?);
    // Following is directed.
    assert!(!env.service.is_following(bob.id, alice.id).await?);

    env.service.unfollow(alice.id, bob.id).await?;
    assert!(!env.service.is_following(alice.id, bob.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_duplicate_follow_is_rejected() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;
    let bob = create_user(&env, "Bob", "bob@example.com").await;

    env.service.follow(alice.id, bob.id).await?;
    let result = env.service.follow(alice.id, bob.id).await;
    assert!(matches!(result, Err(DomainError::DuplicateEdge { .. })));

    Ok(())
}

#[tokio::test]
async fn test_self_follow_is_rejected() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;

    let result = env.service.follow(alice.id, alice.id).await;
    assert!(matches!(result, Err(DomainError::SelfFollow)));

    Ok(())
}

#[tokio::test]
async fn test_follow_unknown_user_is_not_found() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;

    let result = env.service.follow(alice.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::UserNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_unfollow_missing_edge_is_a_noop() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;
    let bob = create_user(&env, "Bob", "bob@example.com").await;

    // No edge exists; unfollow neither errors nor changes the graph.
    env.service.unfollow(alice.id, bob.id).await?;
    assert!(!env.service.is_following(alice.id, bob.id).await?);

    // And it stays idempotent after a real follow/unfollow cycle.
    env.service.follow(alice.id, bob.id).await?;
    env.service.unfollow(alice.id, bob.id).await?;
    env.service.unfollow(alice.id, bob.id).await?;
    assert!(!env.service.is_following(alice.id, bob.id).await?);

    Ok(())
}

#[tokio::test]
async fn test_following_and_followers_listings() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;
    let bob = create_user(&env, "Bob", "bob@example.com").await;
    let carol = create_user(&env, "Carol", "carol@example.com").await;

    env.service.follow(alice.id, bob.id).await?;
    env.service.follow(alice.id, carol.id).await?;
    env.service.follow(bob.id, carol.id).await?;

    let following = env.service.following(alice.id, None, None).await?;
    let ids: Vec<Uuid> = following.iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&bob.id));
    assert!(ids.contains(&carol.id));

    let followers = env.service.followers(carol.id, None, None).await?;
    let ids: Vec<Uuid> = followers.iter().map(|u| u.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&alice.id));
    assert!(ids.contains(&bob.id));

    // Bob follows nobody back yet.
    let followers = env.service.followers(alice.id, None, None).await?;
    assert!(followers.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_listings_for_unknown_user_are_not_found() -> Result<()> {
    let env = create_test_env().await;

    let result = env.service.following(Uuid::new_v4(), None, None).await;
    assert!(matches!(result, Err(DomainError::UserNotFound { .. })));

    let result = env.service.followers(Uuid::new_v4(), None, None).await;
    assert!(matches!(result, Err(DomainError::UserNotFound { .. })));

    Ok(())
}

#[tokio::test]
async fn test_listing_pagination() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;

    for i in 0..5 {
        let user = create_user(&env, &format!("User{i}"), &format!("user{i}@example.com")).await;
        env.service.follow(alice.id, user.id).await?;
    }

    let page1 = env.service.following(alice.id, Some(2), Some(0)).await?;
    let page2 = env.service.following(alice.id, Some(2), Some(2)).await?;
    assert_eq!(page1.len(), 2);
    assert_eq!(page2.len(), 2);
    assert!(page1.iter().all(|u| page2.iter().all(|v| v.id != u.id)));

    Ok(())
}

#[tokio::test]
async fn test_local_client() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;
    let bob = create_user(&env, "Bob", "bob@example.com").await;

    let client: Arc<dyn RelationshipsApi> =
        Arc::new(RelationshipsLocalClient::new(env.service.clone()));

    env.service.follow(alice.id, bob.id).await?;

    assert!(client.is_following(alice.id, bob.id).await?);
    assert_eq!(client.followed_ids(alice.id).await?, vec![bob.id]);
    assert!(client.followed_ids(bob.id).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_deleting_user_cascades_edges() -> Result<()> {
    let env = create_test_env().await;
    let alice = create_user(&env, "Alice", "alice@example.com").await;
    let bob = create_user(&env, "Bob", "bob@example.com").await;

    env.service.follow(alice.id, bob.id).await?;
    env.service.follow(bob.id, alice.id).await?;

    env.accounts.delete_user(bob.id).await?;

    // Both edge directions are gone with the account.
    assert!(!env.service.is_following(alice.id, bob.id).await?);
    assert!(env.service.followed_ids(alice.id).await?.is_empty());

    Ok(())
}

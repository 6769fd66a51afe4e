//! Login and session handling against a real database.
//!
//! Run with: cargo test -p shopfront-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use sqlx::PgPool;

use shopfront_client::ShopClient;
use shopfront_integration_tests::{PASSWORD, create_user, spawn_storefront};
use shopfront_storefront::config::StockPolicy;

async fn client(pool: &PgPool) -> ShopClient {
    let base = spawn_storefront(pool.clone(), StockPolicy::AllowBackorder).await;
    ShopClient::new(&base).unwrap()
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_login_returns_username_only(pool: PgPool) {
    create_user(&pool, "alice").await;
    let client = client(&pool).await;

    let response = reqwest::Client::new()
        .post(client.base_url().join("api/login").unwrap())
        .json(&serde_json::json!({ "username": "alice", "password": PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "message": "Login successful", "username": "alice" })
    );
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_wrong_password_and_unknown_user_look_the_same(pool: PgPool) {
    create_user(&pool, "alice").await;
    let client = client(&pool).await;

    let wrong = client.login("alice", "not the password").await.unwrap_err();
    let unknown = client.login("nobody", PASSWORD).await.unwrap_err();

    assert!(wrong.is_unauthorized());
    assert!(unknown.is_unauthorized());
    assert_eq!(wrong.to_string(), unknown.to_string());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_username_match_is_exact(pool: PgPool) {
    create_user(&pool, "alice").await;
    let client = client(&pool).await;

    assert!(client.login("Alice", PASSWORD).await.unwrap_err().is_unauthorized());
    assert!(client.login(" alice", PASSWORD).await.unwrap_err().is_unauthorized());
}

#[sqlx::test(migrations = "../storefront/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_session_lifecycle(pool: PgPool) {
    create_user(&pool, "alice").await;
    let client = client(&pool).await;

    let session = client.login("alice", PASSWORD).await.unwrap();
    assert_eq!(client.whoami(&session).await.unwrap().as_str(), "alice");

    let kept = session.clone();
    client.logout(session).await.unwrap();
    assert!(client.whoami(&kept).await.unwrap_err().is_unauthorized());
}

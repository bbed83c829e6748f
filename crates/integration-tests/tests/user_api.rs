//! End-to-end tests for the user API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//!   (cargo run -p worko-cli -- migrate)
//! - The server running (cargo run -p worko-server)
//!
//! Run with: cargo test -p worko-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the user API (configurable via environment).
fn user_base_url() -> String {
    let base =
        std::env::var("WORKO_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
    format!("{base}/worko/user")
}

/// A client that keeps the credential cookie across requests.
fn cookie_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A client that presents no credential at all.
fn anonymous_client() -> Client {
    Client::new()
}

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

fn create_body(email: &str) -> Value {
    json!({
        "email": email,
        "name": "A",
        "age": 20,
        "city": "C",
        "zipCode": "1"
    })
}

/// Create a user with the given client and return the response body.
async fn create_user(client: &Client, email: &str) -> Value {
    let resp = client
        .post(user_base_url())
        .json(&create_body(email))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to read response body")
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_create_returns_record_and_sets_credential_cookie() {
    let client = cookie_client();
    let email = unique_email();

    let resp = client
        .post(user_base_url())
        .json(&create_body(&email))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(resp.status(), StatusCode::OK);

    let has_token = resp.cookies().any(|c| c.name() == "access_token");
    assert!(has_token, "create must set the access_token cookie");

    let body: Value = resp.json().await.expect("Failed to read response body");
    assert_eq!(body["email"], email);
    assert_eq!(body["name"], "A");
    assert_eq!(body["zipCode"], "1");
    assert!(body.get("id").is_some());
    assert!(body.get("createdAt").is_some());
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_duplicate_email_is_rejected() {
    let client = cookie_client();
    let email = unique_email();

    create_user(&client, &email).await;

    // Same email, every other field different.
    let resp = client
        .post(user_base_url())
        .json(&json!({
            "email": email,
            "name": "B",
            "age": 99,
            "city": "D",
            "zipCode": "2"
        }))
        .send()
        .await
        .expect("Failed to send duplicate create");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to read response body");
    assert_eq!(body["error"], "User with this email already exists");
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_put_without_credential_is_unauthenticated() {
    let owner = cookie_client();
    let created = create_user(&owner, &unique_email()).await;
    let id = created["id"].as_i64().expect("missing id");

    let resp = anonymous_client()
        .put(format!("{}/{id}", user_base_url()))
        .json(&json!({ "name": "Intruder" }))
        .send()
        .await
        .expect("Failed to send PUT");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_put_with_foreign_credential_is_forbidden() {
    // Two accounts, each client holding its own credential cookie.
    let alice = cookie_client();
    create_user(&alice, &unique_email()).await;

    let bob = cookie_client();
    let bob_record = create_user(&bob, &unique_email()).await;
    let bob_id = bob_record["id"].as_i64().expect("missing id");

    // Alice's credential against Bob's record.
    let resp = alice
        .put(format!("{}/{bob_id}", user_base_url()))
        .json(&json!({ "name": "Mallory" }))
        .send()
        .await
        .expect("Failed to send PUT");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_replace_resets_omitted_fields() {
    let client = cookie_client();
    let email = unique_email();
    let created = create_user(&client, &email).await;
    let id = created["id"].as_i64().expect("missing id");

    // Full replace carrying only email and name: city/age/zipCode reset.
    let resp = client
        .put(format!("{}/{id}", user_base_url()))
        .json(&json!({ "email": email, "name": "Renamed" }))
        .send()
        .await
        .expect("Failed to send PUT");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response body");
    assert_eq!(body["name"], "Renamed");
    assert!(body.get("city").is_none());
    assert!(body.get("age").is_none());
    assert!(body.get("zipCode").is_none());
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_patch_preserves_omitted_fields() {
    let client = cookie_client();
    let email = unique_email();
    let created = create_user(&client, &email).await;
    let id = created["id"].as_i64().expect("missing id");

    let resp = client
        .patch(format!("{}/{id}", user_base_url()))
        .json(&json!({ "city": "Lagos" }))
        .send()
        .await
        .expect("Failed to send PATCH");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response body");
    assert_eq!(body["city"], "Lagos");
    assert_eq!(body["email"], email);
    assert_eq!(body["name"], "A");
    assert_eq!(body["zipCode"], "1");
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_delete_is_idempotent() {
    let client = cookie_client();
    let created = create_user(&client, &unique_email()).await;
    let id = created["id"].as_i64().expect("missing id");

    for _ in 0..2 {
        let resp = client
            .delete(format!("{}/{id}", user_base_url()))
            .send()
            .await
            .expect("Failed to send DELETE");

        assert_eq!(resp.status(), StatusCode::OK);
        let body: String = resp.json().await.expect("Failed to read response body");
        assert_eq!(body, "User has been deleted.");
    }
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_find_unknown_id_returns_bare_message() {
    let resp = anonymous_client()
        .get(format!("{}/find/2147483000", user_base_url()))
        .send()
        .await
        .expect("Failed to send GET");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The lookup 404 body is a bare JSON string, not an error object.
    let body: String = resp.json().await.expect("Failed to read response body");
    assert_eq!(body, "User not found");
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_list_includes_created_user() {
    let client = cookie_client();
    let email = unique_email();
    create_user(&client, &email).await;

    let resp = anonymous_client()
        .get(format!("{}/users", user_base_url()))
        .send()
        .await
        .expect("Failed to send GET");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response body");
    let users = body.as_array().expect("list must be an array");
    assert!(users.iter().any(|u| u["email"] == email));
}

//! Handler tests for the Users domain
//!
//! These drive the domain router directly (no app middleware) and verify:
//! - Request deserialization and validation
//! - Response envelopes and status codes
//! - Error responses for conflicts, absent records, and malformed ids

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_users::{InMemoryUserRepository, UserService, handlers};
use http_body_util::BodyExt;
use mongodb::bson::oid::ObjectId;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let service = UserService::new(InMemoryUserRepository::new());
    handlers::router(service)
}

// Helper to parse a JSON response body
async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_user(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn put_user(id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(format!("/{}", id))
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn create_returns_201_with_hashed_password() {
    let app = app();

    let response = app
        .oneshot(post_user(json!({
            "email": "ada@example.com",
            "password": "secret",
            "name": "Ada"
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_ne!(body["data"]["password"], "secret");
    // Passthrough profile fields survive untouched
    assert_eq!(body["data"]["name"], "Ada");
    assert!(!body["data"]["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn create_with_duplicate_email_returns_409() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_user(json!({"email": "a@x.com", "password": "secret"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_user(json!({"email": "a@x.com", "password": "other"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "This user already exists");

    // Exactly one record with that email remains
    let response = app.oneshot(get("/")).await.unwrap();
    let body = json_body(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn create_with_missing_password_returns_400_and_persists_nothing() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_user(json!({"email": "ada@example.com"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/")).await.unwrap();
    let body = json_body(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_with_empty_password_returns_400() {
    let app = app();

    let response = app
        .oneshot(post_user(
            json!({"email": "ada@example.com", "password": ""}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], "Request validation failed");
    assert!(body["details"]["password"].is_array());
}

#[tokio::test]
async fn create_with_malformed_email_returns_400() {
    let app = app();

    let response = app
        .oneshot(post_user(
            json!({"email": "not-an-email", "password": "secret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_with_unknown_id_returns_404() {
    let app = app();

    let response = app
        .oneshot(get(&format!("/{}", ObjectId::new())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn get_with_malformed_id_returns_400() {
    let app = app();

    let response = app.oneshot(get("/definitely-not-an-id")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid user id")
    );
}

#[tokio::test]
async fn get_returns_the_bare_record() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_user(json!({
            "email": "ada@example.com",
            "password": "secret",
            "name": "Ada"
        })))
        .await
        .unwrap();
    let created = json_body(response.into_body()).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = app.oneshot(get(&format!("/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["name"], "Ada");
}

#[tokio::test]
async fn update_with_unknown_target_id_returns_404_even_when_email_exists() {
    let app = app();

    app.clone()
        .oneshot(post_user(json!({"email": "a@x.com", "password": "secret"})))
        .await
        .unwrap();

    let response = app
        .oneshot(put_user(
            &ObjectId::new().to_hex(),
            json!({"email": "a@x.com", "password": "secret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn update_taking_anothers_email_returns_409() {
    let app = app();

    app.clone()
        .oneshot(post_user(
            json!({"email": "first@x.com", "password": "secret"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_user(
            json!({"email": "second@x.com", "password": "secret"}),
        ))
        .await
        .unwrap();
    let created = json_body(response.into_body()).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(put_user(
            &id,
            json!({"email": "first@x.com", "password": "secret"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_replaces_the_record_and_returns_the_new_state() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_user(json!({
            "email": "ada@example.com",
            "password": "secret",
            "name": "Ada"
        })))
        .await
        .unwrap();
    let created = json_body(response.into_body()).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(put_user(
            &id,
            json!({
                "email": "ada@example.com",
                "password": "new-secret",
                "name": "Ada Lovelace"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["name"], "Ada Lovelace");
    assert_ne!(body["data"]["password"], "new-secret");
}

#[tokio::test]
async fn delete_returns_the_pre_deletion_record_then_404() {
    let app = app();

    // Create {email: "a@x.com", password: "secret"}
    let response = app
        .clone()
        .oneshot(post_user(json!({"email": "a@x.com", "password": "secret"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response.into_body()).await;
    assert_ne!(created["data"]["password"], "secret");
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // Delete it: 200 with the record as it was before deletion
    let response = app
        .clone()
        .oneshot(delete(&format!("/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response.into_body()).await;
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["data"], created["data"]);

    // Gone from the listing, and a second delete reports not found
    let response = app.clone().oneshot(get("/")).await.unwrap();
    let body = json_body(response.into_body()).await;
    assert!(body.as_array().unwrap().is_empty());

    let response = app.oneshot(delete(&format!("/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_is_routed_like_put() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_user(json!({"email": "a@x.com", "password": "secret"})))
        .await
        .unwrap();
    let created = json_body(response.into_body()).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/{}", id))
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({"email": "a@x.com", "password": "secret2"})).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

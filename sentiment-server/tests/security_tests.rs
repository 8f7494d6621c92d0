//! Request signing tests
//!
//! The app here runs with a non-zero shared secret, so every `/api` request
//! must carry a fresh timestamp and a matching hash.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sentiment_common::api::auth::{calculate_hash, now_millis};
use sentiment_common::db::{init_database, users};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::util::ServiceExt;
use sentiment_server::{build_router, AppState};

const SECRET: i64 = 12345;

async fn setup_app_with_auth() -> (TempDir, SqlitePool, Router) {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("sentiment.db")).await.unwrap();
    users::create_user(&pool, "alice").await.unwrap();
    let app = build_router(AppState::new(pool.clone(), SECRET));
    (dir, pool, app)
}

/// Fill in `timestamp` and `hash` on a JSON body
fn sign_body(mut body: Value, timestamp: i64, secret: i64) -> Value {
    body["timestamp"] = json!(timestamp);
    body["hash"] = json!("");
    let hash = calculate_hash(&body, secret);
    body["hash"] = json!(hash);
    body
}

/// Query string carrying `timestamp` and `hash` for `method` on `path`
fn sign_query(method: &str, path: &str, timestamp: i64, secret: i64) -> String {
    let signed = json!({ "timestamp": timestamp, "hash": "", "method": method, "path": path });
    let hash = calculate_hash(&signed, secret);
    format!("timestamp={}&hash={}", timestamp, hash)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_needs_no_signature() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signed_post_accepted() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let body = sign_body(json!({ "owner": "alice", "text": "good" }), now_millis(), SECRET);
    let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_secret_rejected() {
    let (_dir, pool, app) = setup_app_with_auth().await;

    let body = sign_body(json!({ "owner": "alice", "text": "good" }), now_millis(), SECRET + 1);
    let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_activity")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_tampered_body_rejected() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let mut body = sign_body(json!({ "owner": "alice", "text": "good" }), now_millis(), SECRET);
    body["text"] = json!("bad");
    let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_stale_timestamp_rejected() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let body = sign_body(
        json!({ "owner": "alice", "text": "good" }),
        now_millis() - 60_000,
        SECRET,
    );
    let response = app.oneshot(post_json("/api/analyze", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_auth_fields_rejected() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let body = json!({ "owner": "alice", "text": "good" });
    let response = app
        .clone()
        .oneshot(post_json("/api/analyze", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/api/users/alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signed_get_accepted() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let uri = format!(
        "/api/users/alice?{}",
        sign_query("GET", "/api/users/alice", now_millis(), SECRET)
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signed_get_with_filters_accepted() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let uri = format!(
        "/api/admin/activity?sentiment=Positive&{}",
        sign_query("GET", "/api/admin/activity", now_millis(), SECRET)
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bad_get_signature_rejected() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let uri = format!(
        "/api/users/alice?{}",
        sign_query("GET", "/api/users/alice", now_millis(), 999)
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_signature_not_valid_for_delete() {
    let (_dir, pool, app) = setup_app_with_auth().await;

    let query = sign_query("GET", "/api/users/alice", now_millis(), SECRET);
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/users/alice?{}", query))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(users::find_by_username(&pool, "alice").await.unwrap().is_some());
}

#[tokio::test]
async fn test_get_signature_not_valid_for_other_path() {
    let (_dir, pool, app) = setup_app_with_auth().await;
    users::create_user(&pool, "bob").await.unwrap();

    let query = sign_query("GET", "/api/users/alice", now_millis(), SECRET);
    let uri = format!("/api/users/bob?{}", query);
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signed_delete_accepted() {
    let (_dir, pool, app) = setup_app_with_auth().await;

    let query = sign_query("DELETE", "/api/users/alice", now_millis(), SECRET);
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/api/users/alice?{}", query))
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(users::find_by_username(&pool, "alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_extreme_timestamps_rejected() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    for timestamp in [i64::MIN, i64::MAX] {
        let body = sign_body(json!({ "owner": "alice", "text": "good" }), timestamp, SECRET);
        let response = app
            .clone()
            .oneshot(post_json("/api/analyze", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let uri = format!(
            "/api/users/alice?{}",
            sign_query("GET", "/api/users/alice", timestamp, SECRET)
        );
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

/// Bodies larger than 10 MiB are refused before any JSON parsing
#[tokio::test]
async fn test_body_size_limit_10mb() {
    let (_dir, _pool, app) = setup_app_with_auth().await;

    let large_body = vec![b'x'; 10 * 1024 * 1024 + 1024];
    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header("Content-Type", "application/json")
        .body(Body::from(large_body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(
        response.status() == StatusCode::PAYLOAD_TOO_LARGE
            || response.status() == StatusCode::BAD_REQUEST,
        "Expected 413/400 for oversized body, got {}",
        response.status()
    );
}

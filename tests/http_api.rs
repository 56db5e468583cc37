use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use docs_api::bootstrap::app_context::{AppContext, AppServices};
use docs_api::bootstrap::config::Config;
use docs_api::infrastructure::memory::MemoryStore;

fn app() -> Router {
    let cfg = Config::from_lookup(|key| match key {
        "STORE_BACKEND" => Some("memory".to_string()),
        "JWT_SECRET" => Some("integration-test-secret".to_string()),
        _ => None,
    })
    .unwrap();
    let store = MemoryStore::new();
    let services = AppServices::new(Arc::new(store.clone()), Arc::new(store), None);
    docs_api::presentation::http::router(AppContext::new(cfg, services))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a user and returns `(user_id, token)`.
async fn sign_up(app: &Router, email: &str) -> (String, String) {
    let (status, _) = call(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "name": email, "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        body["user"]["id"].as_str().unwrap().to_string(),
        body["access_token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn health_reports_memory_store() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = app();
    let (status, body) = call(&app, Method::GET, "/api/documents", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, Method::GET, "/api/documents", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_rejects_duplicate_email_and_bad_password() {
    let app = app();
    sign_up(&app, "dup@example.com").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "DUP@example.com", "name": "x", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "dup@example.com", "password": "wrong password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn owner_shares_document_with_reader() {
    let app = app();
    let (a_id, a) = sign_up(&app, "a@example.com").await;
    let (b_id, b) = sign_up(&app, "b@example.com").await;

    let (status, doc) = call(
        &app,
        Method::POST,
        "/api/documents",
        Some(&a),
        Some(json!({ "title": "Spec", "content": "v1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(doc["owner"].as_str().unwrap(), a_id);
    let doc_uri = format!("/api/documents/{}", doc["id"].as_str().unwrap());

    let (status, me) = call(&app, Method::GET, "/api/auth/me", Some(&a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["documents"], json!([doc["id"]]));

    let (status, body) = call(&app, Method::GET, &doc_uri, Some(&b), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());

    let (status, shared) = call(
        &app,
        Method::PUT,
        &format!("{doc_uri}/roles/{b_id}"),
        Some(&a),
        Some(json!({ "permission": "read" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shared["roles"][0]["permission"], "read");

    let (status, seen) = call(&app, Method::GET, &doc_uri, Some(&b), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seen["title"], "Spec");

    let (status, _) = call(
        &app,
        Method::PATCH,
        &doc_uri,
        Some(&b),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::DELETE, &doc_uri, Some(&b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, unchanged) = call(&app, Method::GET, &doc_uri, Some(&a), None).await;
    assert_eq!(unchanged["title"], "Spec");
}

#[tokio::test]
async fn owner_updates_replaces_and_deletes() {
    let app = app();
    let (a_id, a) = sign_up(&app, "a@example.com").await;

    let (_, doc) = call(
        &app,
        Method::POST,
        "/api/documents",
        Some(&a),
        Some(json!({ "title": "Draft" })),
    )
    .await;
    let doc_uri = format!("/api/documents/{}", doc["id"].as_str().unwrap());

    let (status, body) = call(
        &app,
        Method::PATCH,
        &doc_uri,
        Some(&a),
        Some(json!({ "content": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, _) = call(
        &app,
        Method::PUT,
        &doc_uri,
        Some(&a),
        Some(json!({ "title": "Final", "content": "done" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = call(
        &app,
        Method::GET,
        "/api/documents?q=fin",
        Some(&a),
        None,
    )
    .await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["content"], "done");

    let (status, _) = call(&app, Method::DELETE, &doc_uri, Some(&a), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::GET, &doc_uri, Some(&a), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, owned) = call(
        &app,
        Method::GET,
        &format!("/api/users/{a_id}/documents"),
        Some(&a),
        None,
    )
    .await;
    assert_eq!(owned, json!([]));
}

#[tokio::test]
async fn invalid_input_is_a_bad_request() {
    let app = app();
    let (_, a) = sign_up(&app, "a@example.com").await;

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/documents",
        Some(&a),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, doc) = call(
        &app,
        Method::POST,
        "/api/documents",
        Some(&a),
        Some(json!({ "title": "Roadmap" })),
    )
    .await;
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!(
            "/api/documents/{}/roles/{}",
            doc["id"].as_str().unwrap(),
            uuid::Uuid::new_v4()
        ),
        Some(&a),
        Some(json!({ "permission": "owner" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_requests_get_json_bad_request() {
    let app = app();
    let (_, a) = sign_up(&app, "a@example.com").await;

    let (status, body) = call(&app, Method::POST, "/api/documents", Some(&a), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("title"));

    let (status, body) = call(&app, Method::GET, "/api/documents/not-a-uuid", Some(&a), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = call(&app, Method::GET, "/api/documents?limit=abc", Some(&a), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "email": "x@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn users_can_be_listed_and_looked_up_with_owned_documents() {
    let app = app();
    let (a_id, a) = sign_up(&app, "a@example.com").await;
    let (b_id, _) = sign_up(&app, "b@example.com").await;
    let (_, doc) = call(
        &app,
        Method::POST,
        "/api/documents",
        Some(&a),
        Some(json!({ "title": "Roadmap" })),
    )
    .await;

    let (status, _) = call(&app, Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, users) = call(&app, Method::GET, "/api/users", Some(&a), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![a_id.as_str(), b_id.as_str()]);
    assert_eq!(users[0]["documents"], json!([doc["id"]]));

    let (status, found) = call(&app, Method::GET, &format!("/api/users/{b_id}"), Some(&a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["email"], "b@example.com");
    assert_eq!(found["documents"], json!([]));

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/api/users/{}", uuid::Uuid::new_v4()),
        Some(&a),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn profile_update_and_replace_apply_to_the_caller() {
    let app = app();
    let (_, a) = sign_up(&app, "a@example.com").await;
    sign_up(&app, "b@example.com").await;

    let (status, me) = call(
        &app,
        Method::PATCH,
        "/api/users",
        Some(&a),
        Some(json!({ "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Alice");
    assert_eq!(me["email"], "a@example.com");

    let (status, _) = call(
        &app,
        Method::PUT,
        "/api/users",
        Some(&a),
        Some(json!({ "email": "b@example.com", "name": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, me) = call(
        &app,
        Method::PUT,
        "/api/users",
        Some(&a),
        Some(json!({ "email": "alice@example.com", "name": "Alice A" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "alice@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Alice A");
}

#[tokio::test]
async fn logout_requires_authentication() {
    let app = app();
    let (_, a) = sign_up(&app, "a@example.com").await;

    let (status, body) = call(&app, Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = call(&app, Method::POST, "/api/auth/logout", Some(&a), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use itemvault::{app::build_app, config::AppConfig, state::AppState};

fn test_app() -> Router {
    build_app(AppState::new(AppConfig::for_tests()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router, username: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "longenough1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register {username}: {body}");
    body
}

async fn login(app: &Router, username: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": username, "password": "longenough1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {username}: {body}");
    body["access_token"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn end_to_end_ownership_flow() {
    let app = test_app();

    let (status, alice) = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "alice", "email": "a@example.com", "password": "longenough1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alice["username"], "alice");
    assert!(alice.get("password").is_none());
    assert!(alice.get("password_hash").is_none());

    let (status, token_body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "alice", "password": "longenough1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(token_body["token_type"], "bearer");
    let alice_token = token_body["access_token"].as_str().unwrap().to_owned();

    let (status, me) = send(&app, Method::GET, "/users/me", Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    let (status, item) = send(
        &app,
        Method::POST,
        "/items/",
        Some(&alice_token),
        Some(json!({ "title": "Widget", "price": 9.99 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["owner_id"], alice["id"]);
    let item_uri = format!("/items/{}", item["id"]);

    register(&app, "mallory").await;
    let mallory_token = login(&app, "mallory").await;

    let (status, _) = send(&app, Method::DELETE, &item_uri, Some(&mallory_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, still_there) = send(&app, Method::GET, &item_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(still_there["title"], "Widget");

    let (status, body) = send(&app, Method::DELETE, &item_uri, Some(&alice_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item deleted successfully");

    let (status, body) = send(&app, Method::GET, &item_uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Item not found");
}

#[tokio::test]
async fn duplicate_username_is_bad_request() {
    let app = test_app();
    let first = register(&app, "dupe").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "dupe", "email": "other@example.com", "password": "longenough1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("already registered"));

    let (_, users) = send(&app, Method::GET, "/users", None, None).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], first["email"]);
}

#[tokio::test]
async fn registration_validation_is_unprocessable() {
    let app = test_app();
    for body in [
        json!({ "username": "val1", "email": "invalid-email", "password": "longenough1" }),
        json!({ "username": "val2", "email": "v@example.com", "password": "short" }),
        json!({ "username": "v", "email": "v@example.com", "password": "longenough1" }),
        json!({ "email": "v@example.com", "password": "longenough1" }),
    ] {
        let (status, resp) = send(&app, Method::POST, "/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(resp["detail"].is_array());
    }
}

#[tokio::test]
async fn login_failures_look_identical() {
    let app = test_app();
    register(&app, "logintest").await;

    let (s1, b1) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "nonexistent", "password": "wrongpassword" })),
    )
    .await;
    let (s2, b2) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "logintest", "password": "wrongpassword" })),
    )
    .await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(b1, b2);
    assert_eq!(b1["detail"], "Incorrect username or password");
}

#[tokio::test]
async fn malformed_login_body_is_unprocessable() {
    let app = test_app();
    register(&app, "shape").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "shape" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "body");

    // present but wrong is a credential failure, not a shape failure
    let (status, _) = send(
        &app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "username": "shape", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_bearer_token() {
    let app = test_app();

    let (status, _) = send(&app, Method::GET, "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/users/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "Could not validate credentials");

    let (status, _) = send(
        &app,
        Method::POST,
        "/items/",
        None,
        Some(json!({ "title": "Test Item", "price": 29.99 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_unknown_user_is_rejected() {
    let state = AppState::new(AppConfig::for_tests());
    let token = state.keys.issue("ghost", None).unwrap();
    let app = build_app(state);

    let (status, body) = send(&app, Method::GET, "/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn update_replaces_fields_for_owner_only() {
    let app = test_app();
    register(&app, "owner").await;
    let owner = login(&app, "owner").await;
    register(&app, "other").await;
    let other = login(&app, "other").await;

    let (_, item) = send(
        &app,
        Method::POST,
        "/items",
        Some(&owner),
        Some(json!({ "title": "Original Title", "description": "Original", "price": 25.0 })),
    )
    .await;
    let uri = format!("/items/{}", item["id"]);
    let update = json!({ "title": "Updated Title", "description": "Updated", "price": 35.0 });

    let (status, _) = send(&app, Method::PUT, &uri, Some(&other), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (_, unchanged) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(unchanged, item);

    let (status, updated) = send(&app, Method::PUT, &uri, Some(&owner), Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Updated Title");
    assert_eq!(updated["price"], 35.0);
    assert_eq!(updated["id"], item["id"]);
    assert_eq!(updated["owner_id"], item["owner_id"]);
    assert_eq!(updated["created_at"], item["created_at"]);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/items/9999",
        Some(&owner),
        Some(json!({ "title": "x", "price": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_item_is_unprocessable() {
    let app = test_app();
    register(&app, "validationtest").await;
    let token = login(&app, "validationtest").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/items/",
        Some(&token),
        Some(json!({ "title": "Test Item", "price": -10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["field"], "price");
}

#[tokio::test]
async fn list_items_paginates_in_creation_order() {
    let app = test_app();
    register(&app, "lister").await;
    let token = login(&app, "lister").await;
    for title in ["one", "two", "three"] {
        send(
            &app,
            Method::POST,
            "/items/",
            Some(&token),
            Some(json!({ "title": title, "price": 1.5 })),
        )
        .await;
    }

    let (status, page) = send(&app, Method::GET, "/items/?skip=0&limit=10", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = page
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["title"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(titles, ["one", "two", "three"]);

    let (_, page) = send(&app, Method::GET, "/items/?skip=1&limit=1", None, None).await;
    assert_eq!(page[0]["title"], "two");

    let (_, page) = send(&app, Method::GET, "/items/?skip=-2&limit=10", None, None).await;
    assert_eq!(page.as_array().unwrap().len(), 2);
    assert_eq!(page[0]["title"], "two");

    let (_, page) = send(&app, Method::GET, "/items/?skip=-1&limit=2", None, None).await;
    assert_eq!(page, json!([]));

    let (status, page) = send(&app, Method::GET, "/items/?skip=-5&limit=-1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page, json!([]));

    let (status, _) = send(&app, Method::GET, "/items/?skip=abc", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn system_endpoints_and_fallback() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert!(body["version"].is_string());
    assert_eq!(body["docs"], "/docs");

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());

    let (status, body) = send(&app, Method::GET, "/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Resource not found");

    let (status, _) = send(&app, Method::GET, "/items/not-a-number", None, None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn api_docs_are_served_without_auth() {
    let app = test_app();

    let (status, banner) = send(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let openapi_uri = banner["openapi"].as_str().unwrap().to_owned();

    let (status, doc) = send(&app, Method::GET, &openapi_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));
    assert!(doc["paths"]["/items/{id}"].is_object());
    assert!(doc["components"]["schemas"]["PublicUser"].is_object());

    let (status, _) = send(&app, Method::GET, "/docs/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::GET, "/redoc", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

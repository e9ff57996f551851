//! HTTP contract tests for the starter API.
//!
//! Each test drives the full router, middleware included, in-process.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use starter_api::api::{api_routes, create_router, with_middleware, AppState};
use starter_api::config::Config;
use starter_api::store::UserStore;

const FRONTEND: &str = "http://localhost:5173";

fn app() -> Router {
    create_router(AppState::new(UserStore::seeded()), &Config::default()).unwrap()
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

async fn send(app: &Router, request: Request<Body>) -> Reply {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    Reply {
        status,
        headers,
        body,
    }
}

async fn fetch(app: &Router, uri: &str) -> Reply {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_raw(app: &Router, body: &str) -> Reply {
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_user(app: &Router, user: Value) -> Reply {
    post_raw(app, &user.to_string()).await
}

async fn user_count(app: &Router) -> usize {
    fetch(app, "/api/users").await.body["data"]
        .as_array()
        .unwrap()
        .len()
}

#[tokio::test]
async fn health_always_succeeds_without_side_effects() {
    let app = app();

    for _ in 0..3 {
        let reply = fetch(&app, "/api/health").await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body["success"], true);
        assert_eq!(reply.body["message"], "Server is healthy");
        assert_eq!(reply.body["data"]["version"], "1.0.0");
        assert_eq!(reply.body["data"]["status"], "running");
        assert!(reply.body["data"]["timestamp"].is_string());
    }

    assert_eq!(user_count(&app).await, 2);
}

#[tokio::test]
async fn lists_seed_users_in_order() {
    let reply = fetch(&app(), "/api/users").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["success"], true);
    assert_eq!(reply.body["message"], "Users retrieved successfully");

    let users = reply.body["data"].as_array().unwrap();
    let ids: Vec<_> = users.iter().map(|u| u["id"].as_u64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(users[0]["name"], "John Doe");
    assert_eq!(users[1]["name"], "Jane Smith");
}

#[tokio::test]
async fn empty_store_lists_empty_array() {
    let app = create_router(AppState::new(UserStore::new()), &Config::default()).unwrap();
    let reply = fetch(&app, "/api/users").await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"], json!([]));
}

#[tokio::test]
async fn end_to_end_create_then_fetch() {
    let app = app();

    let created = post_user(&app, json!({ "name": "Ann", "email": "ann@x.com" })).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["success"], true);
    assert_eq!(created.body["message"], "User created successfully");
    assert_eq!(created.body["data"]["id"], 3);
    assert!(created.body["data"]["created_at"].is_string());

    let fetched = fetch(&app, "/api/users/3").await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["message"], "User found");
    assert_eq!(fetched.body["data"]["name"], "Ann");
    assert_eq!(fetched.body["data"]["email"], "ann@x.com");

    let missing = fetch(&app, "/api/users/999").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(
        missing.body,
        json!({ "success": false, "message": "User not found" })
    );

    let users = fetch(&app, "/api/users").await.body["data"].clone();
    assert_eq!(users.as_array().unwrap().last().unwrap()["id"], 3);
}

#[tokio::test]
async fn missing_or_empty_fields_are_rejected() {
    let app = app();

    for body in [
        json!({ "name": "", "email": "a@b.c" }),
        json!({ "name": "Ann", "email": "" }),
        json!({ "email": "a@b.c" }),
        json!({ "name": "Ann" }),
        json!({}),
        json!({ "name": null, "email": "a@b.c" }),
        json!({ "name": "Ann", "email": null }),
        Value::Null,
    ] {
        let reply = post_user(&app, body).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            reply.body,
            json!({ "success": false, "message": "Name and email are required" })
        );
    }

    assert_eq!(user_count(&app).await, 2);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let app = app();

    for body in ["{not json", "", r#"{"name": 5, "email": "a@b.c"}"#] {
        let reply = post_raw(&app, body).await;
        assert_eq!(reply.status, StatusCode::BAD_REQUEST);
        assert_eq!(reply.body["success"], false);
        assert_eq!(reply.body["message"], "Invalid request body");
    }

    assert_eq!(user_count(&app).await, 2);
}

#[tokio::test]
async fn body_is_decoded_without_content_type() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/users")
        .body(Body::from(r#"{"name":"Bo","email":"bo@x.com"}"#))
        .unwrap();

    let reply = send(&app, request).await;
    assert_eq!(reply.status, StatusCode::CREATED);
}

#[tokio::test]
async fn non_integer_id_is_bad_request() {
    let reply = fetch(&app(), "/api/users/abc").await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.body,
        json!({ "success": false, "message": "Invalid user ID" })
    );
}

#[tokio::test]
async fn undecodable_id_segment_is_bad_request() {
    let reply = fetch(&app(), "/api/users/%FF").await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.headers["content-type"], "application/json");
    assert_eq!(
        reply.body,
        json!({ "success": false, "message": "Invalid user ID" })
    );
}

#[tokio::test]
async fn trailing_slash_lists_and_creates_users() {
    let app = app();

    let listed = fetch(&app, "/api/users/").await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body["data"].as_array().unwrap().len(), 2);

    let request = Request::builder()
        .method("POST")
        .uri("/api/users/")
        .body(Body::from(r#"{"name":"Ann","email":"ann@x.com"}"#))
        .unwrap();
    let created = send(&app, request).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["id"], 3);
}

#[tokio::test]
async fn ids_are_never_reused_across_failed_attempts() {
    let app = app();
    let mut assigned = Vec::new();

    for i in 0..5 {
        post_user(&app, json!({ "name": "", "email": "x@x.com" })).await;
        post_raw(&app, "garbage").await;

        let reply = post_user(&app, json!({ "name": format!("u{i}"), "email": "u@x.com" })).await;
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.body["message"], "User created successfully");
        assigned.push(reply.body["data"]["id"].as_u64().unwrap());
    }

    assert_eq!(assigned, vec![3, 4, 5, 6, 7]);
    assert_eq!(user_count(&app).await, 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_assign_unique_ids() {
    let app = app();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let reply =
                    post_user(&app, json!({ "name": format!("c{i}"), "email": "c@x.com" })).await;
                reply.body["data"]["id"].as_u64().unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort_unstable();

    assert_eq!(ids, (3..35).collect::<Vec<u64>>());
    assert_eq!(user_count(&app).await, 34);
}

#[tokio::test]
async fn cors_preflight_allows_frontend_origin() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/users")
        .header("origin", FRONTEND)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let reply = send(&app(), request).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers["access-control-allow-origin"], FRONTEND);
    assert_eq!(reply.headers["access-control-allow-credentials"], "true");
    assert_eq!(reply.headers["access-control-max-age"], "300");
    let methods = reply.headers["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }
}

#[tokio::test]
async fn cors_ignores_other_origins() {
    let request = Request::builder()
        .uri("/api/health")
        .header("origin", "http://evil.example")
        .body(Body::empty())
        .unwrap();

    let reply = send(&app(), request).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn cors_uses_configured_origin() {
    let config = Config {
        frontend_url: "https://app.example.com".to_string(),
        ..Config::default()
    };
    let app = create_router(AppState::default(), &config).unwrap();
    let request = Request::builder()
        .uri("/api/health")
        .header("origin", "https://app.example.com")
        .body(Body::empty())
        .unwrap();

    let reply = send(&app, request).await;
    assert_eq!(
        reply.headers["access-control-allow-origin"],
        "https://app.example.com"
    );
}

#[tokio::test]
async fn request_id_is_assigned_and_echoed() {
    let app = app();

    let assigned = fetch(&app, "/api/health").await;
    let id = assigned.headers["x-request-id"].to_str().unwrap();
    assert!(!id.is_empty());

    let request = Request::builder()
        .uri("/api/health")
        .header("x-request-id", "client-supplied-42")
        .body(Body::empty())
        .unwrap();
    let echoed = send(&app, request).await;
    assert_eq!(echoed.headers["x-request-id"], "client-supplied-42");
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn panics_become_500_and_service_keeps_running() {
    let router = Router::new()
        .nest("/api", api_routes())
        .route("/boom", get(explode))
        .with_state(AppState::default());
    let app = with_middleware(router, FRONTEND.parse().unwrap());

    let reply = fetch(&app, "/boom").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        reply.body,
        json!({ "success": false, "message": "Internal server error" })
    );
    assert!(reply.headers.get("x-request-id").is_some());

    let after = fetch(&app, "/api/health").await;
    assert_eq!(after.status, StatusCode::OK);
}

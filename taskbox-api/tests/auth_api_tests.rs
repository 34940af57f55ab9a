/// Request-level tests for registration and login
///
/// Unlike the task endpoint tests, these build the router with the real JWT
/// authenticator so the full register -> token -> authenticated request flow
/// is exercised end to end.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use taskbox_api::app::{build_router, AppState};
use taskbox_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskbox_shared::auth::authenticator::JwtAuthenticator;
use taskbox_shared::db::migrations::run_migrations;
use taskbox_shared::db::pool;
use tower::ServiceExt;

const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
    }
}

async fn test_app() -> Router {
    let db = pool::create_pool(pool::DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_seconds: 5,
        idle_timeout_seconds: None,
        max_lifetime_seconds: None,
    })
    .await
    .expect("failed to create pool");

    run_migrations(&db).await.expect("migrations failed");

    let state = AppState::new(
        db,
        test_config(),
        Arc::new(JwtAuthenticator::new(JWT_SECRET.to_string())),
    );
    build_router(state)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

async fn register(app: &Router, email: &str, password: &str) -> axum::response::Response {
    app.clone()
        .oneshot(json_request(
            Method::POST,
            "/v1/auth/register",
            json!({"email": email, "password": password}),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_issues_a_usable_token() {
    let app = test_app().await;

    let response = register(&app, "alice@example.com", "correct horse battery").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    let token = body["access_token"].as_str().expect("missing access_token");
    assert!(body["user_id"].is_string());

    // The issued token authenticates real requests.
    let listed = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/v1/tasks")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(json_body(listed).await, json!([]));
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = test_app().await;

    let response = register(&app, "alice@example.com", "short").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts_case_insensitively() {
    let app = test_app().await;

    let first = register(&app, "alice@example.com", "correct horse battery").await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = register(&app, "ALICE@EXAMPLE.COM", "another password!").await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_with_valid_credentials() {
    let app = test_app().await;
    register(&app, "alice@example.com", "correct horse battery").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/v1/auth/login",
            json!({"email": "alice@example.com", "password": "correct horse battery"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = test_app().await;
    register(&app, "alice@example.com", "correct horse battery").await;

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/v1/auth/login",
            json!({"email": "alice@example.com", "password": "wrong password!"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_with_unknown_email_matches_wrong_password_response() {
    let app = test_app().await;
    register(&app, "alice@example.com", "correct horse battery").await;

    let wrong_password = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/v1/auth/login",
            json!({"email": "alice@example.com", "password": "wrong password!"}),
        ))
        .await
        .unwrap();
    let unknown_email = app
        .oneshot(json_request(
            Method::POST,
            "/v1/auth/login",
            json!({"email": "nobody@example.com", "password": "wrong password!"}),
        ))
        .await
        .unwrap();

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(wrong_password).await,
        json_body(unknown_email).await
    );
}

#[tokio::test]
async fn test_non_bearer_scheme_is_unauthorized() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/v1/tasks")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_garbage_bearer_token_is_unauthorized() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/v1/tasks")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

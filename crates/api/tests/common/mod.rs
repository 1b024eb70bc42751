#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chapterhouse_api::auth::jwt::{issue_principal_token, PrincipalTokenConfig};
use chapterhouse_api::config::{ServerConfig, StoreBackend};
use chapterhouse_api::router::build_app_router;
use chapterhouse_api::services::credentials::StaticCredentialRegistry;
use chapterhouse_api::state::AppState;
use chapterhouse_core::identity::{Principal, DIRECT_CREDENTIAL_PROVIDER};
use chapterhouse_core::roles::Role;
use chapterhouse_db::models::account::Account;
use chapterhouse_db::models::pitch::CreatePitch;
use chapterhouse_db::store::{DirectoryStore, MemoryDirectoryStore};
use http_body_util::BodyExt;
use tower::ServiceExt;

const TEST_SECRET: &str = "integration-test-secret-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        database_url: None,
        principal_token: PrincipalTokenConfig {
            secret: TEST_SECRET.to_string(),
            issuer: None,
        },
        credential_lookup_url: None,
        store_retry_attempts: 2,
        bootstrap_super_admin_email: None,
    }
}

/// A running app plus direct access to its store for fixtures and
/// assertions.
#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryDirectoryStore>,
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> TestApp {
    build_test_app_with_credentials(StaticCredentialRegistry::default())
}

/// Like [`build_test_app`], with emails the auth provider already knows.
pub fn build_test_app_with_credentials(credentials: StaticCredentialRegistry) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryDirectoryStore::new());
    let state = AppState {
        store: store.clone(),
        credentials: Arc::new(credentials),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
    }
}

// ---------------------------------------------------------------------------
// Principals and fixtures
// ---------------------------------------------------------------------------

pub fn token_for(subject: &str, email: Option<&str>, provider: &str) -> String {
    let principal = Principal {
        subject_id: subject.to_string(),
        email: email.map(String::from),
        provider: provider.to_string(),
    };
    issue_principal_token(&principal, 3600, &test_config().principal_token)
        .expect("token signing should succeed")
}

/// Token for a federated (Google) sign-in.
pub fn google_token(subject: &str, email: &str) -> String {
    token_for(subject, Some(email), "google.com")
}

/// Token for an email + password sign-up.
pub fn password_token(subject: &str, email: &str) -> String {
    token_for(subject, Some(email), DIRECT_CREDENTIAL_PROVIDER)
}

/// Insert an account and return a token for it.
pub async fn seed_account(
    app: &TestApp,
    id: &str,
    email: &str,
    role: Role,
    chapter: Option<&str>,
) -> String {
    let now = chrono::Utc::now();
    app.store
        .seed_account(Account {
            id: id.to_string(),
            email: email.to_string(),
            name: format!("Name of {id}"),
            role: role.as_str().to_string(),
            chapter: chapter.map(String::from),
            created_at: now,
            updated_at: now,
        })
        .await;
    google_token(id, email)
}

pub async fn seed_pitch(app: &TestApp, id: &str, chapter: &str) {
    app.store
        .insert_pitch(&CreatePitch {
            id: id.to_string(),
            founder_name: "Founder".to_string(),
            email: format!("{}@founders.org", id.to_lowercase()),
            chapter: chapter.to_string(),
            business_name: format!("Business {id}"),
            summary: Some("Neighborhood bakery".to_string()),
            video_url: None,
        })
        .await
        .expect("pitch insert should succeed");
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, "GET", uri, None, None).await
}

pub async fn get_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, "GET", uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, "POST", uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, "POST", uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, "PUT", uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: &TestApp,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, "PATCH", uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &TestApp, uri: &str, token: &str) -> Response<Body> {
    send(app, "DELETE", uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

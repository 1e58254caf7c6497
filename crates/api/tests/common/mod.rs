#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use missionboard_api::auth::jwt::{Claims, JwtConfig, AUDIENCE};
use missionboard_api::config::{ServerConfig, StoreConfig};
use missionboard_api::router::build_app_router;
use missionboard_api::sessions::BoardRegistry;
use missionboard_api::state::AppState;
use missionboard_core::campaign::{Campaign, CampaignStatus};
use missionboard_core::partition::PartitionPolicy;
use missionboard_core::types::DbId;
use missionboard_store::auth_admin::MemoryAuthAdmin;
use missionboard_store::memory::MemoryStore;
use missionboard_store::StaticConnector;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
///
/// The store settings are placeholders; tests run against a [`MemoryStore`].
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
        store: StoreConfig {
            url: "http://localhost:54321".to_string(),
            anon_key: "anon".to_string(),
            service_role_key: "service".to_string(),
            timeout_secs: 10,
        },
        partition_policy: PartitionPolicy::StatusDriven,
        session_idle_secs: 1800,
    }
}

/// Build the full application router on top of an in-memory store.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_test_app_with(store, PartitionPolicy::StatusDriven)
}

pub fn build_test_app_with(store: Arc<MemoryStore>, policy: PartitionPolicy) -> Router {
    build_app(store, Arc::new(MemoryAuthAdmin::new()), policy)
}

/// Router whose account management goes to `auth`.
pub fn build_test_app_with_auth(store: Arc<MemoryStore>, auth: Arc<MemoryAuthAdmin>) -> Router {
    build_app(store, auth, PartitionPolicy::StatusDriven)
}

fn build_app(
    store: Arc<MemoryStore>,
    auth: Arc<MemoryAuthAdmin>,
    policy: PartitionPolicy,
) -> Router {
    let config = ServerConfig {
        partition_policy: policy,
        ..test_config()
    };
    let state = AppState {
        connector: Arc::new(StaticConnector::new(store).with_auth_admin(auth)),
        config: Arc::new(config.clone()),
        boards: Arc::new(BoardRegistry::new(policy)),
    };
    build_app_router(state, &config)
}

/// Mint an access token the way the hosted auth service would.
pub fn token(user_id: DbId) -> String {
    let claims = Claims {
        sub: user_id,
        email: Some(format!("{}@example.org", &user_id.simple().to_string()[..8])),
        aud: AUDIENCE.to_string(),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("token encodes")
}

/// Insert a profile row and return its id.
pub async fn seed_profile(store: &MemoryStore, role: &str) -> DbId {
    let id = Uuid::new_v4();
    store
        .seed(
            "profiles",
            [json!({"id": id, "full_name": format!("{role} user"), "role": role})],
        )
        .await;
    id
}

/// Insert a campaign row and return it.
pub async fn seed_campaign(
    store: &MemoryStore,
    title: &str,
    status: CampaignStatus,
    priority: i32,
) -> Campaign {
    let created_at = chrono::Utc::now() - chrono::Duration::minutes(100 - i64::from(priority));
    let campaign = Campaign::new(Uuid::new_v4(), title, status, priority, created_at);
    store
        .seed(
            "campaigns",
            [serde_json::to_value(&campaign).expect("campaign serializes")],
        )
        .await;
    campaign
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<DbId>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", token(user)));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), None).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    user: DbId,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, user: DbId) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), None).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Titles of a JSON campaign list, in order.
pub fn titles(list: &serde_json::Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|c| c["title"].as_str().unwrap().to_string())
        .collect()
}

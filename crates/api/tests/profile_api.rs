//! HTTP-level integration tests for `/me` and the agency's client accounts.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get_as, post_json, put_json, seed_profile};
use missionboard_store::auth_admin::{AuthUser, MemoryAuthAdmin};
use missionboard_store::memory::MemoryStore;
use serde_json::json;

#[tokio::test]
async fn me_returns_own_profile() {
    let store = Arc::new(MemoryStore::new());
    let agency = seed_profile(&store, "agency").await;
    let app = common::build_test_app(store);

    let json = body_json(get_as(app, "/api/v1/me", agency).await).await;
    assert_eq!(json["data"]["id"], json!(agency));
    assert_eq!(json["data"]["role"], "agency");
}

#[tokio::test]
async fn update_me_trims_name() {
    let store = Arc::new(MemoryStore::new());
    let church = seed_profile(&store, "church").await;
    let app = common::build_test_app(store);

    let response = put_json(
        app,
        "/api/v1/me",
        church,
        json!({"full_name": "  Gemeinde Nord  "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["full_name"], "Gemeinde Nord");
}

#[tokio::test]
async fn update_me_rejects_empty_name() {
    let store = Arc::new(MemoryStore::new());
    let church = seed_profile(&store, "church").await;
    let app = common::build_test_app(store);

    let response = put_json(app, "/api/v1/me", church, json!({"full_name": " "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn clients_lists_church_accounts_for_agency() {
    let store = Arc::new(MemoryStore::new());
    let agency = seed_profile(&store, "agency").await;
    seed_profile(&store, "church").await;
    seed_profile(&store, "client").await;
    let app = common::build_test_app(store);

    let response = get_as(app, "/api/v1/clients", agency).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let clients = json["data"].as_array().unwrap();
    assert_eq!(clients.len(), 2);
    assert!(clients.iter().all(|c| c["role"] == "church"));
}

#[tokio::test]
async fn clients_is_forbidden_for_church() {
    let store = Arc::new(MemoryStore::new());
    let church = seed_profile(&store, "church").await;
    let app = common::build_test_app(store);

    let response = get_as(app, "/api/v1/clients", church).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn clients_carry_account_email() {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuthAdmin::new());
    let agency = seed_profile(&store, "agency").await;
    let nord = seed_profile(&store, "church").await;
    seed_profile(&store, "church").await;
    auth.seed([AuthUser {
        id: nord,
        email: Some("nord@example.org".into()),
    }])
    .await;
    let app = common::build_test_app_with_auth(store, auth);

    let json = body_json(get_as(app, "/api/v1/clients", agency).await).await;
    let clients = json["data"].as_array().unwrap();
    assert_eq!(clients.len(), 2);
    let email_of = |id| {
        clients
            .iter()
            .find(|c| c["id"] == json!(id))
            .map(|c| c["email"].clone())
            .unwrap()
    };
    assert_eq!(email_of(nord), "nord@example.org");
    assert!(clients.iter().any(|c| c["email"] == "Keine E-Mail"));
}

#[tokio::test]
async fn agency_onboards_client() {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuthAdmin::new());
    let agency = seed_profile(&store, "agency").await;
    let app = common::build_test_app_with_auth(Arc::clone(&store), Arc::clone(&auth));

    let response = post_json(
        app.clone(),
        "/api/v1/clients",
        agency,
        json!({"email": " nord@example.org ", "password": "geheim123", "name": "Gemeinde Nord"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["role"], "church");
    assert_eq!(data["full_name"], "Gemeinde Nord");
    assert_eq!(data["email"], "nord@example.org");

    let users = auth.users().await;
    assert_eq!(users.len(), 1);
    assert_eq!(data["id"], json!(users[0].id));

    let settings = store.rows("dashboard_settings").await;
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[0]["church_id"], json!(users[0].id));
    assert_eq!(settings[0]["agency_id"], json!(agency));
    assert_eq!(settings[0]["primary_color"], "#3b82f6");
    assert_eq!(settings[0]["welcome_message"], "Willkommen, Gemeinde Nord!");
    assert_eq!(settings[0]["show_future_projects"], true);

    let json = body_json(get_as(app, "/api/v1/clients", agency).await).await;
    assert_eq!(json["data"][0]["email"], "nord@example.org");
}

#[tokio::test]
async fn onboarding_requires_every_field() {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuthAdmin::new());
    let agency = seed_profile(&store, "agency").await;
    let app = common::build_test_app_with_auth(Arc::clone(&store), Arc::clone(&auth));

    let response = post_json(
        app,
        "/api/v1/clients",
        agency,
        json!({"email": "nord@example.org", "name": "Gemeinde Nord"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Bitte alle Felder ausfüllen.");
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(auth.users().await.is_empty());
    assert_eq!(store.rows("profiles").await.len(), 1);
}

#[tokio::test]
async fn onboarding_rejects_taken_email() {
    let store = Arc::new(MemoryStore::new());
    let auth = Arc::new(MemoryAuthAdmin::new());
    let agency = seed_profile(&store, "agency").await;
    auth.seed([AuthUser {
        id: uuid::Uuid::new_v4(),
        email: Some("nord@example.org".into()),
    }])
    .await;
    let app = common::build_test_app_with_auth(Arc::clone(&store), auth);

    let response = post_json(
        app,
        "/api/v1/clients",
        agency,
        json!({"email": "nord@example.org", "password": "geheim123", "name": "Nord"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("already been registered"));
    assert_eq!(store.rows("profiles").await.len(), 1);
    assert!(store.rows("dashboard_settings").await.is_empty());
}

#[tokio::test]
async fn church_cannot_onboard_clients() {
    let store = Arc::new(MemoryStore::new());
    let church = seed_profile(&store, "church").await;
    let app = common::build_test_app(store);

    let response = post_json(
        app,
        "/api/v1/clients",
        church,
        json!({"email": "sued@example.org", "password": "geheim123", "name": "Sued"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

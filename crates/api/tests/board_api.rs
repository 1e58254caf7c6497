//! HTTP-level integration tests for the dashboard board and drag-and-drop.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, delete, get_as, post_empty, post_json, put_json, seed_campaign, seed_profile,
    titles,
};
use missionboard_core::campaign::{Campaign, CampaignStatus};
use missionboard_store::memory::{MemoryStore, Operation};
use serde_json::json;

struct Fixture {
    store: Arc<MemoryStore>,
    live: Campaign,
    prep: Campaign,
    waiting: Campaign,
}

async fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let live = seed_campaign(&store, "Ostern", CampaignStatus::Live, 1).await;
    let prep = seed_campaign(&store, "Sommerfest", CampaignStatus::InPreparation, 2).await;
    let waiting = seed_campaign(&store, "Advent", CampaignStatus::Waiting, 3).await;
    Fixture {
        store,
        live,
        prep,
        waiting,
    }
}

async fn stored_campaign(store: &MemoryStore, id: uuid::Uuid) -> serde_json::Value {
    store
        .rows("campaigns")
        .await
        .into_iter()
        .find(|row| row["id"] == json!(id))
        .expect("campaign row exists")
}

// ---------------------------------------------------------------------------
// Dashboard view
// ---------------------------------------------------------------------------

#[tokio::test]
async fn board_splits_campaigns_by_status() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let response = get_as(app, "/api/v1/board", church).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["policy"], "status");
    assert_eq!(titles(&data["active"]), ["Ostern", "Sommerfest"]);
    assert_eq!(titles(&data["future"]), ["Advent"]);
    assert_eq!(data["show_future"], true);
    assert_eq!(data["branding_stored"], false);
    assert_eq!(data["branding"]["primary_color"], "#3b82f6");
    assert_eq!(data["profile"]["role"], "church");
}

#[tokio::test]
async fn first_request_creates_church_profile() {
    let f = fixture().await;
    let app = common::build_test_app(Arc::clone(&f.store));
    let newcomer = uuid::Uuid::new_v4();

    let response = get_as(app, "/api/v1/board", newcomer).await;
    assert_eq!(response.status(), StatusCode::OK);

    let profiles = f.store.rows("profiles").await;
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["role"], "church");
}

#[tokio::test]
async fn hidden_future_bucket_is_empty_for_church() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    f.store
        .seed(
            "dashboard_settings",
            [json!({
                "church_id": church,
                "primary_color": "#ff0000",
                "welcome_message": "Willkommen",
                "show_future_projects": false,
            })],
        )
        .await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let json = body_json(get_as(app, "/api/v1/board", church).await).await;
    let data = &json["data"];
    assert_eq!(data["show_future"], false);
    assert!(data["future"].as_array().unwrap().is_empty());
    assert_eq!(data["branding"]["welcome_message"], "Willkommen");
}

#[tokio::test]
async fn agency_sees_hidden_future_bucket_marked() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let agency = seed_profile(&f.store, "agency").await;
    f.store
        .seed(
            "dashboard_settings",
            [json!({
                "church_id": church,
                "primary_color": "#ff0000",
                "welcome_message": "Willkommen",
                "show_future_projects": false,
            })],
        )
        .await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let uri = format!("/api/v1/board?church_id={church}");
    let json = body_json(get_as(app, &uri, agency).await).await;
    let data = &json["data"];
    assert_eq!(data["show_future"], true);
    assert_eq!(data["future_agency_only"], true);
    assert_eq!(titles(&data["future"]), ["Advent"]);
}

// ---------------------------------------------------------------------------
// Drag and drop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reorder_within_active_persists() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.prep.id, "over": {"type": "campaign", "id": f.live.id}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["outcome"], "persisted");
    assert_eq!(data["writes"], 2);
    assert!(data["status_change"].is_null());
    assert_eq!(titles(&data["active"]), ["Sommerfest", "Ostern"]);

    assert_eq!(stored_campaign(&f.store, f.prep.id).await["priority"], 1);
    assert_eq!(stored_campaign(&f.store, f.live.id).await["priority"], 2);
}

#[tokio::test]
async fn drag_into_active_changes_status() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.waiting.id, "over": {"type": "bucket", "id": "active"}}),
    )
    .await;
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["outcome"], "persisted");
    assert_eq!(data["status_change"]["to"], "in_preparation");
    assert_eq!(titles(&data["active"]), ["Ostern", "Sommerfest", "Advent"]);
    assert!(data["future"].as_array().unwrap().is_empty());

    let row = stored_campaign(&f.store, f.waiting.id).await;
    assert_eq!(row["status"], "in_preparation");
    assert_eq!(row["priority"], 3);
}

#[tokio::test]
async fn drop_outside_any_target_is_noop() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.prep.id}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "noop");
    assert_eq!(titles(&json["data"]["active"]), ["Ostern", "Sommerfest"]);
}

#[tokio::test]
async fn failed_write_reverts_to_stored_order() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    f.store
        .fail_on(Operation::Upsert, "campaigns", "connection reset")
        .await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.prep.id, "over": {"type": "campaign", "id": f.live.id}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["outcome"], "reverted");
    assert_eq!(data["error"], "connection reset");
    assert_eq!(titles(&data["active"]), ["Ostern", "Sommerfest"]);
    assert_eq!(stored_campaign(&f.store, f.prep.id).await["priority"], 2);
}

#[tokio::test]
async fn agency_cannot_reorder() {
    let f = fixture().await;
    let agency = seed_profile(&f.store, "agency").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        agency,
        json!({"active_id": f.prep.id, "over": {"type": "campaign", "id": f.live.id}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(stored_campaign(&f.store, f.prep.id).await["priority"], 2);
}

#[tokio::test]
async fn drag_over_previews_until_cancelled() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    let response = post_json(
        app.clone(),
        "/api/v1/board/drag-over",
        church,
        json!({"active_id": f.prep.id, "over": {"type": "campaign", "id": f.live.id}}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["changed"], true);
    assert_eq!(titles(&json["data"]["active"]), ["Sommerfest", "Ostern"]);

    let response = post_empty(app.clone(), "/api/v1/board/drag-cancel", church).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["changed"], true);
    assert_eq!(titles(&json["data"]["active"]), ["Ostern", "Sommerfest"]);

    // Nothing was written.
    assert_eq!(stored_campaign(&f.store, f.prep.id).await["priority"], 2);
}

#[tokio::test]
async fn sync_picks_up_external_changes() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    // Open the session.
    get_as(app.clone(), "/api/v1/board", church).await;
    seed_campaign(&f.store, "Erntedank", CampaignStatus::Live, 4).await;

    let json = body_json(post_empty(app, "/api/v1/board/sync", church).await).await;
    assert_eq!(
        titles(&json["data"]["active"]),
        ["Ostern", "Sommerfest", "Erntedank"]
    );
}

// ---------------------------------------------------------------------------
// Several actors on the same campaigns
// ---------------------------------------------------------------------------

#[tokio::test]
async fn board_reflects_edits_made_by_others() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let agency = seed_profile(&f.store, "agency").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    get_as(app.clone(), "/api/v1/board", church).await;
    let uri = format!("/api/v1/campaigns/{}/status", f.waiting.id);
    let response = put_json(app.clone(), &uri, agency, json!({"status": "live"})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_as(app, "/api/v1/board", church).await).await;
    assert_eq!(
        titles(&json["data"]["active"]),
        ["Ostern", "Sommerfest", "Advent"]
    );
    assert!(json["data"]["future"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn drag_after_delete_elsewhere_does_not_restore_the_campaign() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let agency = seed_profile(&f.store, "agency").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    get_as(app.clone(), "/api/v1/board", church).await;
    let response = post_json(
        app.clone(),
        "/api/v1/campaigns",
        agency,
        json!({"title": "Neu"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let uri = format!("/api/v1/campaigns/{}", f.live.id);
    assert_eq!(
        delete(app.clone(), &uri, agency).await.status(),
        StatusCode::NO_CONTENT
    );

    let json = body_json(get_as(app.clone(), "/api/v1/board", church).await).await;
    assert_eq!(titles(&json["data"]["active"]), ["Sommerfest"]);
    assert_eq!(titles(&json["data"]["future"]), ["Advent", "Neu"]);

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.prep.id, "over": {"type": "campaign", "id": f.live.id}}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "noop");

    let rows = f.store.rows("campaigns").await;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|row| row["id"] != json!(f.live.id)));
}

#[tokio::test]
async fn drag_end_without_fresh_read_sees_deletes_elsewhere() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let agency = seed_profile(&f.store, "agency").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    get_as(app.clone(), "/api/v1/board", church).await;
    let uri = format!("/api/v1/campaigns/{}", f.live.id);
    delete(app.clone(), &uri, agency).await;

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.waiting.id, "over": {"type": "bucket", "id": "active"}}),
    )
    .await;
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["outcome"], "persisted");
    assert_eq!(data["writes"], 2);
    assert_eq!(titles(&data["active"]), ["Sommerfest", "Advent"]);

    let rows = f.store.rows("campaigns").await;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row["id"] != json!(f.live.id)));
    assert_eq!(stored_campaign(&f.store, f.waiting.id).await["priority"], 3);
}

#[tokio::test]
async fn drag_end_after_create_elsewhere_keeps_the_new_campaign() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let agency = seed_profile(&f.store, "agency").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    get_as(app.clone(), "/api/v1/board", church).await;
    let response = post_json(
        app.clone(),
        "/api/v1/campaigns",
        agency,
        json!({"title": "Neu"}),
    )
    .await;
    let created: uuid::Uuid =
        serde_json::from_value(body_json(response).await["data"]["id"].clone()).unwrap();

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.waiting.id, "over": {"type": "bucket", "id": "active"}}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"], "persisted");
    assert_eq!(titles(&json["data"]["future"]), ["Neu"]);

    let rows = f.store.rows("campaigns").await;
    assert_eq!(rows.len(), 4);
    let neu = stored_campaign(&f.store, created).await;
    assert_eq!(neu["status"], "waiting");
    assert_eq!(neu["priority"], 4);
}

#[tokio::test]
async fn drag_in_progress_is_not_disturbed_by_reads() {
    let f = fixture().await;
    let church = seed_profile(&f.store, "church").await;
    let app = common::build_test_app(Arc::clone(&f.store));

    post_json(
        app.clone(),
        "/api/v1/board/drag-over",
        church,
        json!({"active_id": f.prep.id, "over": {"type": "campaign", "id": f.live.id}}),
    )
    .await;
    let json = body_json(get_as(app.clone(), "/api/v1/board", church).await).await;
    assert_eq!(titles(&json["data"]["active"]), ["Sommerfest", "Ostern"]);

    let response = post_json(
        app,
        "/api/v1/board/drag-end",
        church,
        json!({"active_id": f.prep.id, "over": {"type": "campaign", "id": f.live.id}}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["outcome"], "persisted");
    assert_eq!(stored_campaign(&f.store, f.prep.id).await["priority"], 1);
}

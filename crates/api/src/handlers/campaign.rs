//! Handlers for the `/campaigns` resource.
//!
//! Mutations go through the viewer's board session so the board stays in
//! step with what was written.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use missionboard_core::campaign::{Campaign, CampaignStatus, PriorityLevel};
use missionboard_core::error::CoreError;
use missionboard_core::types::DbId;
use missionboard_store::models::campaign::{CompleteCampaign, CreateCampaign, UpdateCampaign};
use missionboard_store::models::lead::Lead;
use missionboard_store::repositories::{CampaignRepo, LeadRepo};
use serde::Deserialize;

use super::open_board;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::Viewer;
use crate::middleware::rbac::RequireEditor;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetStatus {
    pub status: CampaignStatus,
}

#[derive(Debug, Deserialize)]
pub struct SetPriorityLevel {
    pub priority_level: PriorityLevel,
}

/// GET /api/v1/campaigns/archive
pub async fn list_archive(
    State(state): State<AppState>,
    viewer: Viewer,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    let model = state.boards.policy().archive_model();
    let campaigns = CampaignRepo::list_archived(viewer.store.as_ref(), model).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/v1/campaigns
pub async fn create(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<DataResponse<Campaign>>)> {
    let mut board = open_board(&state, &viewer).await?;
    let campaign = board
        .create(viewer.store.as_ref(), &input, Some(viewer.user_id()))
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    viewer: Viewer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = CampaignRepo::find_by_id(viewer.store.as_ref(), id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let mut board = open_board(&state, &viewer).await?;
    let campaign = board
        .update_details(viewer.store.as_ref(), id, &input)
        .await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let mut board = open_board(&state, &viewer).await?;
    board.delete(viewer.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/campaigns/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatus>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let mut board = open_board(&state, &viewer).await?;
    let campaign = board
        .set_status(viewer.store.as_ref(), id, input.status)
        .await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}/priority-level
pub async fn set_priority_level(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<SetPriorityLevel>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let mut board = open_board(&state, &viewer).await?;
    let campaign = board
        .set_priority_level(viewer.store.as_ref(), id, input.priority_level)
        .await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// POST /api/v1/campaigns/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteCampaign>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let mut board = open_board(&state, &viewer).await?;
    let campaign = board
        .complete(viewer.store.as_ref(), id, &input)
        .await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// POST /api/v1/campaigns/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let mut board = open_board(&state, &viewer).await?;
    let campaign = board
        .archive(viewer.store.as_ref(), id)
        .await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// POST /api/v1/campaigns/{id}/reuse
pub async fn reuse(
    State(state): State<AppState>,
    RequireEditor(viewer): RequireEditor,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let mut board = open_board(&state, &viewer).await?;
    let campaign = board
        .reuse(viewer.store.as_ref(), id)
        .await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// GET /api/v1/campaigns/{id}/leads
pub async fn list_leads(
    viewer: Viewer,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let leads = LeadRepo::list_by_campaign(viewer.store.as_ref(), id).await?;
    Ok(Json(DataResponse { data: leads }))
}

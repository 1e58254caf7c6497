//! Handlers for per-church dashboard branding.

use axum::extract::Path;
use axum::Json;
use missionboard_core::error::CoreError;
use missionboard_core::roles::Role;
use missionboard_core::types::DbId;
use missionboard_store::models::dashboard_settings::{
    Branding, DashboardSettingsRow, UpsertDashboardSettings,
};
use missionboard_store::models::validate_input;
use missionboard_store::repositories::DashboardSettingsRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::Viewer;
use crate::middleware::rbac::RequireAgency;
use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub church_id: DbId,
    #[serde(flatten)]
    pub branding: Branding,
    /// `false` when nothing is stored and the defaults are returned.
    pub stored: bool,
}

/// GET /api/v1/settings/{church_id}
///
/// A church may only read its own settings.
pub async fn get(
    viewer: Viewer,
    Path(church_id): Path<DbId>,
) -> AppResult<Json<DataResponse<SettingsView>>> {
    if viewer.role() == Role::Church && viewer.user_id() != church_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Churches can only read their own settings".into(),
        )));
    }
    let settings = DashboardSettingsRepo::find_by_church(viewer.store.as_ref(), church_id).await?;
    Ok(Json(DataResponse {
        data: SettingsView {
            church_id,
            branding: settings.as_ref().map(Branding::from).unwrap_or_default(),
            stored: settings.is_some(),
        },
    }))
}

/// PUT /api/v1/settings/{church_id}
///
/// Fields left out of the body keep their stored value, or the default if
/// nothing is stored yet.
pub async fn put(
    RequireAgency(viewer): RequireAgency,
    Path(church_id): Path<DbId>,
    Json(input): Json<UpsertDashboardSettings>,
) -> AppResult<Json<DataResponse<SettingsView>>> {
    validate_input(&input)?;
    let store = viewer.store.as_ref();
    let current = DashboardSettingsRepo::find_by_church(store, church_id)
        .await?
        .as_ref()
        .map(Branding::from)
        .unwrap_or_default();
    let row = DashboardSettingsRow::merged(church_id, Some(viewer.user_id()), current, &input);
    let saved = DashboardSettingsRepo::upsert(store, &row).await?;
    tracing::info!(%church_id, agency_id = %viewer.user_id(), "Dashboard settings saved");
    Ok(Json(DataResponse {
        data: SettingsView {
            church_id,
            branding: Branding::from(&saved),
            stored: true,
        },
    }))
}

//! Handlers for the signed-in user's own profile.

use axum::Json;
use missionboard_core::error::CoreError;
use missionboard_store::models::profile::{Profile, UpdateProfile};
use missionboard_store::models::validate_input;
use missionboard_store::repositories::ProfileRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::Viewer;
use crate::response::DataResponse;

/// GET /api/v1/me
pub async fn get_me(viewer: Viewer) -> AppResult<Json<DataResponse<Profile>>> {
    Ok(Json(DataResponse { data: viewer.profile }))
}

/// PUT /api/v1/me
pub async fn update_me(
    viewer: Viewer,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<Profile>>> {
    validate_input(&input)?;
    let input = UpdateProfile {
        full_name: input.full_name.trim().to_string(),
    };
    let id = viewer.user_id();
    let profile = ProfileRepo::update(viewer.store.as_ref(), id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id,
        }))?;
    Ok(Json(DataResponse { data: profile }))
}

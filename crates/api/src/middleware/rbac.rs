//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`Viewer`] and rejects requests whose profile role
//! lacks the permission. The store's row-level policies still apply on top.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use missionboard_core::roles::{require_agency, require_editor, require_reorder};

use super::auth::Viewer;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `agency` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn agency_only(RequireAgency(viewer): RequireAgency) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAgency(pub Viewer);

impl FromRequestParts<AppState> for RequireAgency {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let viewer = Viewer::from_request_parts(parts, state).await?;
        require_agency(viewer.role())?;
        Ok(RequireAgency(viewer))
    }
}

/// Requires a role that may create and modify campaigns.
pub struct RequireEditor(pub Viewer);

impl FromRequestParts<AppState> for RequireEditor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let viewer = Viewer::from_request_parts(parts, state).await?;
        require_editor(viewer.role())?;
        Ok(RequireEditor(viewer))
    }
}

/// Requires the church (client) role, which owns drag-and-drop ordering.
pub struct RequireReorder(pub Viewer);

impl FromRequestParts<AppState> for RequireReorder {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let viewer = Viewer::from_request_parts(parts, state).await?;
        require_reorder(viewer.role())?;
        Ok(RequireReorder(viewer))
    }
}

//! Handlers for the `/board` resource: the dashboard view and drag gestures.

use axum::extract::{Query, State};
use axum::Json;
use missionboard_core::campaign::Campaign;
use missionboard_core::reorder::DragEvent;
use missionboard_core::roles::Role;
use missionboard_core::types::DbId;
use missionboard_store::models::dashboard_settings::Branding;
use missionboard_store::models::profile::Profile;
use missionboard_store::repositories::DashboardSettingsRepo;
use missionboard_store::{Board, DragOutcome, RemoteStore};
use serde::{Deserialize, Serialize};

use super::{lock_board, open_board};
use crate::error::AppResult;
use crate::middleware::auth::Viewer;
use crate::middleware::rbac::RequireReorder;
use crate::response::DataResponse;
use crate::state::AppState;

/// The two buckets as currently shown.
#[derive(Debug, Serialize)]
pub struct BoardLists {
    pub policy: &'static str,
    pub active: Vec<Campaign>,
    pub future: Vec<Campaign>,
    /// Priority a newly created campaign would get.
    pub next_priority: i32,
}

impl BoardLists {
    fn of(board: &Board) -> Self {
        let part = board.partition();
        Self {
            policy: board.policy().name(),
            active: part.active,
            future: part.future,
            next_priority: board.next_priority(),
        }
    }
}

/// Everything the dashboard page renders.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub profile: Profile,
    pub branding: Branding,
    /// `false` when no stored settings exist and defaults are shown.
    pub branding_stored: bool,
    #[serde(flatten)]
    pub lists: BoardLists,
    /// Whether the future bucket is part of this view.
    pub show_future: bool,
    /// The future bucket is shown to agency staff but hidden from the client.
    pub future_agency_only: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    /// Agency only: whose branding to preview. Church viewers always get
    /// their own.
    pub church_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
pub struct DragPreview {
    /// Whether the preview differs from the pre-drag order.
    pub changed: bool,
    #[serde(flatten)]
    pub lists: BoardLists,
}

#[derive(Debug, Serialize)]
pub struct DragResult {
    #[serde(flatten)]
    pub outcome: DragOutcome,
    #[serde(flatten)]
    pub lists: BoardLists,
}

async fn dashboard_view(
    store: &dyn RemoteStore,
    viewer: &Viewer,
    board: &Board,
    church_id: Option<DbId>,
) -> AppResult<DashboardView> {
    let branding_owner = match viewer.role() {
        Role::Church => Some(viewer.user_id()),
        Role::Agency => church_id,
    };
    let settings = match branding_owner {
        Some(id) => DashboardSettingsRepo::find_by_church(store, id).await?,
        None => None,
    };
    let branding = settings.as_ref().map(Branding::from).unwrap_or_default();

    let client_sees_future = branding.show_future_projects;
    let show_future = client_sees_future || viewer.role() == Role::Agency;
    let mut lists = BoardLists::of(board);
    if !show_future {
        lists.future.clear();
    }

    Ok(DashboardView {
        profile: viewer.profile.clone(),
        branding,
        branding_stored: settings.is_some(),
        lists,
        show_future,
        future_agency_only: show_future && !client_sees_future,
    })
}

/// GET /api/v1/board
pub async fn get_board(
    State(state): State<AppState>,
    viewer: Viewer,
    Query(query): Query<BoardQuery>,
) -> AppResult<Json<DataResponse<DashboardView>>> {
    let board = open_board(&state, &viewer).await?;
    let view = dashboard_view(viewer.store.as_ref(), &viewer, &board, query.church_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/board/sync
pub async fn sync(
    State(state): State<AppState>,
    viewer: Viewer,
) -> AppResult<Json<DataResponse<BoardLists>>> {
    let mut board = lock_board(&state, &viewer).await;
    board.sync(viewer.store.as_ref()).await?;
    Ok(Json(DataResponse {
        data: BoardLists::of(&board),
    }))
}

/// POST /api/v1/board/drag-over
pub async fn drag_over(
    State(state): State<AppState>,
    RequireReorder(viewer): RequireReorder,
    Json(event): Json<DragEvent>,
) -> AppResult<Json<DataResponse<DragPreview>>> {
    let mut board = open_board(&state, &viewer).await?;
    let changed = board.drag_over(&event);
    Ok(Json(DataResponse {
        data: DragPreview {
            changed,
            lists: BoardLists::of(&board),
        },
    }))
}

/// POST /api/v1/board/drag-end
///
/// A failed write is reported in the body (`outcome: reverted`) together
/// with the refetched lists, not as an HTTP error.
pub async fn drag_end(
    State(state): State<AppState>,
    RequireReorder(viewer): RequireReorder,
    Json(event): Json<DragEvent>,
) -> AppResult<Json<DataResponse<DragResult>>> {
    let mut board = open_board(&state, &viewer).await?;
    let outcome = board.drag_end(viewer.store.as_ref(), &event).await?;
    Ok(Json(DataResponse {
        data: DragResult {
            outcome,
            lists: BoardLists::of(&board),
        },
    }))
}

/// POST /api/v1/board/drag-cancel
pub async fn drag_cancel(
    State(state): State<AppState>,
    RequireReorder(viewer): RequireReorder,
) -> AppResult<Json<DataResponse<DragPreview>>> {
    let mut board = open_board(&state, &viewer).await?;
    let changed = board.drag_cancel();
    Ok(Json(DataResponse {
        data: DragPreview {
            changed,
            lists: BoardLists::of(&board),
        },
    }))
}

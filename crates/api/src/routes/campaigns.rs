//! Route definitions for the `/campaigns` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::campaign;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// POST   /                          -> create
/// GET    /archive                   -> list_archive
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// PUT    /{id}/status               -> set_status
/// PUT    /{id}/priority-level       -> set_priority_level
/// POST   /{id}/complete             -> complete
/// POST   /{id}/archive              -> archive
/// POST   /{id}/reuse                -> reuse
/// GET    /{id}/leads                -> list_leads
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(campaign::create))
        .route("/archive", get(campaign::list_archive))
        .route(
            "/{id}",
            get(campaign::get_by_id)
                .put(campaign::update)
                .delete(campaign::delete),
        )
        .route("/{id}/status", put(campaign::set_status))
        .route("/{id}/priority-level", put(campaign::set_priority_level))
        .route("/{id}/complete", post(campaign::complete))
        .route("/{id}/archive", post(campaign::archive))
        .route("/{id}/reuse", post(campaign::reuse))
        .route("/{id}/leads", get(campaign::list_leads))
}

//! Route definitions for the `/board` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::board;
use crate::state::AppState;

/// Routes mounted at `/board`.
///
/// ```text
/// GET    /                 -> get_board
/// POST   /sync             -> sync
/// POST   /drag-over        -> drag_over   (church only)
/// POST   /drag-end         -> drag_end    (church only)
/// POST   /drag-cancel      -> drag_cancel (church only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(board::get_board))
        .route("/sync", post(board::sync))
        .route("/drag-over", post(board::drag_over))
        .route("/drag-end", post(board::drag_end))
        .route("/drag-cancel", post(board::drag_cancel))
}

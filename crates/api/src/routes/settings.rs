//! Route definitions for the `/settings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET    /{church_id}      -> get
/// PUT    /{church_id}      -> put (agency only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{church_id}", get(settings::get).put(settings::put))
}

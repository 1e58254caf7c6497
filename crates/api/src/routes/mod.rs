pub mod board;
pub mod campaigns;
pub mod health;
pub mod settings;

use axum::routing::get;
use axum::Router;

use crate::handlers::{clients, profile};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /me                                  get, update own profile
///
/// /board                               dashboard view (buckets + branding)
/// /board/sync                          refetch from the store (POST)
/// /board/drag-over                     preview a drag (POST, church only)
/// /board/drag-end                      commit a drag (POST, church only)
/// /board/drag-cancel                   abandon a drag (POST, church only)
///
/// /campaigns                           create (POST)
/// /campaigns/archive                   closed campaigns
/// /campaigns/{id}                      get, update, delete
/// /campaigns/{id}/status               set status (PUT)
/// /campaigns/{id}/priority-level       set priority level (PUT)
/// /campaigns/{id}/complete             close with report (POST)
/// /campaigns/{id}/archive              archive (POST)
/// /campaigns/{id}/reuse                back onto the board (POST)
/// /campaigns/{id}/leads                leads of a campaign
///
/// /clients                             list, onboard church accounts (agency only)
///
/// /settings/{church_id}                get, put dashboard branding
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .route("/clients", get(clients::list).post(clients::create))
        .nest("/board", board::router())
        .nest("/campaigns", campaigns::router())
        .nest("/settings", settings::router())
}

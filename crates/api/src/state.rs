use std::sync::Arc;

use missionboard_store::StoreConnector;

use crate::config::ServerConfig;
use crate::sessions::BoardRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Hands out store handles per credential.
    pub connector: Arc<dyn StoreConnector>,
    pub config: Arc<ServerConfig>,
    /// Open board sessions, keyed by user id.
    pub boards: Arc<BoardRegistry>,
}

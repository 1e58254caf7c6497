pub mod board;
pub mod campaign;
pub mod clients;
pub mod profile;
pub mod settings;

use missionboard_store::Board;
use tokio::sync::OwnedMutexGuard;

use crate::error::AppResult;
use crate::middleware::auth::Viewer;
use crate::state::AppState;

/// Lock the viewer's board session as it is.
pub(crate) async fn lock_board(state: &AppState, viewer: &Viewer) -> OwnedMutexGuard<Board> {
    state.boards.session(viewer.user_id()).await.lock_owned().await
}

/// Lock the viewer's board session and resync it with the store unless a
/// drag is in progress.
pub(crate) async fn open_board(
    state: &AppState,
    viewer: &Viewer,
) -> AppResult<OwnedMutexGuard<Board>> {
    let mut board = lock_board(state, viewer).await;
    board.refresh_if_idle(viewer.store.as_ref()).await?;
    Ok(board)
}

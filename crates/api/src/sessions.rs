//! Registry of per-viewer board sessions.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use missionboard_core::partition::PartitionPolicy;
use missionboard_core::types::DbId;
use missionboard_store::Board;
use tokio::sync::{Mutex, RwLock};

/// Sessions unused for this long are dropped.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct Session {
    board: Arc<Mutex<Board>>,
    last_used: Instant,
}

/// One board per user, each behind its own async mutex so requests of the
/// same viewer are applied one at a time.
///
/// A new session starts empty; callers sync it before use. Sessions idle
/// for longer than the TTL are evicted on the next access to the registry.
pub struct BoardRegistry {
    policy: PartitionPolicy,
    idle_ttl: Duration,
    sessions: RwLock<HashMap<DbId, Session>>,
}

impl BoardRegistry {
    pub fn new(policy: PartitionPolicy) -> Self {
        Self::with_idle_ttl(policy, DEFAULT_IDLE_TTL)
    }

    pub fn with_idle_ttl(policy: PartitionPolicy, idle_ttl: Duration) -> Self {
        Self {
            policy,
            idle_ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> PartitionPolicy {
        self.policy
    }

    /// The session of `user_id`, created on first use.
    pub async fn session(&self, user_id: DbId) -> Arc<Mutex<Board>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_used) < self.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Idle board sessions dropped");
        }

        let session = sessions.entry(user_id).or_insert_with(|| {
            tracing::debug!(%user_id, "Board session opened");
            Session {
                board: Arc::new(Mutex::new(Board::new(self.policy))),
                last_used: now,
            }
        });
        session.last_used = now;
        Arc::clone(&session.board)
    }

    /// Drop a session. Returns `true` if one existed.
    pub async fn remove(&self, user_id: DbId) -> bool {
        self.sessions.write().await.remove(&user_id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

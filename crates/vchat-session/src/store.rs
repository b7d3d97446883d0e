//! Session registry with per-session locking and idle eviction.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tokio::time::interval;
use tracing::{debug, info, warn};

use vchat_models::SessionId;

use crate::conversation::Conversation;

/// Maximum number of sessions to keep in memory.
/// Prevents unbounded growth from clients that never return.
const MAX_SESSIONS: usize = 10_000;

/// One browser client's server-side state.
pub struct Session {
    conversation: Mutex<Conversation>,
    last_seen: std::sync::Mutex<Instant>,
}

impl Session {
    fn new() -> Self {
        Self {
            conversation: Mutex::new(Conversation::new()),
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    /// Lock this session's conversation.
    ///
    /// All read-modify-write of history happens under this lock, and
    /// the upload/chat flows hold it across their gateway calls, so
    /// concurrent requests for one session apply in order.
    pub async fn lock_conversation(&self) -> MutexGuard<'_, Conversation> {
        self.conversation.lock().await
    }

    /// Record activity for idle-eviction purposes.
    pub fn touch(&self) {
        *self.last_seen.lock().expect("last_seen lock poisoned") = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .expect("last_seen lock poisoned")
            .elapsed()
    }
}

/// In-memory mapping from session id to session state.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
    /// Idle time after which a session is evicted
    ttl: Duration,
}

impl SessionStore {
    /// Create a new store with the given idle TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Resolve a presented token to its session, or mint a new one.
    ///
    /// Presenting an already-issued id always returns that same id;
    /// a fresh id is minted only when the caller presents none. A
    /// valid token unknown to the store (e.g. issued before a restart)
    /// is re-registered under its original id rather than replaced.
    pub async fn get_or_create(&self, presented: Option<SessionId>) -> (SessionId, Arc<Session>) {
        if let Some(id) = presented {
            if let Some(session) = self.get(id).await {
                return (id, session);
            }
            return (id, self.insert(id).await);
        }

        let id = SessionId::new();
        debug!(session_id = %id, "Minted new session");
        (id, self.insert(id).await)
    }

    /// Look up a session, refreshing its idle clock on hit.
    pub async fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(&id).cloned();
        if let Some(ref s) = session {
            s.touch();
        }
        session
    }

    async fn insert(&self, id: SessionId) -> Arc<Session> {
        let mut sessions = self.sessions.write().await;
        // Double-check after acquiring the write lock
        if let Some(existing) = sessions.get(&id) {
            existing.touch();
            return Arc::clone(existing);
        }

        if sessions.len() >= MAX_SESSIONS {
            evict_oldest(&mut sessions);
        }

        let session = Arc::new(Session::new());
        sessions.insert(id, Arc::clone(&session));
        session
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove sessions idle past the TTL. Returns how many were cut.
    pub async fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for() < self.ttl);
        before - sessions.len()
    }

    /// Background eviction loop; spawn this once at startup.
    pub async fn run_eviction(self: Arc<Self>, sweep_interval: Duration) {
        info!(
            ttl_secs = self.ttl.as_secs(),
            interval_secs = sweep_interval.as_secs(),
            "Starting session eviction sweep"
        );

        let mut ticker = interval(sweep_interval);
        loop {
            ticker.tick().await;
            let evicted = self.evict_idle().await;
            if evicted > 0 {
                let remaining = self.len().await;
                info!(evicted, remaining, "Evicted idle sessions");
            }
        }
    }
}

/// Drop the least recently seen session to stay under capacity.
fn evict_oldest(sessions: &mut HashMap<SessionId, Arc<Session>>) {
    if let Some(oldest) = sessions
        .iter()
        .max_by_key(|(_, s)| s.idle_for())
        .map(|(id, _)| *id)
    {
        warn!(session_id = %oldest, "Session store at capacity, evicting oldest");
        sessions.remove(&oldest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_mints_when_no_token_presented() {
        let store = store();
        let (a, _) = store.get_or_create(None).await;
        let (b, _) = store.get_or_create(None).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_idempotent_for_issued_token() {
        let store = store();
        let (id, _) = store.get_or_create(None).await;

        let (again, _) = store.get_or_create(Some(id)).await;
        let (thrice, _) = store.get_or_create(Some(id)).await;
        assert_eq!(id, again);
        assert_eq!(id, thrice);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_token_reregistered_not_replaced() {
        let store = store();
        let stale = SessionId::new();

        let (id, _) = store.get_or_create(Some(stale)).await;
        assert_eq!(id, stale);
        assert!(store.get(stale).await.is_some());
    }

    #[tokio::test]
    async fn test_get_unknown_returns_none() {
        let store = store();
        assert!(store.get(SessionId::new()).await.is_none());
    }

    #[tokio::test]
    async fn test_evict_idle_removes_expired() {
        let store = SessionStore::new(Duration::from_millis(10));
        let (id, _) = store.get_or_create(None).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        let evicted = store.evict_idle().await;

        assert_eq!(evicted, 1);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_activity_defers_eviction() {
        let store = SessionStore::new(Duration::from_millis(50));
        let (id, _) = store.get_or_create(None).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        // A lookup counts as activity
        assert!(store.get(id).await.is_some());
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.evict_idle().await, 0);
        assert!(store.get(id).await.is_some());
    }

    #[tokio::test]
    async fn test_conversation_survives_across_lookups() {
        let store = store();
        let (id, session) = store.get_or_create(None).await;
        session.lock_conversation().await.begin_summary("summary");

        let session = store.get(id).await.unwrap();
        let conv = session.lock_conversation().await;
        assert!(conv.has_summary());
        assert_eq!(conv.len(), 1);
    }
}

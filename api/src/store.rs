//! Session Store
//!
//! Holds one `ReflectionSession` per client. Each session sits behind its own
//! mutex so a client's actions run one at a time; sessions never share state.
//!
//! A session ends when it is deleted, when it has been idle longer than the
//! idle timeout, or when the store is full and it is the least recently used.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use reflect_core::{ReflectionSession, SessionSettings};

pub type SharedSession = Arc<Mutex<ReflectionSession>>;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

#[derive(Debug)]
struct StoreEntry {
    session: SharedSession,
    last_seen: Instant,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, StoreEntry>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with an idle timeout and a session cap (a cap of 0 is treated as 1)
    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn max_sessions(&self) -> usize {
        self.max_sessions
    }

    /// Start a new session
    pub fn create(&self, settings: SessionSettings) -> (Uuid, SharedSession) {
        self.evict_idle();
        while self.sessions.len() >= self.max_sessions {
            if !self.evict_least_recent() {
                break;
            }
        }

        let session = ReflectionSession::new(settings);
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(
            id,
            StoreEntry {
                session: shared.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session = %id, active = self.sessions.len(), "session started");
        (id, shared)
    }

    /// Look up a live session and mark it as seen
    pub fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let mut entry = self.sessions.get_mut(id)?;
        if entry.last_seen.elapsed() >= self.idle_timeout {
            drop(entry);
            self.expire(id);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Look up `id`, starting a new session when it is absent, unknown or expired
    ///
    /// The flag is true when a new session was created.
    pub fn get_or_create(
        &self,
        id: Option<Uuid>,
        settings: &SessionSettings,
    ) -> (Uuid, SharedSession, bool) {
        if let Some(id) = id {
            if let Some(shared) = self.get(&id) {
                return (id, shared, false);
            }
        }
        let (id, shared) = self.create(settings.clone());
        (id, shared, true)
    }

    /// End a session, dropping its draft and journal
    pub fn remove(&self, id: &Uuid) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session = %id, active = self.sessions.len(), "session ended");
        }
        removed
    }

    /// Drop every session idle longer than the timeout; returns how many went
    pub fn evict_idle(&self) -> usize {
        let before = self.sessions.len();
        let timeout = self.idle_timeout;
        self.sessions
            .retain(|_, entry| entry.last_seen.elapsed() < timeout);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            info!(evicted, active = self.sessions.len(), "idle sessions expired");
        }
        evicted
    }

    fn evict_least_recent(&self) -> bool {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|entry| entry.value().last_seen)
            .map(|entry| *entry.key());
        match oldest {
            Some(id) => {
                debug!(session = %id, "store full, evicting least recently used session");
                self.remove(&id)
            }
            None => false,
        }
    }

    fn expire(&self, id: &Uuid) {
        if self.sessions.remove(id).is_some() {
            info!(session = %id, active = self.sessions.len(), "session expired");
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get() {
        let store = SessionStore::new();
        let (id, session) = store.create(SessionSettings::default());
        assert_eq!(session.lock().await.id(), id);
        assert!(store.get(&id).is_some());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_reuses_known_id() {
        let store = SessionStore::new();
        let settings = SessionSettings::default();
        let (id, _, created) = store.get_or_create(None, &settings);
        assert!(created);
        let (again, _, created) = store.get_or_create(Some(id), &settings);
        assert!(!created);
        assert_eq!(again, id);

        let (fresh, _, created) = store.get_or_create(Some(Uuid::new_v4()), &settings);
        assert!(created);
        assert_ne!(fresh, id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let (_, a) = store.create(SessionSettings::default());
        let (_, b) = store.create(SessionSettings::default());
        a.lock().await.set_draft("only in a");
        assert_eq!(b.lock().await.draft(), "");
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        let (id, _) = store.create(SessionSettings::default());
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_never_exceeds_cap() {
        let store = SessionStore::with_limits(DEFAULT_IDLE_TIMEOUT, 10);
        let settings = SessionSettings::default();
        let mut last = None;
        for _ in 0..100 {
            let (id, _, created) = store.get_or_create(None, &settings);
            assert!(created);
            last = Some(id);
        }
        assert_eq!(store.len(), 10);
        assert!(store.get(&last.unwrap()).is_some());
    }

    #[test]
    fn test_cap_evicts_least_recently_seen() {
        let store = SessionStore::with_limits(DEFAULT_IDLE_TIMEOUT, 2);
        let (first, _) = store.create(SessionSettings::default());
        std::thread::sleep(Duration::from_millis(5));
        let (second, _) = store.create(SessionSettings::default());
        std::thread::sleep(Duration::from_millis(5));

        // Touching `first` makes `second` the oldest
        assert!(store.get(&first).is_some());
        let (third, _) = store.create(SessionSettings::default());

        assert_eq!(store.len(), 2);
        assert!(store.get(&first).is_some());
        assert!(store.get(&second).is_none());
        assert!(store.get(&third).is_some());
    }

    #[test]
    fn test_idle_sessions_expire() {
        let store = SessionStore::with_limits(Duration::from_millis(20), 100);
        let settings = SessionSettings::default();
        let (id, _) = store.create(settings.clone());
        store.create(settings.clone());
        std::thread::sleep(Duration::from_millis(40));

        assert!(store.get(&id).is_none());
        assert_eq!(store.evict_idle(), 1);
        assert!(store.is_empty());

        let (fresh, _, created) = store.get_or_create(Some(id), &settings);
        assert!(created);
        assert_ne!(fresh, id);
    }
}

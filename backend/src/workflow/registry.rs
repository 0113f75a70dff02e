use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::workflow::session::DiagnosisSession;

pub type SessionHandle = Arc<Mutex<DiagnosisSession>>;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

struct Entry {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory sessions. Each session sits behind its own async mutex, so
/// transitions of one session run one at a time while other sessions
/// proceed independently. Sessions untouched for longer than the TTL are
/// swept whenever a new one is created.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn create(&self) -> (String, SessionHandle) {
        let session = DiagnosisSession::new();
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            log::info!("Expired {} idle diagnosis sessions", expired);
        }

        sessions.insert(
            id.clone(),
            Entry {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        (id, handle)
    }

    /// Looks up a session and marks it as recently used.
    pub fn get(&self, id: &str) -> Option<SessionHandle> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let entry = sessions.get_mut(id)?;
        if entry.last_seen.elapsed() >= self.ttl {
            sessions.remove(id);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.handle.clone())
    }

    pub fn remove(&self, id: &str) -> Option<SessionHandle> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(|entry| entry.handle)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use super::domain::SessionId;
use super::history::{HistoryEntry, HistoryError, SessionHistory};

/// Storage abstraction holding one history per session.
pub trait HistoryStore: Send + Sync {
    fn open(&self, session: SessionId) -> Result<(), StoreError>;
    fn append(&self, session: &SessionId, entry: HistoryEntry) -> Result<usize, StoreError>;
    /// Append every entry or none of them.
    fn extend(
        &self,
        session: &SessionId,
        entries: Vec<HistoryEntry>,
    ) -> Result<usize, StoreError>;
    fn entries(&self, session: &SessionId) -> Result<Vec<HistoryEntry>, StoreError>;
    /// Discard the session and everything recorded in it.
    fn close(&self, session: &SessionId) -> Result<(), StoreError>;
}

/// Error enumeration for history store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session {0:?} already exists")]
    SessionExists(SessionId),
    #[error("unknown session {0:?}")]
    UnknownSession(SessionId),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("session limit reached ({limit} open sessions)")]
    SessionLimitReached { limit: usize },
    #[error("history store unavailable: {0}")]
    Unavailable(String),
}

/// Bounds applied by [`InMemoryHistoryStore`]. `None` leaves the dimension unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreLimits {
    /// Entries kept per session.
    pub history_cap: Option<usize>,
    /// Sessions open at the same time.
    pub max_sessions: Option<usize>,
    /// Inactivity after which a session is discarded.
    pub idle_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
struct SessionSlot {
    history: SessionHistory,
    last_active: Instant,
}

impl SessionSlot {
    fn is_idle(&self, now: Instant, timeout: Option<Duration>) -> bool {
        timeout.is_some_and(|timeout| now.saturating_duration_since(self.last_active) >= timeout)
    }
}

/// Process-local store. A session's history lives until the session is closed or sits idle
/// past the configured timeout.
#[derive(Debug, Default, Clone)]
pub struct InMemoryHistoryStore {
    sessions: Arc<Mutex<HashMap<SessionId, SessionSlot>>>,
    limits: StoreLimits,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit each session to `cap` entries when set.
    pub fn with_cap(cap: Option<usize>) -> Self {
        Self::with_limits(StoreLimits {
            history_cap: cap,
            ..StoreLimits::default()
        })
    }

    pub fn with_limits(limits: StoreLimits) -> Self {
        Self {
            sessions: Arc::default(),
            limits,
        }
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    /// Number of live sessions, after discarding idle ones.
    pub fn session_count(&self) -> Result<usize, StoreError> {
        let mut guard = self.lock()?;
        self.evict_idle(&mut guard, Instant::now());
        Ok(guard.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, SessionSlot>>, StoreError> {
        self.sessions
            .lock()
            .map_err(|_| StoreError::Unavailable("session mutex poisoned".to_string()))
    }

    fn evict_idle(&self, sessions: &mut HashMap<SessionId, SessionSlot>, now: Instant) -> usize {
        let before = sessions.len();
        sessions.retain(|_, slot| !slot.is_idle(now, self.limits.idle_timeout));
        before - sessions.len()
    }

    /// Live session slot, touched as active. Idle sessions are dropped on the way.
    fn live_slot<'a>(
        &self,
        sessions: &'a mut HashMap<SessionId, SessionSlot>,
        session: &SessionId,
    ) -> Result<&'a mut SessionSlot, StoreError> {
        let now = Instant::now();
        let idle = match sessions.get(session) {
            Some(slot) => slot.is_idle(now, self.limits.idle_timeout),
            None => return Err(StoreError::UnknownSession(session.clone())),
        };
        if idle {
            sessions.remove(session);
            return Err(StoreError::UnknownSession(session.clone()));
        }

        let slot = sessions
            .get_mut(session)
            .ok_or_else(|| StoreError::UnknownSession(session.clone()))?;
        slot.last_active = now;
        Ok(slot)
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn open(&self, session: SessionId) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        let now = Instant::now();
        let evicted = self.evict_idle(&mut guard, now);
        if evicted > 0 {
            debug!(evicted, "idle screening sessions discarded");
        }

        if guard.contains_key(&session) {
            return Err(StoreError::SessionExists(session));
        }
        if let Some(limit) = self.limits.max_sessions {
            if guard.len() >= limit {
                return Err(StoreError::SessionLimitReached { limit });
            }
        }
        guard.insert(
            session,
            SessionSlot {
                history: SessionHistory::with_cap(self.limits.history_cap),
                last_active: now,
            },
        );
        Ok(())
    }

    fn append(&self, session: &SessionId, entry: HistoryEntry) -> Result<usize, StoreError> {
        let mut guard = self.lock()?;
        let slot = self.live_slot(&mut guard, session)?;
        slot.history.append(entry)?;
        Ok(slot.history.len())
    }

    fn extend(
        &self,
        session: &SessionId,
        entries: Vec<HistoryEntry>,
    ) -> Result<usize, StoreError> {
        let mut guard = self.lock()?;
        let slot = self.live_slot(&mut guard, session)?;
        if let Some(cap) = self.limits.history_cap {
            if slot.history.len() + entries.len() > cap {
                return Err(HistoryError::CapacityReached { cap }.into());
            }
        }
        for entry in entries {
            slot.history.append(entry)?;
        }
        Ok(slot.history.len())
    }

    fn entries(&self, session: &SessionId) -> Result<Vec<HistoryEntry>, StoreError> {
        let mut guard = self.lock()?;
        let slot = self.live_slot(&mut guard, session)?;
        Ok(slot.history.entries().to_vec())
    }

    fn close(&self, session: &SessionId) -> Result<(), StoreError> {
        let mut guard = self.lock()?;
        self.live_slot(&mut guard, session)?;
        guard.remove(session);
        Ok(())
    }
}

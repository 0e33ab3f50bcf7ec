//! Session persistence.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Key/value contents of one session.
pub type SessionData = HashMap<String, serde_json::Value>;

/// Keys a request touched: `Some` for a write, `None` for a removal.
pub type SessionChanges = HashMap<String, Option<serde_json::Value>>;

/// Apply `changes` on top of `data`.
pub fn apply_changes(data: &mut SessionData, changes: &SessionChanges) {
    for (key, change) in changes {
        match change {
            Some(value) => {
                data.insert(key.clone(), value.clone());
            }
            None => {
                data.remove(key);
            }
        }
    }
}

/// Backing storage for sessions.
///
/// Methods are synchronous so a session can be flushed from `Drop`, which
/// is what guarantees the write on panic and on cancellation.
pub trait SessionStore: Send + Sync + 'static {
    fn load(&self, id: &str) -> Option<SessionData>;
    fn save(&self, id: &str, data: SessionData);
    fn remove(&self, id: &str);

    /// Merge one request's changes into the stored session. Keys the
    /// request did not touch keep whatever value the store holds now.
    /// A session left with no keys is removed.
    fn apply(&self, id: &str, changes: &SessionChanges) {
        let mut data = self.load(id).unwrap_or_default();
        apply_changes(&mut data, changes);
        if data.is_empty() {
            self.remove(id);
        } else {
            self.save(id, data);
        }
    }

    /// Drop sessions idle past their timeout. Returns how many went.
    fn purge_expired(&self) -> usize {
        0
    }
}

#[derive(Debug, Clone)]
struct StoredSession {
    data: SessionData,
    touched: Instant,
}

impl StoredSession {
    fn new(data: SessionData) -> Self {
        Self {
            data,
            touched: Instant::now(),
        }
    }
}

/// In-process session store.
///
/// With an idle timeout, a session not loaded or written for that long is
/// treated as gone and is reclaimed by [`SessionStore::purge_expired`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, StoredSession>>,
    idle_timeout: Option<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::default(),
            idle_timeout: Some(idle_timeout),
        }
    }

    /// Number of stored sessions, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn is_expired(&self, session: &StoredSession) -> bool {
        self.idle_timeout
            .is_some_and(|timeout| session.touched.elapsed() >= timeout)
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, id: &str) -> Option<SessionData> {
        let mut entry = self.inner.get_mut(id)?;
        if self.is_expired(&entry) {
            drop(entry);
            self.inner.remove(id);
            tracing::debug!(session = %id, "Session expired");
            return None;
        }
        entry.touched = Instant::now();
        Some(entry.data.clone())
    }

    fn save(&self, id: &str, data: SessionData) {
        self.inner.insert(id.to_string(), StoredSession::new(data));
    }

    fn remove(&self, id: &str) {
        self.inner.remove(id);
    }

    fn apply(&self, id: &str, changes: &SessionChanges) {
        match self.inner.entry(id.to_string()) {
            Entry::Occupied(mut occupied) => {
                let stored = occupied.get_mut();
                if self.is_expired(stored) {
                    stored.data.clear();
                }
                apply_changes(&mut stored.data, changes);
                stored.touched = Instant::now();
                if stored.data.is_empty() {
                    occupied.remove();
                }
            }
            Entry::Vacant(vacant) => {
                let mut data = SessionData::new();
                apply_changes(&mut data, changes);
                if !data.is_empty() {
                    vacant.insert(StoredSession::new(data));
                }
            }
        }
    }

    fn purge_expired(&self) -> usize {
        if self.idle_timeout.is_none() {
            return 0;
        }
        let before = self.inner.len();
        self.inner.retain(|_, session| !self.is_expired(session));
        before.saturating_sub(self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.load("a").is_none());

        let mut data = SessionData::new();
        data.insert("uid".into(), serde_json::json!(3));
        store.save("a", data);

        assert_eq!(store.load("a").unwrap()["uid"], serde_json::json!(3));
        assert_eq!(store.len(), 1);

        store.remove("a");
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_merges_with_stored_keys() {
        let store = MemoryStore::new();
        let mut data = SessionData::new();
        data.insert("uid".into(), serde_json::json!(3));
        data.insert("theme".into(), serde_json::json!("dark"));
        store.save("a", data);

        let mut changes = SessionChanges::new();
        changes.insert("flash".into(), Some(serde_json::json!("saved")));
        changes.insert("theme".into(), None);
        store.apply("a", &changes);

        let data = store.load("a").unwrap();
        assert_eq!(data["uid"], serde_json::json!(3));
        assert_eq!(data["flash"], serde_json::json!("saved"));
        assert!(!data.contains_key("theme"));

        let mut changes = SessionChanges::new();
        changes.insert("uid".into(), None);
        changes.insert("flash".into(), None);
        store.apply("a", &changes);
        assert!(store.is_empty());

        // Removals against a missing session leave nothing behind.
        store.apply("b", &changes);
        assert!(store.is_empty());
    }

    #[test]
    fn test_idle_sessions_expire() {
        let store = MemoryStore::with_idle_timeout(Duration::from_millis(20));
        let mut data = SessionData::new();
        data.insert("uid".into(), serde_json::json!(3));
        store.save("idle", data.clone());
        store.save("also-idle", data);

        std::thread::sleep(Duration::from_millis(40));
        assert!(store.load("idle").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_no_timeout_keeps_sessions() {
        let store = MemoryStore::new();
        store.save("a", SessionData::from([("uid".into(), serde_json::json!(1))]));
        assert_eq!(store.purge_expired(), 0);
        assert_eq!(store.len(), 1);
    }
}

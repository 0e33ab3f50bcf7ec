//! Per-request sessions.
//!
//! # Data Flow
//! ```text
//! start_session middleware
//!     → read session cookie → store.rs load (or start a fresh session)
//!     → Session attached to request extensions
//!     → SessionGuard armed
//!     → inner handlers read/write through the Session handle
//!     → SessionGuard dropped → changed keys merged into the store
//! ```
//!
//! # Design Decisions
//! - The handle is opaque to routing: only the middleware and application
//!   handlers look inside
//! - Flushing happens in `Drop`, so it runs on normal return, on panic
//!   unwinding and when the request future is cancelled
//! - Unknown or expired cookie ids start a new session with a new id
//! - A flush writes per-key changes, not the whole snapshot; two requests on
//!   one session only conflict on a key both of them wrote
//! - Login moves the session to a new id (`regenerate`)

pub mod reaper;
pub mod store;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Body;
use axum::http::Request;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub use reaper::SessionReaper;
pub use store::{MemoryStore, SessionChanges, SessionData, SessionStore};

#[derive(Debug)]
struct SessionState {
    id: String,
    data: SessionData,
    changes: SessionChanges,
    /// Id to delete from the store at flush after [`Session::regenerate`].
    retired_id: Option<String>,
    rotated: bool,
}

impl SessionState {
    fn new(id: String, data: SessionData) -> Self {
        Self {
            id,
            data,
            changes: SessionChanges::new(),
            retired_id: None,
            rotated: false,
        }
    }
}

/// Handle to the current request's session. Clones share state.
#[derive(Debug, Clone)]
pub struct Session {
    is_new: bool,
    state: Arc<Mutex<SessionState>>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl Session {
    /// Start an empty session with a fresh id.
    pub fn start() -> Self {
        Self {
            is_new: true,
            state: Arc::new(Mutex::new(SessionState::new(new_id(), SessionData::new()))),
        }
    }

    /// Resume a stored session.
    pub fn resume(id: &str, data: SessionData) -> Self {
        Self {
            is_new: false,
            state: Arc::new(Mutex::new(SessionState::new(id.to_string(), data))),
        }
    }

    /// The session attached to `req` by the session middleware, if any.
    pub fn from_request(req: &Request<Body>) -> Option<Self> {
        req.extensions().get::<Session>().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A handler that panicked mid-write still gets its session flushed.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> String {
        self.lock().id.clone()
    }

    /// True if this session was started during the current request.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// True if [`regenerate`](Self::regenerate) ran during this request.
    pub fn is_rotated(&self) -> bool {
        self.lock().rotated
    }

    /// The client must be sent this session's id.
    pub fn needs_cookie(&self) -> bool {
        let state = self.lock();
        (self.is_new || state.rotated) && !state.data.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().data.is_empty()
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let state = self.lock();
        let value = state.data.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: T) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        let mut state = self.lock();
        state.data.insert(key.to_string(), value.clone());
        state.changes.insert(key.to_string(), Some(value));
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        let mut state = self.lock();
        let removed = state.data.remove(key);
        if removed.is_some() {
            state.changes.insert(key.to_string(), None);
        }
        removed
    }

    /// Move the session to a fresh id, keeping its data. The old id is
    /// deleted from the store at the next flush.
    pub fn regenerate(&self) {
        let mut state = self.lock();
        let old = std::mem::replace(&mut state.id, new_id());
        if !self.is_new && state.retired_id.is_none() {
            state.retired_id = Some(old);
        }
        let snapshot: SessionChanges = state
            .data
            .iter()
            .map(|(key, value)| (key.clone(), Some(value.clone())))
            .collect();
        state.changes = snapshot;
        state.rotated = true;
    }

    pub fn is_dirty(&self) -> bool {
        let state = self.lock();
        !state.changes.is_empty() || state.retired_id.is_some()
    }

    /// Write pending changes to `store`. No-op if nothing changed.
    ///
    /// Only the keys this handle touched are written, so concurrent requests
    /// on the same session do not undo each other's changes to other keys.
    pub fn flush(&self, store: &dyn SessionStore) {
        let mut state = self.lock();
        if let Some(retired) = state.retired_id.take() {
            store.remove(&retired);
            tracing::debug!(from = %retired, to = %state.id, "Session id rotated");
        }
        if state.changes.is_empty() {
            return;
        }
        let changes = std::mem::take(&mut state.changes);
        store.apply(&state.id, &changes);
        tracing::trace!(session = %state.id, keys = changes.len(), "Session flushed");
    }
}

/// Flushes its session to the store when dropped.
pub struct SessionGuard {
    session: Session,
    store: Arc<dyn SessionStore>,
}

impl SessionGuard {
    pub fn new(session: Session, store: Arc<dyn SessionStore>) -> Self {
        Self { session, store }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::warn!(session = %self.session.id(), "Flushing session after handler panic");
        }
        self.session.flush(self.store.as_ref());
    }
}

//! Session persistence.
//!
//! The [`SessionStore`] trait is the only way the query engine reads or
//! writes cross-invocation state. [`JsonSessionStore`] keeps it in a small
//! JSON file; [`MemorySessionStore`] keeps it in memory for tests.
//!
//! Loading never fails: a missing or unreadable session yields
//! [`Session::default`].

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::models::Session;
use crate::store;

pub trait SessionStore {
    /// Read the persisted session, or defaults.
    fn load(&self) -> Session;

    /// Replace the persisted session with `session`.
    fn save(&self, session: &Session) -> Result<()>;
}

/// Session stored as `{book, chapter, speed, last_search?}` in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonSessionStore {
    path: PathBuf,
}

impl JsonSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for JsonSessionStore {
    fn load(&self) -> Session {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no session, using defaults");
                return Session::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "corrupt session, using defaults");
                Session::default()
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        store::write_json(&self.path, session)
    }
}

/// In-memory session store.
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
    saves: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            session: RwLock::new(None),
            saves: AtomicUsize::new(0),
        }
    }

    /// Start from an already-persisted session.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
            saves: AtomicUsize::new(0),
        }
    }

    /// The last saved session, if any.
    pub fn saved(&self) -> Option<Session> {
        self.session.read().ok().and_then(|s| s.clone())
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.saved().unwrap_or_default()
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut slot = self
            .session
            .write()
            .map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *slot = Some(session.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

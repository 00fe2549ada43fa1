//! Per-user session isolation
//!
//! A single-user process needs nothing more than one owned
//! [`ExperimentStore`]. When several users share a process, each gets an
//! isolated store: sessions never see each other's experiments.

use dashmap::DashMap;
use tracing::debug;

use crate::config::BenchConfig;
use crate::experiment::ExperimentStore;
use crate::{Error, Result};

/// Registry of isolated per-session experiment stores.
///
/// Thread-safe: backed by `DashMap`, so two sessions can be worked on from
/// different threads at once while each closure passed to
/// [`with_session`](Self::with_session) has exclusive access to its own store.
///
/// # Example
///
/// ```rust
/// use cellbench::experiment::Experiment;
/// use cellbench::session::SessionRegistry;
///
/// let sessions = SessionRegistry::new();
/// sessions.open("alice");
/// sessions.open("bob");
///
/// sessions.with_session("alice", |store| store.save("A", Experiment::new("A")))??;
/// let bob_sees_a = sessions.with_session("bob", |store| store.contains("A"))?;
/// assert!(!bob_sees_a);
/// # Ok::<(), cellbench::Error>(())
/// ```
pub struct SessionRegistry {
    config: BenchConfig,
    sessions: DashMap<String, ExperimentStore>,
}

impl SessionRegistry {
    /// Create a registry whose sessions use the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BenchConfig::default())
    }

    /// Create a registry whose sessions are bounded by `config`.
    #[must_use]
    pub fn with_config(config: BenchConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
        }
    }

    /// Open a session with a fresh, empty store.
    ///
    /// Returns `false` (and keeps the existing store) if the id is already open.
    pub fn open(&self, id: &str) -> bool {
        let mut created = false;
        self.sessions.entry(id.to_string()).or_insert_with(|| {
            created = true;
            ExperimentStore::with_config(self.config.clone())
        });
        if created {
            debug!(session = id, "opened session");
        }
        created
    }

    /// Close a session and hand back its store.
    pub fn close(&self, id: &str) -> Option<ExperimentStore> {
        let closed = self.sessions.remove(id).map(|(_, store)| store);
        if closed.is_some() {
            debug!(session = id, "closed session");
        }
        closed
    }

    /// Check if a session is open.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Number of open sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if no session is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Run `f` with exclusive access to one session's store.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` if the session is not open.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut ExperimentStore) -> T) -> Result<T> {
        let mut store = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        Ok(f(store.value_mut()))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

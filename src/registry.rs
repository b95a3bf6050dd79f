//! Session registry
//!
//! The single shared table of active sessions, keyed by `SessionId`.
//! Names and channels live in one map entry, so a membership snapshot can
//! never observe a name list and a channel list that disagree.

use std::collections::BTreeMap;

use tokio::sync::mpsc;

use crate::session::Session;
use crate::types::SessionId;

/// Registry tracking all active sessions
///
/// Owned exclusively by the relay actor; every mutation and snapshot is
/// serialized on that task's command loop. `BTreeMap` keyed by the
/// monotonically assigned `SessionId` gives join-order iteration.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: BTreeMap<SessionId, Session>,
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            sessions: BTreeMap::new(),
        }
    }

    /// Insert a session
    pub fn add(&mut self, session: Session) {
        self.sessions.insert(session.id, session);
    }

    /// Remove a session by id
    ///
    /// Returns the removed session so the caller can broadcast its
    /// departure before dropping it (and thereby closing its channel).
    /// Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    /// Look up the display name for a session
    pub fn name_of(&self, id: SessionId) -> Option<&str> {
        self.sessions.get(&id).map(|s| s.name.as_str())
    }

    /// Snapshot of all display names, in join order
    pub fn snapshot_names(&self) -> Vec<String> {
        self.sessions.values().map(|s| s.name.clone()).collect()
    }

    /// Snapshot of all outbound channels, in join order
    pub fn snapshot_channels(&self) -> Vec<mpsc::Sender<String>> {
        self.sessions.values().map(|s| s.sender.clone()).collect()
    }

    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are active
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

//! Identifier allocation and identifier → session mapping.
//!
//! [`SessionRegistry`] has no internal locking. It is owned by
//! [`crate::service::RelayService`], which serializes every lifecycle step
//! behind a single lock, so each mutation is atomic relative to the others.

use std::collections::HashMap;

use super::session::{ConnectionHandle, Session};
use super::SessionId;

/// Registry of live sessions.
///
/// # Invariants
///
/// - Every key ever present was produced by [`SessionRegistry::allocate`].
/// - The counter only moves forward; identifiers are never reused.
/// - Removing a session deletes its key entirely.
#[derive(Debug)]
pub struct SessionRegistry {
    next_id: u64,
    sessions: HashMap<SessionId, Session>,
}

impl SessionRegistry {
    /// Creates an empty registry whose first allocation yields `1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 1,
            sessions: HashMap::new(),
        }
    }

    /// Returns the next identifier and advances the counter.
    pub fn allocate(&mut self) -> SessionId {
        let id = SessionId::from_raw(self.next_id);
        self.next_id += 1;
        id
    }

    /// Inserts a session under its identifier.
    ///
    /// The caller registers each allocated identifier exactly once.
    pub fn register(&mut self, session: Session) {
        let previous = self.sessions.insert(session.id, session);
        debug_assert!(previous.is_none(), "session registered twice");
    }

    /// Removes a session, returning it if it was present.
    ///
    /// Unknown identifiers are a no-op, so duplicate disconnect
    /// notifications are harmless.
    pub fn deregister(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    /// Returns a live session.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Returns a mutable reference to a live session.
    pub fn get_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(&id)
    }

    /// Returns a snapshot of every live `(identifier, handle)` pair.
    ///
    /// The snapshot owns cloned handles, so sessions registered afterwards
    /// are never observed by whoever iterates it.
    #[must_use]
    pub fn lookup_all(&self) -> Vec<(SessionId, ConnectionHandle)> {
        self.sessions
            .values()
            .map(|session| (session.id, session.handle.clone()))
            .collect()
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no session is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

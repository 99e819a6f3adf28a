//! Session registry
//!
//! Maps each live WebSocket connection to at most one relay session, using
//! `DashMap` so connections on different shards never contend.

use super::RelaySession;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use relay_core::ConnectionId;
use std::sync::Arc;

/// Connection id to relay session mapping
pub struct SessionRegistry {
    sessions: DashMap<ConnectionId, Arc<RelaySession>>,
}

impl SessionRegistry {
    /// Create a new registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a session under its connection id.
    ///
    /// The first session wins; if one already exists the new session is
    /// handed back untouched so the caller can discard it.
    pub fn try_insert(&self, session: Arc<RelaySession>) -> Result<(), Arc<RelaySession>> {
        let id = session.connection().id();
        match self.sessions.entry(id) {
            Entry::Occupied(_) => Err(session),
            Entry::Vacant(slot) => {
                slot.insert(session);
                tracing::debug!(connection_id = %id, "Session registered");
                Ok(())
            }
        }
    }

    /// Get the session for a connection
    pub fn get(&self, id: &ConnectionId) -> Option<Arc<RelaySession>> {
        self.sessions.get(id).map(|r| Arc::clone(r.value()))
    }

    /// Remove and return the session for a connection
    pub fn remove(&self, id: &ConnectionId) -> Option<Arc<RelaySession>> {
        let removed = self.sessions.remove(id).map(|(_, session)| session);
        if removed.is_some() {
            tracing::debug!(connection_id = %id, "Session unregistered");
        }
        removed
    }

    /// Check if a connection has a session
    pub fn has_session(&self, id: &ConnectionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Get the number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Get all connection ids with a session
    pub fn all_connections(&self) -> Vec<ConnectionId> {
        self.sessions.iter().map(|r| *r.key()).collect()
    }

    /// Remove and tear down every session (process shutdown)
    pub async fn teardown_all(&self) -> usize {
        let ids = self.all_connections();
        let mut count = 0;

        for id in ids {
            if let Some(session) = self.remove(&id) {
                session.teardown().await;
                count += 1;
            }
        }

        if count > 0 {
            tracing::info!(count = count, "Tore down remaining sessions");
        }

        count
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}

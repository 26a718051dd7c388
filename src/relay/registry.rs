//! Presence registry - which user is reachable through which live socket

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use log::{debug, info};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Outbound side of one live WebSocket connection.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: Uuid,
    sender: mpsc::UnboundedSender<String>,
    pub connected_at: DateTime<Utc>,
}

impl ConnectionHandle {
    pub fn new(sender: mpsc::UnboundedSender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender,
            connected_at: Utc::now(),
        }
    }

    /// Time since the socket was accepted.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.connected_at
    }

    /// Queues a text frame; fails once the socket task has gone away.
    pub fn send(&self, message: String) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|e| format!("Failed to queue message: {}", e))
    }
}

/// user id -> connection. A later registration for the same user replaces the
/// earlier one.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, ConnectionHandle>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, user_id: impl Into<String>, connection: ConnectionHandle) {
        let user_id = user_id.into();
        info!("User registered: {} -> {}", user_id, connection.id);
        self.sessions.insert(user_id, connection);
    }

    pub fn lookup(&self, user_id: &str) -> Option<ConnectionHandle> {
        self.sessions.get(user_id).map(|c| c.clone())
    }

    pub fn is_online(&self, user_id: &str) -> bool {
        self.sessions.contains_key(user_id)
    }

    /// Pushes `message` to the user's live connection, if any.
    ///
    /// A mapping whose socket is already closed is dropped and counts as offline.
    pub fn send_to(&self, user_id: &str, message: String) -> bool {
        let Some(connection) = self.lookup(user_id) else {
            return false;
        };

        match connection.send(message) {
            Ok(()) => true,
            Err(e) => {
                debug!("Dropping stale session for {}: {}", user_id, e);
                self.sessions
                    .remove_if(user_id, |_, current| current.id == connection.id);
                false
            }
        }
    }

    /// Forgets every user mapped to `connection_id`; returns those user ids.
    pub fn remove_connection(&self, connection_id: Uuid) -> Vec<String> {
        let owned: Vec<String> = self
            .sessions
            .iter()
            .filter(|e| e.value().id == connection_id)
            .map(|e| e.key().clone())
            .collect();

        let mut removed = Vec::with_capacity(owned.len());
        for user_id in owned {
            // Skip users that re-registered elsewhere in the meantime
            if self
                .sessions
                .remove_if(&user_id, |_, current| current.id == connection_id)
                .is_some()
            {
                info!("User disconnected: {}", user_id);
                removed.push(user_id);
            }
        }
        removed
    }

    pub fn connected_count(&self) -> usize {
        self.sessions.len()
    }
}

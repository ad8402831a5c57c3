//! Server-side record of one connected client.

use axum::extract::ws::Utf8Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::SessionId;

/// Handle used to push encoded frames to a connection's writer task.
///
/// Bounded: once the queue is full, further frames for this connection are
/// dropped by the broadcast router instead of blocking the sender.
pub type ConnectionHandle = mpsc::Sender<Utf8Bytes>;

/// A live session owned by [`super::SessionRegistry`].
#[derive(Debug)]
pub struct Session {
    /// Identifier assigned at admission (immutable).
    pub id: SessionId,

    /// Outbound queue of the connection.
    pub handle: ConnectionHandle,

    /// Remote address as resolved at connect time (proxy header first).
    pub remote: String,

    /// Admission timestamp.
    pub connected_at: DateTime<Utc>,

    display_name: String,
}

impl Session {
    /// Creates a session with the generated `Anon_<id>` display name.
    #[must_use]
    pub fn new(id: SessionId, handle: ConnectionHandle, remote: String) -> Self {
        Self {
            id,
            handle,
            remote,
            connected_at: Utc::now(),
            display_name: format!("Anon_{id}"),
        }
    }

    /// Returns how long the session has been live.
    #[must_use]
    pub fn connected_for(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.connected_at)
    }

    /// Returns the last-known display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Replaces the display name. Last write wins.
    pub fn rename(&mut self, name: String) {
        self.display_name = name;
    }
}

//! Fan-out of encoded frames to registered sessions.
//!
//! Delivery is volatile: each recipient is tried once with
//! [`tokio::sync::mpsc::Sender::try_send`]. A recipient whose queue is full
//! (slow socket) or already closed simply misses the frame. Other
//! recipients are unaffected and the sender is never told.

use axum::extract::ws::Utf8Bytes;
use serde::Serialize;
use tokio::sync::mpsc::error::TrySendError;

use super::session::ConnectionHandle;
use super::{SessionId, SessionRegistry};
use crate::error::RelayError;

/// Which session, if any, a broadcast skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclude {
    /// Deliver to every registered session, originator included.
    None,
    /// Deliver to everyone except this session.
    Session(SessionId),
}

impl Exclude {
    fn skips(self, id: SessionId) -> bool {
        matches!(self, Self::Session(excluded) if excluded == id)
    }
}

/// Serializes a message once so it can be shared by every recipient.
///
/// # Errors
///
/// Returns [`RelayError::Serialization`] if the message cannot be encoded.
pub fn encode<T: Serialize>(message: &T) -> Result<Utf8Bytes, RelayError> {
    Ok(Utf8Bytes::from(serde_json::to_string(message)?))
}

/// Queues `frame` on a single connection without waiting.
///
/// Returns `true` if the frame was queued.
pub fn send_to(id: SessionId, handle: &ConnectionHandle, frame: Utf8Bytes) -> bool {
    match handle.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::debug!(session_id = %id, "outbound queue full, frame dropped");
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(session_id = %id, "outbound queue closed, frame dropped");
            false
        }
    }
}

/// Delivers `frame` to every registered session except `exclude`.
///
/// Iterates a snapshot taken from the registry. Returns the number of
/// sessions the frame was queued for.
pub fn broadcast(registry: &SessionRegistry, frame: &Utf8Bytes, exclude: Exclude) -> usize {
    let mut delivered = 0;
    for (id, handle) in registry.lookup_all() {
        if exclude.skips(id) {
            continue;
        }
        if send_to(id, &handle, frame.clone()) {
            delivered += 1;
        }
    }
    delivered
}

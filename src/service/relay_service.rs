//! Connection lifecycle coordinator.

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{Mutex, mpsc};

use crate::domain::broadcast::{self, Exclude};
use crate::domain::{
    Admission, AdmissionController, SanitizedMessage, ServerMessage, Session, SessionId,
    SessionRegistry,
};
use crate::persistence::{Stats, StatsStore};

/// Result of asking the relay to admit a new connection.
#[derive(Debug)]
pub enum OpenOutcome {
    /// The connection is now a live session.
    Active {
        /// Identifier assigned to the session.
        id: SessionId,
        /// Frames to write to the socket, starting with the handshake.
        outbound: mpsc::Receiver<Utf8Bytes>,
    },
    /// The server is full. Send `notice`, then close the socket.
    Rejected {
        /// Encoded `serverFull` notice.
        notice: Option<Utf8Bytes>,
    },
}

/// State that every lifecycle step mutates together.
#[derive(Debug)]
struct RelayState {
    registry: SessionRegistry,
    stats: StatsStore,
}

/// Orchestrates admission, registration, relay and teardown.
///
/// Every public method runs start to finish under one lock and never
/// awaits I/O while holding it, so steps behave like callbacks on a
/// single-threaded event loop: `current_users` always equals the number of
/// registered sessions between steps.
///
/// State machine per connection: `Pending` → [`RelayService::open`] →
/// `Active` (or rejected) → [`RelayService::receive`]* →
/// [`RelayService::close`] → `Closed`.
#[derive(Debug)]
pub struct RelayService {
    state: Mutex<RelayState>,
    admission: AdmissionController,
    outbound_capacity: usize,
}

impl RelayService {
    /// Creates the relay around freshly loaded stats and records startup.
    #[must_use]
    pub fn new(mut stats: StatsStore, outbound_capacity: usize) -> Self {
        stats.append_log("Spinning up.");
        Self {
            state: Mutex::new(RelayState {
                registry: SessionRegistry::new(),
                stats,
            }),
            admission: AdmissionController::default(),
            outbound_capacity: outbound_capacity.max(1),
        }
    }

    /// Replaces the admission policy.
    #[must_use]
    pub fn with_admission(mut self, admission: AdmissionController) -> Self {
        self.admission = admission;
        self
    }

    /// `Pending → Active | rejected`.
    ///
    /// On admission: allocates and registers the session, bumps both
    /// counters, logs the remote address, queues the `hi` handshake for
    /// the newcomer and announces the join to everyone. On rejection
    /// nothing is mutated.
    pub async fn open(&self, remote: String) -> OpenOutcome {
        let mut state = self.state.lock().await;

        let current = usize::try_from(state.stats.stats().current_users).unwrap_or(usize::MAX);
        if self.admission.decide(current) == Admission::Rejected {
            tracing::warn!(
                remote = %remote,
                capacity = self.admission.capacity(),
                "server full, rejecting connection"
            );
            return OpenOutcome::Rejected {
                notice: encode(&ServerMessage::ServerFull),
            };
        }

        let id = state.registry.allocate();
        let (handle, outbound) = mpsc::channel(self.outbound_capacity);
        if let Some(hi) = encode(&ServerMessage::Hi { id }) {
            broadcast::send_to(id, &handle, hi);
        }

        let session = Session::new(id, handle, remote);
        let joined = format!("{} has joined", session.display_name());
        state
            .stats
            .append_log(&format!("New connection from {}", session.remote));
        tracing::info!(session_id = %id, remote = %session.remote, "new session");
        state.registry.register(session);
        state.stats.record_join();
        tracing::info!(current_users = state.stats.stats().current_users, "server count");

        announce(&state.registry, joined);
        OpenOutcome::Active { id, outbound }
    }

    /// `Active → Active`: sanitizes one inbound frame and relays it.
    ///
    /// Chat lines reach every session including the sender; everything
    /// else skips the sender. Frames that are not JSON objects, and frames
    /// from sessions no longer registered, are dropped. Returns the number
    /// of sessions the frame was queued for.
    pub async fn receive(&self, id: SessionId, text: &str) -> usize {
        let message = match SanitizedMessage::sanitize(text) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!(session_id = %id, kind = err.kind(), "dropping inbound frame");
                return 0;
            }
        };
        let Some(frame) = encode(&message) else {
            return 0;
        };

        let mut state = self.state.lock().await;
        if !apply_display_name(&mut state.registry, id, &message) {
            tracing::debug!(session_id = %id, "frame from unregistered session");
            return 0;
        }

        let exclude = if message.is_chat() {
            Exclude::None
        } else {
            Exclude::Session(id)
        };
        broadcast::broadcast(&state.registry, &frame, exclude)
    }

    /// `Active → Closed`: deregisters the session and announces departure.
    ///
    /// Safe to call more than once; only the first call has any effect.
    pub async fn close(&self, id: SessionId) {
        let mut state = self.state.lock().await;
        let Some(session) = state.registry.deregister(id) else {
            tracing::debug!(session_id = %id, "duplicate disconnect ignored");
            return;
        };

        state.stats.record_leave();
        state
            .stats
            .append_log(&format!("{id} disconnected. [{}]", session.remote));
        tracing::info!(
            session_id = %id,
            duration_secs = session.connected_for().num_seconds(),
            "session disconnected"
        );
        tracing::info!(current_users = state.stats.stats().current_users, "server count");

        announce(
            &state.registry,
            format!("{} has left", session.display_name()),
        );
    }

    /// Records shutdown and persists stats, best effort.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        state.stats.append_log("Spinning down.");
        state.stats.save();
    }

    /// Returns a copy of the current stats.
    pub async fn stats(&self) -> Stats {
        self.state.lock().await.stats.stats().clone()
    }

    /// Returns the number of registered sessions.
    pub async fn session_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    /// Returns the display name of a live session.
    pub async fn display_name(&self, id: SessionId) -> Option<String> {
        let state = self.state.lock().await;
        state
            .registry
            .get(id)
            .map(|session| session.display_name().to_string())
    }
}

/// Renames the sender when the message carries `netName`.
///
/// Returns `false` if the sender is not registered.
fn apply_display_name(
    registry: &mut SessionRegistry,
    id: SessionId,
    message: &SanitizedMessage,
) -> bool {
    let Some(session) = registry.get_mut(id) else {
        return false;
    };
    if let Some(name) = message.display_name() {
        session.rename(name);
    }
    true
}

/// Broadcasts a server chat line to every registered session.
fn announce(registry: &SessionRegistry, text: String) {
    if let Some(frame) = encode(&ServerMessage::announcement(text)) {
        broadcast::broadcast(registry, &frame, Exclude::None);
    }
}

fn encode<T: serde::Serialize>(message: &T) -> Option<Utf8Bytes> {
    match broadcast::encode(message) {
        Ok(frame) => Some(frame),
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "could not encode frame");
            None
        }
    }
}

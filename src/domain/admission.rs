//! Population gate for new connections.

/// Maximum number of concurrent sessions.
pub const MAX_SESSIONS: usize = 50;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The connection may become a session.
    Accepted,
    /// The server is full; the connection gets a rejection notice and is
    /// closed without ever being registered.
    Rejected,
}

/// Decides, once per connection attempt, whether it may proceed.
#[derive(Debug, Clone, Copy)]
pub struct AdmissionController {
    capacity: usize,
}

impl AdmissionController {
    /// Creates a controller with the given capacity.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Returns the configured capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Accepts while one more session still fits under the capacity.
    #[must_use]
    pub const fn decide(&self, current_users: usize) -> Admission {
        if current_users < self.capacity {
            Admission::Accepted
        } else {
            Admission::Rejected
        }
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(MAX_SESSIONS)
    }
}

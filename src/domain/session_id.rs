//! Type-safe session identifier.
//!
//! [`SessionId`] is a newtype wrapper around `u64` so that session
//! identifiers cannot be confused with counters or other integers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier reserved for messages authored by the server itself.
pub const SERVER_ID: u64 = 0;

/// Unique identifier for a connected session.
///
/// Produced only by [`super::SessionRegistry::allocate`], starting at 1
/// and strictly increasing for the lifetime of the process. Serializes as
/// a bare integer on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SessionId> for u64 {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&SessionId::from_raw(7)).ok();
        assert_eq!(json.as_deref(), Some("7"));
    }

    #[test]
    fn display_is_plain_number() {
        assert_eq!(SessionId::from_raw(42).to_string(), "42");
    }

    #[test]
    fn ordering_follows_raw_value() {
        assert!(SessionId::from_raw(1) < SessionId::from_raw(2));
        assert_eq!(u64::from(SessionId::from_raw(9)), 9);
    }
}

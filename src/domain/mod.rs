//! Domain layer: sessions, admission, wire messages, and fan-out.
//!
//! These types hold no locks of their own. The lifecycle coordinator in
//! [`crate::service`] owns them and serializes every mutation.

pub mod admission;
pub mod broadcast;
pub mod message;
pub mod session;
pub mod session_id;
pub mod session_registry;

pub use admission::{Admission, AdmissionController};
pub use broadcast::Exclude;
pub use message::{SanitizedMessage, ServerMessage};
pub use session::{ConnectionHandle, Session};
pub use session_id::SessionId;
pub use session_registry::SessionRegistry;

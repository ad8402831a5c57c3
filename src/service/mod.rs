//! Service layer: connection lifecycle coordination.
//!
//! [`RelayService`] is the only component that mutates the session
//! registry and the stats store.

pub mod relay_service;

pub use relay_service::{OpenOutcome, RelayService};

//! # tofu-relay
//!
//! Real-time session and message relay for the tofu browser multiplayer
//! game.
//!
//! Clients hold a WebSocket open at `/ws`. Each admitted connection gets a
//! unique, never reused session identifier and a `hi` handshake. Gameplay
//! and chat payloads are stripped down to a fixed whitelist of fields and
//! rebroadcast to the other sessions with best-effort delivery. Aggregate
//! usage stats live in memory and survive restarts through a JSON file
//! written at shutdown.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── WS Handler + connection loop (ws/)
//!     │
//!     ├── RelayService (service/)
//!     │       lifecycle: admit → relay → close
//!     │
//!     ├── AdmissionController, SessionRegistry,
//!     │   SanitizedMessage, broadcast (domain/)
//!     │
//!     └── StatsStore → stats.json (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;

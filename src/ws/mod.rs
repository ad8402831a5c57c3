//! WebSocket layer: upgrade handler and per-connection read/write loop.
//!
//! The endpoint at `/ws` carries one JSON object per text frame in both
//! directions.

pub mod connection;
pub mod handler;

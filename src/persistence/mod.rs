//! Persistence layer: aggregate usage statistics on local disk.
//!
//! The stats document is read once at startup and written once at graceful
//! shutdown. Both directions are best-effort: a missing or unreadable file
//! yields zeroed stats, and a failed write is logged and ignored.

pub mod models;
pub mod stats_store;

pub use models::Stats;
pub use stats_store::StatsStore;

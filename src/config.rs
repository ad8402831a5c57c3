//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: settings come from environment variables (or a
//! `.env` file via `dotenvy`). Only the port and the outbound queue depth
//! are tunable; the population cap and the stats file location are fixed.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::RelayError;

/// Port used when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8000;

/// Per-session outbound queue depth used when `OUTBOUND_QUEUE_CAPACITY`
/// is unset or invalid.
pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Well-known location of the persisted stats document.
pub const STATS_FILE: &str = "stats.json";

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (always `0.0.0.0:<PORT>`).
    pub listen_addr: SocketAddr,

    /// Path of the stats document read at startup and written at shutdown.
    pub stats_path: PathBuf,

    /// Number of frames buffered per session before broadcasts start
    /// dropping frames for it.
    pub outbound_queue_capacity: usize,
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `PORT` is non-blank but is not a valid
    /// port number.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();

        let port = port_or_default(std::env::var("PORT").ok().as_deref())?;

        let outbound_queue_capacity =
            parse_env("OUTBOUND_QUEUE_CAPACITY", DEFAULT_OUTBOUND_QUEUE_CAPACITY).max(1);

        Ok(Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            stats_path: PathBuf::from(STATS_FILE),
            outbound_queue_capacity,
        })
    }
}

/// Resolves the listen port. Unset or blank falls back to [`DEFAULT_PORT`].
fn port_or_default(raw: Option<&str>) -> Result<u16, RelayError> {
    match raw.filter(|raw| !raw.trim().is_empty()) {
        Some(raw) => parse_port(raw),
        None => Ok(DEFAULT_PORT),
    }
}

/// Parses a port number, trimming surrounding whitespace.
fn parse_port(raw: &str) -> Result<u16, RelayError> {
    raw.trim()
        .parse()
        .map_err(|_| RelayError::Config(format!("PORT must be a port number, got {raw:?}")))
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_port_accepts_padded_number() {
        let Ok(port) = parse_port(" 3000 ") else {
            panic!("valid port");
        };
        assert_eq!(port, 3000);
    }

    #[test]
    fn parse_port_rejects_garbage() {
        let Err(err) = parse_port("eighty") else {
            panic!("expected error");
        };
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn blank_port_uses_default() {
        for raw in [None, Some(""), Some("   ")] {
            let Ok(port) = port_or_default(raw) else {
                panic!("blank PORT {raw:?} should fall back");
            };
            assert_eq!(port, DEFAULT_PORT);
        }
    }

    #[test]
    fn non_blank_garbage_port_is_still_an_error() {
        assert!(port_or_default(Some("eighty")).is_err());
        assert_eq!(port_or_default(Some("9001")).ok(), Some(9001));
    }

    #[test]
    fn parse_port_rejects_out_of_range() {
        assert!(parse_port("70000").is_err());
    }

    #[test]
    fn parse_env_falls_back_on_missing_key() {
        let value = parse_env("TOFU_RELAY_TEST_SURELY_UNSET_KEY", 17usize);
        assert_eq!(value, 17);
    }
}

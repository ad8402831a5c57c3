//! File-backed stats store.

use std::path::{Path, PathBuf};

use chrono::Local;

use super::Stats;
use crate::error::RelayError;

/// Timestamp layout of log lines, e.g. `3/14/2025, 9:05:07 PM`.
const LOG_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Owns the process-wide [`Stats`] and the path it persists to.
///
/// Lifecycle: [`StatsStore::load`] once at startup, mutate while running,
/// [`StatsStore::save`] once at shutdown.
#[derive(Debug)]
pub struct StatsStore {
    path: PathBuf,
    stats: Stats,
}

impl StatsStore {
    /// Loads stats from `path`, falling back to zeroed stats on any failure.
    ///
    /// `current_users` is always reset to zero: a fresh process has no
    /// live connections, whatever the file says.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut stats = match read_stats(&path) {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    kind = err.kind(),
                    error = %err,
                    "could not load stats, starting from defaults"
                );
                Stats::default()
            }
        };
        stats.current_users = 0;
        Self { path, stats }
    }

    /// Creates a store holding `stats` as-is, persisting to `path`.
    #[must_use]
    pub fn with_stats(path: impl Into<PathBuf>, stats: Stats) -> Self {
        Self {
            path: path.into(),
            stats,
        }
    }

    /// Returns the current stats.
    #[must_use]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Returns the path the stats persist to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records an admitted session in both counters.
    pub fn record_join(&mut self) {
        self.stats.current_users += 1;
        self.stats.total_users += 1;
    }

    /// Records a departed session. Never goes below zero.
    pub fn record_leave(&mut self) {
        self.stats.current_users = self.stats.current_users.saturating_sub(1);
    }

    /// Appends `(<local timestamp>) <message>` to the log.
    ///
    /// The log is never trimmed.
    pub fn append_log(&mut self, message: &str) {
        let stamp = Local::now().format(LOG_TIMESTAMP_FORMAT);
        self.stats.log.push(format!("({stamp}) {message}"));
    }

    /// Writes the stats document, logging and swallowing any failure.
    pub fn save(&self) {
        match write_stats(&self.path, &self.stats) {
            Ok(()) => tracing::info!(
                path = %self.path.display(),
                total_users = self.stats.total_users,
                "stats saved"
            ),
            Err(err) => tracing::warn!(
                path = %self.path.display(),
                kind = err.kind(),
                error = %err,
                "could not save stats"
            ),
        }
    }
}

fn read_stats(path: &Path) -> Result<Stats, RelayError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn write_stats(path: &Path, stats: &Stats) -> Result<(), RelayError> {
    let text = serde_json::to_string(stats)?;
    std::fs::write(path, text)?;
    Ok(())
}

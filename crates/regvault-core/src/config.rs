//! Connection configuration for the registry store.

use std::time::Duration;

/// Tuning applied to every SQLite connection the store opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// How long a writer waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Whether file-backed databases run in WAL journal mode.
    pub wal: bool,
}

impl StoreConfig {
    /// Default lock wait (5 seconds).
    pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
    /// File name used for store databases created inside a directory.
    pub const DB_FILENAME: &'static str = "registry.db";
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_millis(StoreConfig::DEFAULT_BUSY_TIMEOUT_MS),
            wal: true,
        }
    }
}

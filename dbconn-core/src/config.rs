//! Console configuration.

use crate::session::DEFAULT_HISTORY_FILE;
use std::path::PathBuf;
use std::time::Duration;

/// Timeout used by `check database` and `dbinfo`.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Settings handed to the console session at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// File holding previously used connection URLs
    pub history_file: PathBuf,
    /// Liveness probe timeout
    pub probe_timeout: Duration,
    /// Directory receiving `<table>.csv` files from `export data`
    pub export_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            export_dir: PathBuf::from("."),
        }
    }
}

impl ConsoleConfig {
    /// Sets the history file path.
    pub fn with_history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = path.into();
        self
    }

    /// Sets the directory for CSV exports.
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }
}

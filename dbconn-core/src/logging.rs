//! Logging setup shared by the console binary and its tests.
//!
//! Diagnostics go to stderr so console output on stdout stays clean. The
//! level is held behind a `tracing_subscriber::reload` layer so the
//! `debug on` and `debug off` commands can change it while the REPL runs.

use crate::Result;
use tracing_subscriber::{Registry, filter::LevelFilter, prelude::*, reload};

/// Maps the command-line verbosity flags to a base level.
///
/// `quiet` wins over any verbosity; otherwise 0=INFO, 1=DEBUG, 2+=TRACE.
pub fn base_level(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::INFO,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Initializes structured logging and returns a handle for live level changes.
///
/// # Example
/// ```rust,no_run
/// use dbconn_core::logging::init_logging;
///
/// let mut handle = init_logging(0, false).expect("Failed to initialize logging");
/// handle.set_debug(true).expect("Failed to change level");
/// ```
pub fn init_logging(verbose: u8, quiet: bool) -> Result<LogLevelHandle> {
    let level = base_level(verbose, quiet);
    let (filter, reload_handle) = reload::Layer::new(level);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| {
            crate::error::DbConnError::configuration(format!(
                "Failed to initialize logging: {}",
                e
            ))
        })?;

    Ok(LogLevelHandle {
        reload: Some(reload_handle),
        base: level,
        current: level,
    })
}

/// Live control over the active log level.
#[derive(Debug, Clone)]
pub struct LogLevelHandle {
    reload: Option<reload::Handle<LevelFilter, Registry>>,
    base: LevelFilter,
    current: LevelFilter,
}

impl LogLevelHandle {
    /// A handle that tracks the level without a subscriber behind it.
    pub fn detached(base: LevelFilter) -> Self {
        Self {
            reload: None,
            base,
            current: base,
        }
    }

    /// Whether debug-level events are currently emitted.
    pub fn is_debug(&self) -> bool {
        self.current >= LevelFilter::DEBUG
    }

    /// Current level filter.
    pub fn level(&self) -> LevelFilter {
        self.current
    }

    /// Switches debug output on, or back to the base level.
    ///
    /// When the base level is itself DEBUG or TRACE, turning debug off drops
    /// to INFO.
    pub fn set_debug(&mut self, enabled: bool) -> Result<()> {
        let level = match enabled {
            true if self.base >= LevelFilter::DEBUG => self.base,
            true => LevelFilter::DEBUG,
            false if self.base >= LevelFilter::DEBUG => LevelFilter::INFO,
            false => self.base,
        };

        if let Some(reload) = &self.reload {
            reload.modify(|filter| *filter = level).map_err(|e| {
                crate::error::DbConnError::configuration(format!(
                    "Failed to change log level: {}",
                    e
                ))
            })?;
        }

        self.current = level;
        Ok(())
    }
}

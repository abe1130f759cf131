//! Core of the DBConn interactive data console.
//!
//! This crate provides everything behind the `dbconn` binary: the line
//! parser and command dispatcher, the session that owns the single active
//! connection and its persisted history, driver-neutral metadata lookups,
//! vendor type normalization, and the CSV/XML export pipeline.
//!
//! # Credential Handling
//! - Passwords are held in zeroizing containers and never logged
//! - Connection URLs are redacted before they are logged or printed
//! - The history file stores URLs only
//!
//! # Architecture
//! - `adapters` hides each vendor driver behind the `DatabaseConnection` trait
//! - `session` owns at most one connection at a time
//! - `console` resolves lines through a declarative command table

pub mod adapters;
pub mod config;
pub mod console;
pub mod error;
pub mod export;
pub mod logging;
pub mod metadata;
pub mod models;
pub mod session;
pub mod type_mapping;

// Re-export commonly used types
pub use adapters::{Connector, DatabaseConnection, DriverConnector};
pub use config::ConsoleConfig;
pub use console::{Console, Exit, LineSource};
pub use error::{DbConnError, Result};
pub use metadata::MetadataService;
pub use models::{
    ColumnDescriptor, ConnectionDescriptor, DatabaseType, DriverColumn, NormalizedType,
    QueryResult,
};
pub use session::{ConnectionHistory, ConnectionManager};

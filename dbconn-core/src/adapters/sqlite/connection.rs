//! SQLite connection handling.
//!
//! # Connection Modes
//! - File-based: `sqlite:///path/to/database.db`, `sqlite://./relative.db`
//!   or a bare path ending in `.db`, `.sqlite` or `.sqlite3`
//! - In-memory: `sqlite::memory:` or `:memory:`
//!
//! The pool holds a single connection that never idles out, so an in-memory
//! database lives exactly as long as the session's connection.

use super::SqliteConnection;
use crate::{Result, error::DbConnError};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

impl SqliteConnection {
    /// Opens a SQLite database.
    ///
    /// # Arguments
    /// * `connection_string` - SQLite URL or file path, `jdbc:` prefix already removed
    /// * `connect_timeout` - Time allowed to open the database
    ///
    /// # Errors
    /// Returns error if:
    /// - Connection string format is invalid
    /// - Database file does not exist
    /// - Database cannot be opened
    pub async fn connect(connection_string: &str, connect_timeout: Duration) -> Result<Self> {
        let normalized = normalize_connection_string(connection_string);

        let options = SqliteConnectOptions::from_str(&normalized).map_err(|e| {
            DbConnError::configuration(format!("Invalid SQLite connection string: {}", e))
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(connect_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(DbConnError::connection_failed)?;

        tracing::debug!("Opened SQLite database {}", normalized);

        Ok(Self {
            pool,
            in_memory: is_in_memory(&normalized),
        })
    }
}

/// Normalizes a connection string to SQLite URL format.
pub(crate) fn normalize_connection_string(connection_string: &str) -> String {
    if connection_string == ":memory:" {
        return "sqlite::memory:".to_string();
    }

    if connection_string.starts_with("sqlite:") {
        return connection_string.to_string();
    }

    format!("sqlite://{}", connection_string)
}

fn is_in_memory(connection_string: &str) -> bool {
    connection_string.contains(":memory:") || connection_string.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_connection_string() {
        assert_eq!(normalize_connection_string(":memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_connection_string("sqlite:///path/db.sqlite"),
            "sqlite:///path/db.sqlite"
        );
        assert_eq!(
            normalize_connection_string("/path/to/db.sqlite"),
            "sqlite:///path/to/db.sqlite"
        );
    }

    #[test]
    fn test_is_in_memory() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file.db?mode=memory"));
        assert!(!is_in_memory("sqlite://./app.db"));
    }

    #[tokio::test]
    async fn test_connect_missing_file_fails() {
        let result = SqliteConnection::connect(
            "sqlite:///nonexistent/dir/missing.db",
            Duration::from_secs(1),
        )
        .await;
        assert!(result.is_err());
    }
}

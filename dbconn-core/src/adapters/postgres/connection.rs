//! PostgreSQL connection setup.
//!
//! The session holds one server connection for its whole life, so the pool
//! is capped at a single connection that never idles out. Session state such
//! as `search_path` therefore survives between commands.

use super::PostgresConnection;
use crate::models::ConnectionDescriptor;
use crate::{Result, error::DbConnError};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

impl PostgresConnection {
    /// Opens a PostgreSQL connection.
    ///
    /// The descriptor's user name and password override any credentials
    /// embedded in the URL.
    ///
    /// # Arguments
    /// * `url` - PostgreSQL URL, `jdbc:` prefix already removed
    /// * `descriptor` - Credentials for the connection
    /// * `connect_timeout` - Time allowed to establish the connection
    ///
    /// # Errors
    /// Returns error if the URL is malformed or the server rejects the
    /// connection
    pub async fn connect(
        url: &str,
        descriptor: &ConnectionDescriptor,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let options = connect_options(url, descriptor)?;

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(connect_timeout)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(DbConnError::connection_failed)?;

        Ok(Self { pool })
    }
}

/// Builds connect options from the URL and the descriptor's credentials.
pub(crate) fn connect_options(
    url: &str,
    descriptor: &ConnectionDescriptor,
) -> Result<PgConnectOptions> {
    let mut options = PgConnectOptions::from_str(url).map_err(|e| {
        DbConnError::configuration(format!("Invalid PostgreSQL connection string: {}", e))
    })?;

    if !descriptor.username().is_empty() {
        options = options.username(descriptor.username());
    }
    if descriptor.has_password() {
        options = options.password(descriptor.password());
    }

    Ok(options)
}

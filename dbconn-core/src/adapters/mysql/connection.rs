//! MySQL and MariaDB connection setup.
//!
//! `mariadb://` URLs are accepted and handed to the MySQL driver. The pool is
//! capped at a single connection so the database chosen by `USE` persists.

use super::MySqlConnection;
use crate::models::ConnectionDescriptor;
use crate::{Result, error::DbConnError};
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::str::FromStr;
use std::time::Duration;

impl MySqlConnection {
    /// Opens a MySQL connection.
    ///
    /// The descriptor's user name and password override any credentials
    /// embedded in the URL.
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

        let pool = MySqlPoolOptions::new()
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

/// Rewrites a `mariadb://` URL to the `mysql://` scheme.
pub(crate) fn normalize_url(url: &str) -> String {
    match url.strip_prefix("mariadb://") {
        Some(rest) => format!("mysql://{}", rest),
        None => url.to_string(),
    }
}

/// Builds connect options from the URL and the descriptor's credentials.
pub(crate) fn connect_options(
    url: &str,
    descriptor: &ConnectionDescriptor,
) -> Result<MySqlConnectOptions> {
    let mut options = MySqlConnectOptions::from_str(&normalize_url(url)).map_err(|e| {
        DbConnError::configuration(format!("Invalid MySQL connection string: {}", e))
    })?;

    if !descriptor.username().is_empty() {
        options = options.username(descriptor.username());
    }
    if descriptor.has_password() {
        options = options.password(descriptor.password());
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("mariadb://localhost/app"),
            "mysql://localhost/app"
        );
        assert_eq!(normalize_url("mysql://localhost/app"), "mysql://localhost/app");
    }

    #[test]
    fn test_connect_options_accept_mariadb_scheme() {
        let descriptor = ConnectionDescriptor::new("mariadb://localhost/app", "alice", "secret");
        assert!(connect_options("mariadb://localhost:3306/app", &descriptor).is_ok());
    }
}

//! Session state: the single active connection and the connection history.
//!
//! [`ConnectionManager`] owns at most one open connection. Opening a new one
//! always closes the previous one first. Driver failures are logged here and
//! handed back as `Result`s or boolean answers so the dispatcher decides
//! what to print.

pub mod history;

pub use history::{ConnectionHistory, DEFAULT_HISTORY_FILE};

use crate::adapters::{Connector, DatabaseConnection, redact_database_url};
use crate::metadata::MetadataService;
use crate::models::ConnectionDescriptor;
use crate::{Result, error::DbConnError};
use std::time::Duration;

/// Owner of the active connection and the connection history.
pub struct ConnectionManager {
    connector: Box<dyn Connector>,
    history: ConnectionHistory,
    pending: Option<ConnectionDescriptor>,
    connection: Option<Box<dyn DatabaseConnection>>,
}

impl ConnectionManager {
    /// Creates a manager with no connection.
    pub fn new(connector: Box<dyn Connector>, history: ConnectionHistory) -> Self {
        Self {
            connector,
            history,
            pending: None,
            connection: None,
        }
    }

    /// Stores the descriptor for the next [`open`](Self::open) and records
    /// the URL in the history.
    ///
    /// A history write failure is logged; the descriptor is stored anyway.
    pub async fn init(&mut self, url: &str, username: &str, password: &str) {
        self.pending = Some(ConnectionDescriptor::new(url, username, password));

        match self.history.add(url).await {
            Ok(true) => tracing::debug!("Added {} to connection history", redact_database_url(url)),
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to save connection history: {}", e),
        }
    }

    /// Opens a connection from the pending descriptor unless one is open.
    ///
    /// # Errors
    /// Returns error if no descriptor was set or the driver fails to connect;
    /// the connection stays closed
    pub async fn open(&mut self) -> Result<()> {
        if self.connection.is_some() {
            return Ok(());
        }

        let descriptor = self
            .pending
            .as_ref()
            .ok_or_else(|| DbConnError::configuration("No connection details were provided"))?;

        match self.connector.connect(descriptor).await {
            Ok(connection) => {
                tracing::info!(
                    "Connected to {} database at {}",
                    connection.database_type(),
                    redact_database_url(descriptor.url())
                );
                self.connection = Some(connection);
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to {}: {}",
                    redact_database_url(descriptor.url()),
                    e
                );
                Err(e)
            }
        }
    }

    /// Closes any open connection, then opens a new one from the pending
    /// descriptor. Returns whether a connection is now open.
    pub async fn create(&mut self) -> bool {
        self.close_connection().await;
        self.open().await.is_ok()
    }

    /// Whether a usable connection exists.
    ///
    /// Without a timeout only the presence of a connection is checked. With a
    /// timeout the server is probed and a failed probe counts as invalid.
    pub async fn is_valid(&self, timeout: Option<Duration>) -> bool {
        let Some(connection) = &self.connection else {
            return false;
        };

        match timeout {
            None => true,
            Some(timeout) => match connection.probe(timeout).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Connection probe failed: {}", e);
                    false
                }
            },
        }
    }

    /// Closes the connection and forgets the descriptor. Safe to call again.
    pub async fn close(&mut self) {
        self.close_connection().await;
        self.pending = None;
    }

    /// Makes `name` the active schema. Blank names are ignored.
    ///
    /// # Errors
    /// Returns error if no connection is open or the driver rejects the
    /// statement
    pub async fn select_schema(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }

        let connection = self.connection.as_deref().ok_or(DbConnError::NotConnected)?;
        connection.set_schema(name).await.inspect_err(|e| {
            tracing::error!("Failed to select schema {}: {}", name, e);
        })?;

        tracing::debug!("Active schema set to {}", name);
        Ok(())
    }

    /// The open connection, if any.
    pub fn connection(&self) -> Option<&dyn DatabaseConnection> {
        self.connection.as_deref()
    }

    /// A metadata service over the open connection.
    ///
    /// # Errors
    /// Returns [`DbConnError::NotConnected`] when no connection is open
    pub fn metadata(&self) -> Result<MetadataService<'_>> {
        self.connection()
            .map(MetadataService::new)
            .ok_or(DbConnError::NotConnected)
    }

    /// URL of the pending or active descriptor.
    pub fn url(&self) -> Option<&str> {
        self.pending.as_ref().map(ConnectionDescriptor::url)
    }

    pub fn history(&self) -> &ConnectionHistory {
        &self.history
    }

    async fn close_connection(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close().await;
            tracing::debug!("Connection closed");
        }
    }
}

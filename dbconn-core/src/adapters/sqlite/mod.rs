//! SQLite driver.
//!
//! # Module Structure
//! - `connection`: Opening file-based and in-memory databases
//! - `type_mapping`: Declared type names to standard type codes
//! - `metadata`: Table, schema and column introspection via `sqlite_master`
//!   and PRAGMA table functions
//!
//! # SQLite-Specific Behavior
//! - Attached databases are reported as schemas
//! - Changing the active schema is not supported
//! - Tables are listed from the main database only

pub mod connection;
pub mod metadata;
pub mod type_mapping;


use super::DatabaseConnection;
use super::helpers::rows_to_result;
use crate::Result;
use crate::error::DbConnError;
use crate::models::{DatabaseType, DriverColumn, QueryResult};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::time::Duration;

pub use type_mapping::sqlite_type_code;

/// Connection to a SQLite database.
pub struct SqliteConnection {
    /// Single-connection pool
    pub pool: SqlitePool,
    in_memory: bool,
}

impl SqliteConnection {
    /// Checks if the connection is to an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("is_in_memory", &self.in_memory)
            .field("is_closed", &self.pool.is_closed())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DatabaseConnection for SqliteConnection {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn probe(&self, timeout: Duration) -> Result<()> {
        let probe = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool);

        match tokio::time::timeout(timeout, probe).await {
            Ok(Ok(1)) => Ok(()),
            Ok(Ok(_)) => Err(DbConnError::configuration(
                "Basic connectivity test failed: unexpected result",
            )),
            Ok(Err(e)) => Err(DbConnError::connection_failed(e)),
            Err(elapsed) => Err(DbConnError::connection_failed(elapsed)),
        }
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn tables(&self, pattern: &str) -> Result<Vec<String>> {
        metadata::list_tables(&self.pool, pattern).await
    }

    async fn schemas(&self) -> Result<Vec<String>> {
        metadata::list_schemas(&self.pool).await
    }

    async fn columns(&self, table: &str) -> Result<Vec<DriverColumn>> {
        metadata::collect_columns(&self.pool, table).await
    }

    async fn primary_key_columns(&self, table: &str) -> Result<HashSet<String>> {
        metadata::primary_key_columns(&self.pool, table).await
    }

    async fn query(&self, sql: &str, column_count: usize) -> Result<QueryResult> {
        let rows = sqlx::raw_sql(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbConnError::query_failed("Query failed", e))?;

        rows_to_result(&rows, column_count)
    }

    async fn set_schema(&self, _schema: &str) -> Result<()> {
        Err(DbConnError::unsupported_feature(
            "setting the active schema",
            DatabaseType::SQLite.to_string(),
        ))
    }
}

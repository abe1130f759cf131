//! MySQL and MariaDB driver.
//!
//! # Module Structure
//! - `connection`: Connect options and single-connection pool setup
//! - `type_mapping`: `DATA_TYPE` names to standard type codes
//! - `metadata`: Catalog queries against `INFORMATION_SCHEMA`

pub mod connection;
pub mod metadata;
pub mod type_mapping;

use super::DatabaseConnection;
use super::helpers::rows_to_result;
use crate::Result;
use crate::error::DbConnError;
use crate::models::{DatabaseType, DriverColumn, QueryResult};
use async_trait::async_trait;
use sqlx::MySqlPool;
use std::collections::HashSet;
use std::time::Duration;

pub use type_mapping::mysql_type_code;

/// Connection to a MySQL or MariaDB server.
pub struct MySqlConnection {
    pub pool: MySqlPool,
}

impl std::fmt::Debug for MySqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlConnection")
            .field("is_closed", &self.pool.is_closed())
            .finish_non_exhaustive()
    }
}

/// Quotes a MySQL identifier with backticks.
fn quote_mysql_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[async_trait]
impl DatabaseConnection for MySqlConnection {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    async fn probe(&self, timeout: Duration) -> Result<()> {
        let probe = sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&self.pool);

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

    async fn set_schema(&self, schema: &str) -> Result<()> {
        let statement = format!("USE {}", quote_mysql_identifier(schema));

        sqlx::raw_sql(&statement)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DbConnError::query_failed(format!("Failed to set schema to '{}'", schema), e)
            })?;

        Ok(())
    }
}

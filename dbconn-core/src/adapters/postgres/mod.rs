//! PostgreSQL driver.
//!
//! # Module Structure
//! - `connection`: Connect options and single-connection pool setup
//! - `type_mapping`: `udt_name` to standard type codes
//! - `metadata`: Catalog queries against `information_schema`

pub mod connection;
pub mod metadata;
pub mod type_mapping;

use super::DatabaseConnection;
use super::helpers::{quote_literal, rows_to_result};
use crate::Result;
use crate::error::DbConnError;
use crate::models::{DatabaseType, DriverColumn, QueryResult};
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use std::time::Duration;

pub use type_mapping::postgres_type_code;

/// Connection to a PostgreSQL server.
pub struct PostgresConnection {
    pub pool: PgPool,
}

impl std::fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("is_closed", &self.pool.is_closed())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DatabaseConnection for PostgresConnection {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::PostgreSQL
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

    async fn set_schema(&self, schema: &str) -> Result<()> {
        let statement = format!("SET search_path TO {}", quote_literal(schema));

        sqlx::raw_sql(&statement)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DbConnError::query_failed(format!("Failed to set schema to '{}'", schema), e)
            })?;

        Ok(())
    }
}

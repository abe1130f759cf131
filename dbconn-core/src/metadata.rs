//! Metadata service: catalog lookups and ad-hoc queries over the active
//! connection.
//!
//! Every lookup runs against the connection borrowed from the session and
//! yields fresh results; nothing is cached between calls.

use crate::Result;
use crate::adapters::DatabaseConnection;
use crate::models::{ColumnDescriptor, QueryResult};
use crate::type_mapping::{format_type, map_type};
use std::collections::HashSet;

/// LIKE pattern matching every table.
pub const ALL_TABLES: &str = "%";

/// Returned by [`MetadataService::run_scalar_int_query`] when no value is
/// available.
pub const NO_VALUE: i64 = -1;

/// Catalog queries against one open connection.
pub struct MetadataService<'a> {
    conn: &'a dyn DatabaseConnection,
}

impl<'a> MetadataService<'a> {
    /// Wraps an open connection.
    pub fn new(conn: &'a dyn DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Table names matching a LIKE pattern, or all tables when `pattern` is
    /// `None`.
    ///
    /// # Errors
    /// Returns error if the driver cannot enumerate tables
    pub async fn list_tables(&self, pattern: Option<&str>) -> Result<Vec<String>> {
        let pattern = pattern.unwrap_or(ALL_TABLES);
        let tables = self.conn.tables(pattern).await.inspect_err(|e| {
            tracing::error!("Failed to list tables matching '{}': {}", pattern, e);
        })?;

        tracing::debug!("Found {} tables matching '{}'", tables.len(), pattern);
        Ok(tables)
    }

    /// All schema names.
    pub async fn list_schemas(&self) -> Result<Vec<String>> {
        self.conn.schemas().await.inspect_err(|e| {
            tracing::error!("Failed to list schemas: {}", e);
        })
    }

    /// Columns of a table in ordinal order with normalized types.
    ///
    /// When `include_pks` is false the primary-key lookup is skipped and
    /// every column reports `primary_key = false`.
    ///
    /// # Arguments
    /// * `table` - Table name as the driver expects it
    /// * `include_pks` - Whether to look up primary-key membership
    ///
    /// # Errors
    /// Returns error if the column or primary-key lookup fails
    pub async fn list_columns(
        &self,
        table: &str,
        include_pks: bool,
    ) -> Result<Vec<ColumnDescriptor>> {
        let mut driver_columns = self.conn.columns(table).await.inspect_err(|e| {
            tracing::error!("Failed to list columns of '{}': {}", table, e);
        })?;
        driver_columns.sort_by_key(|column| column.ordinal);

        let primary_keys = if include_pks {
            self.conn.primary_key_columns(table).await.inspect_err(|e| {
                tracing::error!("Failed to look up primary key of '{}': {}", table, e);
            })?
        } else {
            HashSet::new()
        };

        let columns = driver_columns
            .into_iter()
            .map(|column| {
                let normalized_type = map_type(column.type_code, &column.type_name);
                let display_type =
                    format_type(&column.type_name, normalized_type, column.size, column.scale);
                let primary_key = primary_keys.contains(&column.name);

                ColumnDescriptor {
                    ordinal: column.ordinal,
                    name: column.name,
                    normalized_type,
                    display_type,
                    nullable: column.nullable,
                    primary_key,
                }
            })
            .collect();

        Ok(columns)
    }

    /// Runs a statement and returns the first `column_count` values of each
    /// row as text.
    ///
    /// # Errors
    /// Returns error if the statement fails or yields fewer columns than
    /// requested
    pub async fn run_query(&self, sql: &str, column_count: usize) -> Result<QueryResult> {
        tracing::debug!("Executing SQL: {}", sql);

        self.conn
            .query(sql, column_count)
            .await
            .inspect_err(|e| tracing::error!("Query failed: {}", e))
    }

    /// Runs a statement expected to yield a single integer.
    ///
    /// Returns [`NO_VALUE`] when the statement fails, yields no rows, or the
    /// value is not an integer. Failures are logged, never propagated.
    pub async fn run_scalar_int_query(&self, sql: &str) -> i64 {
        let result = match self.run_query(sql, 1).await {
            Ok(result) => result,
            Err(_) => return NO_VALUE,
        };

        match result.rows().first().and_then(|row| row.first()) {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Scalar query returned a non-integer value: {}", value);
                NO_VALUE
            }),
            None => NO_VALUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::DatabaseConnection;
    use crate::error::DbConnError;
    use crate::models::{DatabaseType, DriverColumn, NormalizedType};
    use crate::type_mapping::type_codes;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Canned catalog for one table.
    struct CatalogStub {
        columns: Vec<DriverColumn>,
        primary_keys: HashSet<String>,
        scalar: Option<String>,
    }

    #[async_trait]
    impl DatabaseConnection for CatalogStub {
        fn database_type(&self) -> DatabaseType {
            DatabaseType::SQLite
        }

        async fn probe(&self, _timeout: Duration) -> Result<()> {
            Ok(())
        }

        async fn close(&self) {}

        async fn tables(&self, pattern: &str) -> Result<Vec<String>> {
            Ok(match pattern {
                "%" => vec!["customers".to_string(), "orders".to_string()],
                _ => Vec::new(),
            })
        }

        async fn schemas(&self) -> Result<Vec<String>> {
            Ok(vec!["main".to_string()])
        }

        async fn columns(&self, _table: &str) -> Result<Vec<DriverColumn>> {
            Ok(self.columns.clone())
        }

        async fn primary_key_columns(&self, _table: &str) -> Result<HashSet<String>> {
            Ok(self.primary_keys.clone())
        }

        async fn query(&self, _sql: &str, column_count: usize) -> Result<QueryResult> {
            let mut result = QueryResult::new(column_count);
            match &self.scalar {
                Some(value) => result.push_row(vec![value.clone()]),
                None => {
                    return Err(DbConnError::configuration("no such table"));
                }
            }
            Ok(result)
        }

        async fn set_schema(&self, _schema: &str) -> Result<()> {
            Ok(())
        }
    }

    fn column(ordinal: u32, name: &str, type_code: i32, type_name: &str, size: Option<u32>) -> DriverColumn {
        DriverColumn {
            ordinal,
            name: name.to_string(),
            type_code,
            type_name: type_name.to_string(),
            size,
            scale: None,
            nullable: ordinal != 1,
        }
    }

    fn stub(scalar: Option<&str>) -> CatalogStub {
        CatalogStub {
            columns: vec![
                column(2, "name", type_codes::VARCHAR, "VARCHAR", Some(40)),
                column(1, "id", type_codes::INTEGER, "INTEGER", None),
            ],
            primary_keys: HashSet::from(["id".to_string()]),
            scalar: scalar.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_columns_with_primary_keys() {
        let conn = stub(None);
        let service = MetadataService::new(&conn);

        let columns = service.list_columns("orders", true).await.unwrap();
        assert_eq!(columns.len(), 2);

        assert_eq!(columns[0].ordinal, 1);
        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].normalized_type, NormalizedType::Integer);
        assert_eq!(columns[0].display_type, "INTEGER");
        assert!(columns[0].primary_key);
        assert!(!columns[0].nullable);

        assert_eq!(columns[1].display_type, "VARCHAR(40)");
        assert_eq!(columns[1].normalized_type, NormalizedType::String);
        assert!(!columns[1].primary_key);
    }

    #[tokio::test]
    async fn test_list_columns_without_primary_keys() {
        let conn = stub(None);
        let service = MetadataService::new(&conn);

        let columns = service.list_columns("orders", false).await.unwrap();
        assert!(columns.iter().all(|c| !c.primary_key));
    }

    #[tokio::test]
    async fn test_list_tables_default_pattern() {
        let conn = stub(None);
        let service = MetadataService::new(&conn);

        assert_eq!(service.list_tables(None).await.unwrap().len(), 2);
        assert!(service.list_tables(Some("x%")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scalar_query_sentinel() {
        let conn = stub(Some("42"));
        assert_eq!(MetadataService::new(&conn).run_scalar_int_query("select count(*) from t").await, 42);

        let conn = stub(Some("forty-two"));
        assert_eq!(MetadataService::new(&conn).run_scalar_int_query("select 'x'").await, NO_VALUE);

        let conn = stub(None);
        assert_eq!(MetadataService::new(&conn).run_scalar_int_query("select count(*) from missing").await, NO_VALUE);
    }
}

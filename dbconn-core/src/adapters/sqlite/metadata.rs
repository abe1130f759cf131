//! SQLite catalog introspection.
//!
//! # SQLite System Tables
//! - `sqlite_master`: schema definitions for all objects of the main database
//! - `pragma_database_list`: attached databases, reported as schemas
//! - `pragma_table_info()`: column information for a table

use super::type_mapping::sqlite_type_code;
use crate::adapters::helpers::parse_declared_type;
use crate::{Result, error::DbConnError, models::DriverColumn};
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;

/// Lists user tables of the main database whose names match a LIKE pattern.
pub(crate) async fn list_tables(pool: &SqlitePool, pattern: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT name
        FROM sqlite_master
        WHERE type = 'table'
        AND name NOT LIKE 'sqlite_%'
        AND name LIKE ?
        ORDER BY name
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
    .map_err(|e| DbConnError::query_failed("Failed to enumerate tables", e))?;

    rows.iter()
        .map(|row| {
            row.try_get::<String, _>("name")
                .map_err(|e| DbConnError::query_failed("Failed to parse table name", e))
        })
        .collect()
}

/// Lists attached databases (`main`, `temp` and any `ATTACH`ed ones).
pub(crate) async fn list_schemas(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT name FROM pragma_database_list ORDER BY name")
        .fetch_all(pool)
        .await
        .map_err(|e| DbConnError::query_failed("Failed to enumerate schemas", e))?;

    rows.iter()
        .map(|row| {
            row.try_get::<String, _>("name")
                .map_err(|e| DbConnError::query_failed("Failed to parse schema name", e))
        })
        .collect()
}

/// Collects column metadata for a table. Unknown tables yield no columns.
pub(crate) async fn collect_columns(pool: &SqlitePool, table_name: &str) -> Result<Vec<DriverColumn>> {
    let rows = sqlx::query(
        r#"SELECT cid, name, type, "notnull", pk FROM pragma_table_info(?) ORDER BY cid"#,
    )
    .bind(table_name)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        DbConnError::query_failed(
            format!("Failed to collect columns for table '{}'", table_name),
            e,
        )
    })?;

    let mut columns = Vec::with_capacity(rows.len());

    for row in &rows {
        let parse_error =
            |e: sqlx::Error| DbConnError::query_failed(format!("Failed to parse column of '{}'", table_name), e);

        let cid: i64 = row.try_get("cid").map_err(parse_error)?;
        let name: String = row.try_get("name").map_err(parse_error)?;
        let declared: String = row.try_get("type").map_err(parse_error)?;
        let notnull: i64 = row.try_get("notnull").map_err(parse_error)?;
        let pk: i64 = row.try_get("pk").map_err(parse_error)?;

        let (type_name, size, scale) = parse_declared_type(&declared);

        // PRIMARY KEY columns are implicitly NOT NULL even when PRAGMA says otherwise
        columns.push(DriverColumn {
            ordinal: u32::try_from(cid + 1).unwrap_or(u32::MAX),
            name,
            type_code: sqlite_type_code(&type_name),
            type_name,
            size,
            scale,
            nullable: notnull == 0 && pk == 0,
        });
    }

    Ok(columns)
}

/// Names of the columns that form a table's primary key.
pub(crate) async fn primary_key_columns(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<HashSet<String>> {
    let rows = sqlx::query("SELECT name FROM pragma_table_info(?) WHERE pk > 0")
        .bind(table_name)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            DbConnError::query_failed(
                format!("Failed to collect primary key for table '{}'", table_name),
                e,
            )
        })?;

    rows.iter()
        .map(|row| {
            row.try_get::<String, _>("name")
                .map_err(|e| DbConnError::query_failed("Failed to parse primary key column", e))
        })
        .collect()
}

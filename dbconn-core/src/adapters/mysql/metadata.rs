//! MySQL catalog introspection through `INFORMATION_SCHEMA`.
//!
//! Tables and columns are scoped to `DATABASE()`. Text columns are cast to
//! CHAR and numbers to SIGNED to avoid VARBINARY and unsigned decoding issues
//! in MySQL 8.0+.

use super::type_mapping::{has_character_length, has_numeric_precision, mysql_type_code};
use crate::{Result, error::DbConnError, models::DriverColumn};
use sqlx::{MySqlPool, Row};
use std::collections::HashSet;

/// Lists base tables of the current database whose names match a LIKE pattern.
pub(crate) async fn list_tables(pool: &MySqlPool, pattern: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT CAST(TABLE_NAME AS CHAR) AS TABLE_NAME
        FROM INFORMATION_SCHEMA.TABLES
        WHERE TABLE_SCHEMA = DATABASE()
        AND TABLE_TYPE = 'BASE TABLE'
        AND TABLE_NAME LIKE ?
        ORDER BY TABLE_NAME
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
    .map_err(|e| DbConnError::query_failed("Failed to enumerate tables", e))?;

    rows.iter()
        .map(|row| {
            row.try_get::<String, _>("TABLE_NAME")
                .map_err(|e| DbConnError::query_failed("Failed to parse table name", e))
        })
        .collect()
}

/// Lists all databases visible to the user; MySQL treats them as schemas.
pub(crate) async fn list_schemas(pool: &MySqlPool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT CAST(SCHEMA_NAME AS CHAR) AS SCHEMA_NAME FROM INFORMATION_SCHEMA.SCHEMATA ORDER BY SCHEMA_NAME",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| DbConnError::query_failed("Failed to enumerate schemas", e))?;

    rows.iter()
        .map(|row| {
            row.try_get::<String, _>("SCHEMA_NAME")
                .map_err(|e| DbConnError::query_failed("Failed to parse schema name", e))
        })
        .collect()
}

/// Collects column metadata for a table of the current database.
pub(crate) async fn collect_columns(
    pool: &MySqlPool,
    table_name: &str,
) -> Result<Vec<DriverColumn>> {
    let rows = sqlx::query(
        r#"
        SELECT
            CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION,
            CAST(COLUMN_NAME AS CHAR) AS COLUMN_NAME,
            CAST(DATA_TYPE AS CHAR) AS DATA_TYPE,
            CAST(CHARACTER_MAXIMUM_LENGTH AS SIGNED) AS CHARACTER_MAXIMUM_LENGTH,
            CAST(NUMERIC_PRECISION AS SIGNED) AS NUMERIC_PRECISION,
            CAST(NUMERIC_SCALE AS SIGNED) AS NUMERIC_SCALE,
            CAST(IS_NULLABLE AS CHAR) AS IS_NULLABLE
        FROM INFORMATION_SCHEMA.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE()
        AND TABLE_NAME = ?
        ORDER BY ORDINAL_POSITION
        "#,
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
        let parse_error = |e: sqlx::Error| {
            DbConnError::query_failed(format!("Failed to parse column of '{}'", table_name), e)
        };

        let ordinal: i64 = row.try_get("ORDINAL_POSITION").map_err(parse_error)?;
        let name: String = row.try_get("COLUMN_NAME").map_err(parse_error)?;
        let data_type: String = row.try_get("DATA_TYPE").map_err(parse_error)?;
        let char_max_length: Option<i64> = row.try_get("CHARACTER_MAXIMUM_LENGTH").map_err(parse_error)?;
        let numeric_precision: Option<i64> = row.try_get("NUMERIC_PRECISION").map_err(parse_error)?;
        let numeric_scale: Option<i64> = row.try_get("NUMERIC_SCALE").map_err(parse_error)?;
        let is_nullable: String = row.try_get("IS_NULLABLE").map_err(parse_error)?;

        let (size, scale) = if has_character_length(&data_type) {
            (to_u32(char_max_length), None)
        } else if has_numeric_precision(&data_type) {
            (to_u32(numeric_precision), to_u32(numeric_scale))
        } else {
            (None, None)
        };

        columns.push(DriverColumn {
            ordinal: u32::try_from(ordinal).unwrap_or_default(),
            name,
            type_code: mysql_type_code(&data_type),
            type_name: data_type.to_uppercase(),
            size,
            scale,
            nullable: is_nullable.eq_ignore_ascii_case("YES"),
        });
    }

    Ok(columns)
}

/// Names of the columns that form a table's primary key.
pub(crate) async fn primary_key_columns(
    pool: &MySqlPool,
    table_name: &str,
) -> Result<HashSet<String>> {
    let rows = sqlx::query(
        r#"
        SELECT CAST(COLUMN_NAME AS CHAR) AS COLUMN_NAME
        FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE
        WHERE TABLE_SCHEMA = DATABASE()
        AND TABLE_NAME = ?
        AND CONSTRAINT_NAME = 'PRIMARY'
        "#,
    )
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
            row.try_get::<String, _>("COLUMN_NAME")
                .map_err(|e| DbConnError::query_failed("Failed to parse primary key column", e))
        })
        .collect()
}

fn to_u32(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

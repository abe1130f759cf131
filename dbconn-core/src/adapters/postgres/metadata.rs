//! PostgreSQL catalog introspection through `information_schema`.
//!
//! Tables and columns are scoped to `current_schema()`, which follows the
//! session's `search_path`. Name columns are cast to `text` because
//! `information_schema` exposes them through the `sql_identifier` domain.

use super::type_mapping::{has_character_length, has_numeric_precision, postgres_type_code};
use crate::{Result, error::DbConnError, models::DriverColumn};
use sqlx::{PgPool, Row};
use std::collections::HashSet;

/// Lists base tables of the current schema whose names match a LIKE pattern.
pub(crate) async fn list_tables(pool: &PgPool, pattern: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT table_name::text AS table_name
        FROM information_schema.tables
        WHERE table_schema = current_schema()
        AND table_type = 'BASE TABLE'
        AND table_name LIKE $1
        ORDER BY table_name
        "#,
    )
    .bind(pattern)
    .fetch_all(pool)
    .await
    .map_err(|e| DbConnError::query_failed("Failed to enumerate tables", e))?;

    rows.iter()
        .map(|row| {
            row.try_get::<String, _>("table_name")
                .map_err(|e| DbConnError::query_failed("Failed to parse table name", e))
        })
        .collect()
}

/// Lists all schemas visible to the session.
pub(crate) async fn list_schemas(pool: &PgPool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        "SELECT schema_name::text AS schema_name FROM information_schema.schemata ORDER BY schema_name",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| DbConnError::query_failed("Failed to enumerate schemas", e))?;

    rows.iter()
        .map(|row| {
            row.try_get::<String, _>("schema_name")
                .map_err(|e| DbConnError::query_failed("Failed to parse schema name", e))
        })
        .collect()
}

/// Collects column metadata for a table of the current schema.
pub(crate) async fn collect_columns(pool: &PgPool, table_name: &str) -> Result<Vec<DriverColumn>> {
    let rows = sqlx::query(
        r#"
        SELECT
            ordinal_position::int4 AS ordinal_position,
            column_name::text AS column_name,
            udt_name::text AS udt_name,
            character_maximum_length::int4 AS character_maximum_length,
            numeric_precision::int4 AS numeric_precision,
            numeric_scale::int4 AS numeric_scale,
            (is_nullable = 'YES') AS is_nullable
        FROM information_schema.columns
        WHERE table_schema = current_schema()
        AND table_name = $1
        ORDER BY ordinal_position
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

        let ordinal: i32 = row.try_get("ordinal_position").map_err(parse_error)?;
        let name: String = row.try_get("column_name").map_err(parse_error)?;
        let udt_name: String = row.try_get("udt_name").map_err(parse_error)?;
        let char_max_length: Option<i32> = row.try_get("character_maximum_length").map_err(parse_error)?;
        let numeric_precision: Option<i32> = row.try_get("numeric_precision").map_err(parse_error)?;
        let numeric_scale: Option<i32> = row.try_get("numeric_scale").map_err(parse_error)?;
        let nullable: bool = row.try_get("is_nullable").map_err(parse_error)?;

        let (size, scale) = if has_character_length(&udt_name) {
            (to_u32(char_max_length), None)
        } else if has_numeric_precision(&udt_name) {
            (to_u32(numeric_precision), to_u32(numeric_scale))
        } else {
            (None, None)
        };

        columns.push(DriverColumn {
            ordinal: u32::try_from(ordinal).unwrap_or_default(),
            name,
            type_code: postgres_type_code(&udt_name),
            type_name: udt_name.to_uppercase(),
            size,
            scale,
            nullable,
        });
    }

    Ok(columns)
}

/// Names of the columns that form a table's primary key.
pub(crate) async fn primary_key_columns(pool: &PgPool, table_name: &str) -> Result<HashSet<String>> {
    let rows = sqlx::query(
        r#"
        SELECT kcu.column_name::text AS column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_name = kcu.constraint_name
            AND tc.table_schema = kcu.table_schema
            AND tc.table_name = kcu.table_name
        WHERE tc.constraint_type = 'PRIMARY KEY'
        AND tc.table_schema = current_schema()
        AND tc.table_name = $1
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
            row.try_get::<String, _>("column_name")
                .map_err(|e| DbConnError::query_failed("Failed to parse primary key column", e))
        })
        .collect()
}

fn to_u32(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

//! CSV export of table data.
//!
//! Dialect: comma separator, `\n` line endings, an unquoted header line of
//! column names. A value is wrapped in double quotes, with embedded double
//! quotes doubled, if and only if it contains a comma or a line break.

use super::write_document;
use crate::metadata::MetadataService;
use crate::models::{ColumnDescriptor, QueryResult};
use crate::{Result, error::DbConnError};
use std::borrow::Cow;
use std::path::Path;

/// Quotes a single CSV value when it contains a comma or line break.
///
/// # Example
/// ```rust
/// use dbconn_core::export::quote_field;
///
/// assert_eq!(quote_field("plain"), "plain");
/// assert_eq!(quote_field("a,b"), "\"a,b\"");
/// assert_eq!(quote_field("say \"hi\",\nbye"), "\"say \"\"hi\"\",\nbye\"");
/// ```
pub fn quote_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Renders a header line followed by one line per row.
pub fn render_csv(header: &[&str], result: &QueryResult) -> String {
    let mut out = header.join(",");
    out.push('\n');

    for row in result.rows() {
        let line: Vec<Cow<'_, str>> = row.iter().map(|value| quote_field(value)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

/// Builds the SELECT statement over all columns in ordinal order.
///
/// A non-blank `clause` (WHERE/ORDER BY text) is appended verbatim.
pub fn build_select(table: &str, columns: &[ColumnDescriptor], clause: Option<&str>) -> String {
    let names: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
    let mut sql = format!("select {} from {}", names.join(", "), table);

    if let Some(clause) = clause.map(str::trim).filter(|clause| !clause.is_empty()) {
        sql.push(' ');
        sql.push_str(clause);
    }

    sql
}

/// Exports the rows of a table, optionally filtered by a clause, to `path`.
///
/// Returns the number of data rows written.
///
/// # Errors
/// Returns error if the table has no columns, the query fails, or the file
/// cannot be written
pub async fn export_table_data(
    metadata: &MetadataService<'_>,
    table: &str,
    clause: Option<&str>,
    path: &Path,
) -> Result<usize> {
    let columns = metadata.list_columns(table, false).await?;
    if columns.is_empty() {
        return Err(DbConnError::configuration(format!(
            "No columns found for table {}",
            table
        )));
    }

    let sql = build_select(table, &columns, clause);
    let result = metadata.run_query(&sql, columns.len()).await?;

    let header: Vec<&str> = columns.iter().map(|column| column.name.as_str()).collect();
    let document = render_csv(&header, &result);
    write_document(path, &document).await?;

    tracing::info!(
        "Exported {} rows of {} to {}",
        result.len(),
        table,
        path.display()
    );
    Ok(result.len())
}

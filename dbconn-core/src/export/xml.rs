//! XML export of schema metadata.
//!
//! Layout, with CRLF line endings:
//!
//! ```text
//! <?xml version="1.0"?>
//! <tables>
//!   <lastrun>1718000000000</lastrun>
//!   <table id="ORDERS">
//!     <col order="1" type="INTEGER" nullable="0" pk="1">id</col>
//!   </table>
//! </tables>
//! ```

use super::write_document;
use crate::metadata::MetadataService;
use crate::models::ColumnDescriptor;
use crate::{Result, error::DbConnError};
use std::fmt::Write as _;
use std::path::Path;

const EOL: &str = "\r\n";

/// Escapes text for use in XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Renders tables and their columns as an XML document.
///
/// Tables are written in the order given; `lastrun` is the run timestamp in
/// milliseconds since the Unix epoch.
pub fn render_schema_xml(tables: &[(String, Vec<ColumnDescriptor>)], lastrun: i64) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = write!(out, "<?xml version=\"1.0\"?>{EOL}<tables>{EOL}");
    let _ = write!(out, "  <lastrun>{}</lastrun>{EOL}", lastrun);

    for (table, columns) in tables {
        let _ = write!(out, "  <table id=\"{}\">{EOL}", escape_xml(&table.to_uppercase()));
        for column in columns {
            let _ = write!(
                out,
                "    <col order=\"{}\" type=\"{}\" nullable=\"{}\" pk=\"{}\">{}</col>{EOL}",
                column.ordinal,
                escape_xml(&column.display_type),
                u8::from(column.nullable),
                u8::from(column.primary_key),
                escape_xml(&column.name),
            );
        }
        let _ = write!(out, "  </table>{EOL}");
    }

    let _ = write!(out, "</tables>{EOL}");
    out
}

/// Exports every table of the current schema, sorted by name, to `path`.
///
/// Returns the number of tables written. When there are no tables nothing
/// is written and `0` is returned.
///
/// # Errors
/// Returns error if `path` is a directory, a metadata lookup fails, or the
/// file cannot be written
pub async fn export_schema(metadata: &MetadataService<'_>, path: &Path) -> Result<usize> {
    if tokio::fs::metadata(path)
        .await
        .is_ok_and(|target| target.is_dir())
    {
        return Err(DbConnError::configuration(
            "The output file name is a directory. Stopping.",
        ));
    }

    let mut table_names = metadata.list_tables(None).await?;
    if table_names.is_empty() {
        return Ok(0);
    }
    table_names.sort();

    let mut tables = Vec::with_capacity(table_names.len());
    for table in table_names {
        let columns = metadata.list_columns(&table, true).await?;
        tables.push((table, columns));
    }

    let document = render_schema_xml(&tables, chrono::Utc::now().timestamp_millis());
    write_document(path, &document).await?;

    tracing::info!("Exported {} tables to {}", tables.len(), path.display());
    Ok(tables.len())
}

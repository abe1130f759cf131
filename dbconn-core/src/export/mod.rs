//! Export pipeline: table data to CSV and schema metadata to XML.
//!
//! Both exporters render the whole document in memory and only then touch
//! the filesystem. The document is written to a sibling temporary file and
//! renamed into place, so a failed write never leaves a partial target file.

pub mod csv;
pub mod xml;

pub use self::csv::{export_table_data, quote_field, render_csv};
pub use self::xml::{export_schema, render_schema_xml};

use crate::{Result, error::DbConnError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Writes a fully rendered document to `path`.
///
/// # Errors
/// Returns an I/O error if the temporary file cannot be written or renamed;
/// the temporary file is removed on failure
pub async fn write_document(path: &Path, contents: &str) -> Result<()> {
    let staging = staging_path(path);

    if let Err(e) = tokio::fs::write(&staging, contents).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(DbConnError::io(
            format!("Failed to write to {}", path.display()),
            e,
        ));
    }

    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(DbConnError::io(
            format!("Failed to move output into {}", path.display()),
            e,
        ));
    }

    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("export"));
    name.push(".partial");
    path.with_file_name(name)
}

//! Data model shared by the drivers, the metadata service and the exporters.

use std::fmt;
use zeroize::Zeroizing;

/// Database engines with a compiled-in driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// URL schemes accepted for this engine, in display order.
    pub fn url_schemes(self) -> &'static [&'static str] {
        match self {
            Self::PostgreSQL => &["postgres://", "postgresql://"],
            Self::MySQL => &["mysql://", "mariadb://"],
            Self::SQLite => &["sqlite://", "sqlite::memory:", "*.db", "*.sqlite", "*.sqlite3"],
        }
    }

    /// Every engine, in display order.
    pub fn all() -> [Self; 3] {
        [Self::PostgreSQL, Self::MySQL, Self::SQLite]
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PostgreSQL => write!(f, "PostgreSQL"),
            Self::MySQL => write!(f, "MySQL"),
            Self::SQLite => write!(f, "SQLite"),
        }
    }
}

/// Target of a connection: URL, user name and password.
///
/// The password is held in a zeroizing container and is never printed by
/// the `Debug` implementation.
#[derive(Clone)]
pub struct ConnectionDescriptor {
    url: String,
    username: String,
    password: Zeroizing<String>,
}

impl ConnectionDescriptor {
    /// Creates a new descriptor.
    pub fn new(url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: Zeroizing::new(password.into()),
        }
    }

    /// Connection URL as typed by the user.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// User name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password, only for handing to the driver.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Whether a non-empty password was supplied.
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("url", &crate::error::redact_database_url(&self.url))
            .field("username", &self.username)
            .field("has_password", &self.has_password())
            .finish()
    }
}

/// Normalized column type, independent of vendor type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizedType {
    Integer,
    Short,
    Long,
    Float,
    Double,
    Decimal,
    String,
    Date,
    Boolean,
    Clob,
    Blob,
    Xml,
    Object,
    Unknown,
}

impl NormalizedType {
    /// Whether the type carries a scale alongside its size.
    pub fn has_scale(self) -> bool {
        matches!(self, Self::Decimal | Self::Double | Self::Float)
    }
}

impl fmt::Display for NormalizedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "INTEGER",
            Self::Short => "SHORT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Decimal => "DECIMAL",
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::Boolean => "BOOLEAN",
            Self::Clob => "CLOB",
            Self::Blob => "BLOB",
            Self::Xml => "XML",
            Self::Object => "OBJECT",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Column metadata as a driver reports it, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverColumn {
    /// 1-based position within the table
    pub ordinal: u32,
    pub name: String,
    /// Standard SQL/CLI type code (see [`crate::type_mapping::type_codes`])
    pub type_code: i32,
    /// Vendor type name without size suffix, e.g. `VARCHAR`
    pub type_name: String,
    /// Character length or numeric precision, when the driver reports one
    pub size: Option<u32>,
    /// Numeric scale, when the driver reports one
    pub scale: Option<u32>,
    pub nullable: bool,
}

/// Introspected column, produced per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// 1-based position within the table
    pub ordinal: u32,
    pub name: String,
    pub normalized_type: NormalizedType,
    /// Vendor type name plus size/precision suffix, e.g. `VARCHAR(40)`
    pub display_type: String,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDescriptor {
    /// Nullability column text used by `describe table`.
    pub fn nullable_label(&self) -> &'static str {
        if self.nullable { "" } else { "NOT NULL" }
    }

    /// Primary-key column text used by `describe table`.
    pub fn primary_key_label(&self) -> &'static str {
        if self.primary_key { "PK" } else { "-" }
    }
}

/// Rows of a query, each holding exactly `column_count` text values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    column_count: usize,
    rows: Vec<Vec<String>>,
}

impl QueryResult {
    /// Text used for SQL NULL values.
    pub const NULL_TEXT: &'static str = "null";

    /// Creates an empty result with a fixed column count.
    pub fn new(column_count: usize) -> Self {
        Self {
            column_count,
            rows: Vec::new(),
        }
    }

    /// Appends a row; values beyond `column_count` are dropped and missing
    /// values are filled with [`Self::NULL_TEXT`].
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.column_count, Self::NULL_TEXT.to_string());
        self.rows.push(row);
    }

    /// Number of values in each row.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Rows in driver order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_debug_hides_password() {
        let descriptor =
            ConnectionDescriptor::new("postgres://localhost/db", "alice", "hunter2");
        let debug = format!("{:?}", descriptor);

        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("has_password: true"));
    }

    #[test]
    fn test_query_result_fixed_width() {
        let mut result = QueryResult::new(2);
        result.push_row(vec!["1".to_string()]);
        result.push_row(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows()[0], vec!["1", "null"]);
        assert_eq!(result.rows()[1], vec!["a", "b"]);
    }

    #[test]
    fn test_column_labels() {
        let column = ColumnDescriptor {
            ordinal: 1,
            name: "id".to_string(),
            normalized_type: NormalizedType::Integer,
            display_type: "INTEGER".to_string(),
            nullable: false,
            primary_key: true,
        };
        assert_eq!(column.nullable_label(), "NOT NULL");
        assert_eq!(column.primary_key_label(), "PK");
    }
}

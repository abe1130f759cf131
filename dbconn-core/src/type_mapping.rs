//! Standard SQL type codes and their normalized types.
//!
//! Drivers translate vendor type names into the standard SQL/CLI type codes
//! (the X/Open numbering also used by ODBC). [`map_type`] then folds those
//! codes into a [`NormalizedType`]. The mapping is total: unrecognized codes
//! yield [`NormalizedType::Unknown`] with a warning.

use crate::models::NormalizedType;

/// Standard SQL/CLI type codes.
pub mod type_codes {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const NCHAR: i32 = -15;
    pub const NVARCHAR: i32 = -9;
    pub const LONGNVARCHAR: i32 = -16;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const NULL: i32 = 0;
    pub const OTHER: i32 = 1111;
    pub const JAVA_OBJECT: i32 = 2000;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const NCLOB: i32 = 2011;
    /// Vendor XML code used by Oracle drivers
    pub const XMLTYPE: i32 = 2007;
    pub const SQLXML: i32 = 2009;
    pub const BOOLEAN: i32 = 16;
}

/// Maps a standard type code to its normalized type.
///
/// `type_name` is only used for the warning emitted on unknown codes.
///
/// # Example
/// ```rust
/// use dbconn_core::models::NormalizedType;
/// use dbconn_core::type_mapping::{map_type, type_codes};
///
/// assert_eq!(map_type(type_codes::VARCHAR, "VARCHAR"), NormalizedType::String);
/// assert_eq!(map_type(4242, "GEOGRAPHY"), NormalizedType::Unknown);
/// ```
pub fn map_type(type_code: i32, type_name: &str) -> NormalizedType {
    use type_codes::*;

    match type_code {
        BIGINT => NormalizedType::Long,
        BOOLEAN | BIT => NormalizedType::Boolean,
        CHAR | VARCHAR | LONGVARCHAR | NCHAR | NVARCHAR | LONGNVARCHAR => NormalizedType::String,
        NUMERIC | DOUBLE | REAL => NormalizedType::Double,
        DECIMAL => NormalizedType::Decimal,
        FLOAT => NormalizedType::Float,
        INTEGER => NormalizedType::Integer,
        TINYINT | SMALLINT => NormalizedType::Short,
        DATE | TIMESTAMP => NormalizedType::Date,
        CLOB | NCLOB => NormalizedType::Clob,
        BLOB => NormalizedType::Blob,
        XMLTYPE | SQLXML => NormalizedType::Xml,
        OTHER | VARBINARY => NormalizedType::Object,
        _ => {
            tracing::warn!("Unknown type: {} / {}", type_name, type_code);
            NormalizedType::Unknown
        }
    }
}

/// Builds the display form of a column type: vendor name plus size suffix.
///
/// DATE types never get a suffix. Types with a scale get `(size, scale)`
/// when the scale is nonzero; everything else gets `(size)` when the driver
/// reports a size.
pub fn format_type(
    type_name: &str,
    normalized: NormalizedType,
    size: Option<u32>,
    scale: Option<u32>,
) -> String {
    if normalized == NormalizedType::Date {
        return type_name.to_string();
    }

    match (size, scale) {
        (None, _) => type_name.to_string(),
        (Some(size), Some(scale)) if normalized.has_scale() && scale != 0 => {
            format!("{}({}, {})", type_name, size, scale)
        }
        (Some(size), _) => format!("{}({})", type_name, size),
    }
}

//! SQLite declared types to standard SQL type codes.
//!
//! SQLite stores whatever declared type name a column was created with. The
//! name is matched first against well-known SQL type names and then against
//! the SQLite affinity rules:
//! 1. Contains "INT" -> INTEGER affinity
//! 2. Contains "CHAR", "CLOB", or "TEXT" -> TEXT affinity
//! 3. Contains "BLOB" or no type specified -> BLOB affinity
//! 4. Contains "REAL", "FLOA", or "DOUB" -> REAL affinity

use crate::type_mapping::type_codes;

/// Maps a SQLite base type name (no size suffix) to a standard type code.
///
/// # Example
/// ```rust
/// use dbconn_core::adapters::sqlite::sqlite_type_code;
/// use dbconn_core::type_mapping::type_codes;
///
/// assert_eq!(sqlite_type_code("VARCHAR"), type_codes::VARCHAR);
/// assert_eq!(sqlite_type_code("UNSIGNED BIG INT"), type_codes::BIGINT);
/// ```
pub fn sqlite_type_code(base_type: &str) -> i32 {
    let base_type = base_type.trim().to_uppercase();

    match base_type.as_str() {
        "" | "BLOB" => return type_codes::BLOB,
        "BOOLEAN" | "BOOL" => return type_codes::BOOLEAN,
        "BIT" => return type_codes::BIT,
        "DATE" => return type_codes::DATE,
        "TIME" => return type_codes::TIME,
        "DATETIME" | "TIMESTAMP" => return type_codes::TIMESTAMP,
        "NUMERIC" | "NUMBER" => return type_codes::NUMERIC,
        "DECIMAL" => return type_codes::DECIMAL,
        "FLOAT" => return type_codes::FLOAT,
        "REAL" => return type_codes::REAL,
        "XML" => return type_codes::SQLXML,
        "CLOB" => return type_codes::CLOB,
        "NCLOB" => return type_codes::NCLOB,
        "BINARY" => return type_codes::BINARY,
        "VARBINARY" => return type_codes::VARBINARY,
        "CHAR" | "CHARACTER" => return type_codes::CHAR,
        "NCHAR" | "NATIVE CHARACTER" => return type_codes::NCHAR,
        "NVARCHAR" | "VARYING CHARACTER" => return type_codes::NVARCHAR,
        "TEXT" => return type_codes::LONGVARCHAR,
        _ => {}
    }

    // Affinity rules for everything else
    if base_type.contains("INT") {
        if base_type.contains("BIG") {
            type_codes::BIGINT
        } else if base_type.contains("SMALL") {
            type_codes::SMALLINT
        } else if base_type.contains("TINY") {
            type_codes::TINYINT
        } else {
            type_codes::INTEGER
        }
    } else if base_type.contains("CHAR") || base_type.contains("TEXT") {
        type_codes::VARCHAR
    } else if base_type.contains("CLOB") {
        type_codes::CLOB
    } else if base_type.contains("BLOB") {
        type_codes::BLOB
    } else if base_type.contains("DOUB") {
        type_codes::DOUBLE
    } else if base_type.contains("REAL") || base_type.contains("FLOA") {
        type_codes::REAL
    } else {
        type_codes::OTHER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_affinity() {
        assert_eq!(sqlite_type_code("INTEGER"), type_codes::INTEGER);
        assert_eq!(sqlite_type_code("int"), type_codes::INTEGER);
        assert_eq!(sqlite_type_code("MEDIUMINT"), type_codes::INTEGER);
        assert_eq!(sqlite_type_code("BIGINT"), type_codes::BIGINT);
        assert_eq!(sqlite_type_code("SMALLINT"), type_codes::SMALLINT);
        assert_eq!(sqlite_type_code("TINYINT"), type_codes::TINYINT);
    }

    #[test]
    fn test_text_types() {
        assert_eq!(sqlite_type_code("VARCHAR"), type_codes::VARCHAR);
        assert_eq!(sqlite_type_code("CHAR"), type_codes::CHAR);
        assert_eq!(sqlite_type_code("TEXT"), type_codes::LONGVARCHAR);
        assert_eq!(sqlite_type_code("NVARCHAR"), type_codes::NVARCHAR);
        assert_eq!(sqlite_type_code("VARYING CHARACTER"), type_codes::NVARCHAR);
        assert_eq!(sqlite_type_code("CLOB"), type_codes::CLOB);
    }

    #[test]
    fn test_numeric_and_date_types() {
        assert_eq!(sqlite_type_code("DECIMAL"), type_codes::DECIMAL);
        assert_eq!(sqlite_type_code("NUMERIC"), type_codes::NUMERIC);
        assert_eq!(sqlite_type_code("DOUBLE PRECISION"), type_codes::DOUBLE);
        assert_eq!(sqlite_type_code("REAL"), type_codes::REAL);
        assert_eq!(sqlite_type_code("FLOAT"), type_codes::FLOAT);
        assert_eq!(sqlite_type_code("DATE"), type_codes::DATE);
        assert_eq!(sqlite_type_code("DATETIME"), type_codes::TIMESTAMP);
        assert_eq!(sqlite_type_code("BOOLEAN"), type_codes::BOOLEAN);
    }

    #[test]
    fn test_blob_and_unknown_types() {
        assert_eq!(sqlite_type_code(""), type_codes::BLOB);
        assert_eq!(sqlite_type_code("BLOB"), type_codes::BLOB);
        assert_eq!(sqlite_type_code("JSON"), type_codes::OTHER);
        assert_eq!(sqlite_type_code("GEOMETRY"), type_codes::OTHER);
    }
}

//! MySQL and MariaDB data types to standard SQL type codes.

use crate::type_mapping::type_codes;

/// Maps a MySQL `DATA_TYPE` to a standard type code.
///
/// # Example
/// ```rust
/// use dbconn_core::adapters::mysql::mysql_type_code;
/// use dbconn_core::type_mapping::type_codes;
///
/// assert_eq!(mysql_type_code("varchar"), type_codes::VARCHAR);
/// assert_eq!(mysql_type_code("geometry"), type_codes::OTHER);
/// ```
pub fn mysql_type_code(data_type: &str) -> i32 {
    match data_type.to_lowercase().as_str() {
        "tinyint" => type_codes::TINYINT,
        "smallint" => type_codes::SMALLINT,
        "mediumint" | "int" | "integer" => type_codes::INTEGER,
        "bigint" => type_codes::BIGINT,
        "float" => type_codes::REAL,
        "double" | "double precision" | "real" => type_codes::DOUBLE,
        "decimal" | "numeric" => type_codes::DECIMAL,
        "bit" | "bool" | "boolean" => type_codes::BIT,
        "char" | "enum" | "set" => type_codes::CHAR,
        "varchar" => type_codes::VARCHAR,
        "tinytext" | "text" | "mediumtext" | "longtext" | "json" => type_codes::LONGVARCHAR,
        "date" | "year" => type_codes::DATE,
        "time" => type_codes::TIME,
        "datetime" | "timestamp" => type_codes::TIMESTAMP,
        "binary" => type_codes::BINARY,
        "varbinary" => type_codes::VARBINARY,
        "tinyblob" | "blob" | "mediumblob" | "longblob" => type_codes::LONGVARBINARY,
        _ => type_codes::OTHER,
    }
}

/// Whether a type reports a character length as its size.
pub(crate) fn has_character_length(data_type: &str) -> bool {
    matches!(
        data_type.to_lowercase().as_str(),
        "char" | "varchar" | "binary" | "varbinary"
    )
}

/// Whether a type reports precision and scale as its size.
pub(crate) fn has_numeric_precision(data_type: &str) -> bool {
    matches!(data_type.to_lowercase().as_str(), "decimal" | "numeric")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_types() {
        assert_eq!(mysql_type_code("INT"), type_codes::INTEGER);
        assert_eq!(mysql_type_code("bigint"), type_codes::BIGINT);
        assert_eq!(mysql_type_code("decimal"), type_codes::DECIMAL);
        assert_eq!(mysql_type_code("double"), type_codes::DOUBLE);
        assert_eq!(mysql_type_code("tinyint"), type_codes::TINYINT);
    }

    #[test]
    fn test_text_and_temporal_types() {
        assert_eq!(mysql_type_code("varchar"), type_codes::VARCHAR);
        assert_eq!(mysql_type_code("longtext"), type_codes::LONGVARCHAR);
        assert_eq!(mysql_type_code("enum"), type_codes::CHAR);
        assert_eq!(mysql_type_code("datetime"), type_codes::TIMESTAMP);
        assert_eq!(mysql_type_code("date"), type_codes::DATE);
    }

    #[test]
    fn test_size_rules() {
        assert!(has_character_length("VARCHAR"));
        assert!(!has_character_length("text"));
        assert!(has_numeric_precision("decimal"));
        assert!(!has_numeric_precision("int"));
    }
}

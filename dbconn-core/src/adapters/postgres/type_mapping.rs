//! PostgreSQL type names to standard SQL type codes.

use crate::type_mapping::type_codes;

/// Maps a PostgreSQL `udt_name` to the standard type code its driver reports.
///
/// # Arguments
/// * `udt_name` - Internal type name from `information_schema.columns`
///
/// # Returns
/// The standard type code, or `OTHER` for types without a standard code
///
/// # Example
/// ```rust
/// use dbconn_core::adapters::postgres::postgres_type_code;
/// use dbconn_core::type_mapping::type_codes;
///
/// assert_eq!(postgres_type_code("int8"), type_codes::BIGINT);
/// assert_eq!(postgres_type_code("jsonb"), type_codes::OTHER);
/// ```
pub fn postgres_type_code(udt_name: &str) -> i32 {
    match udt_name.to_lowercase().as_str() {
        "int2" | "smallint" => type_codes::SMALLINT,
        "int4" | "integer" | "serial" => type_codes::INTEGER,
        "int8" | "bigint" | "bigserial" | "oid" => type_codes::BIGINT,
        "float4" | "real" => type_codes::REAL,
        "float8" | "double precision" | "money" => type_codes::DOUBLE,
        "numeric" | "decimal" => type_codes::NUMERIC,
        "varchar" | "text" | "name" | "character varying" => type_codes::VARCHAR,
        "bpchar" | "char" | "character" => type_codes::CHAR,
        "bool" | "boolean" | "bit" => type_codes::BIT,
        "date" => type_codes::DATE,
        "time" | "timetz" => type_codes::TIME,
        "timestamp" | "timestamptz" => type_codes::TIMESTAMP,
        "bytea" => type_codes::BINARY,
        "xml" => type_codes::SQLXML,
        _ => type_codes::OTHER,
    }
}

/// Whether a type reports a character length as its size.
pub(crate) fn has_character_length(udt_name: &str) -> bool {
    matches!(udt_name, "varchar" | "bpchar" | "bit" | "varbit")
}

/// Whether a type reports precision and scale as its size.
pub(crate) fn has_numeric_precision(udt_name: &str) -> bool {
    udt_name == "numeric"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_types() {
        assert_eq!(postgres_type_code("int2"), type_codes::SMALLINT);
        assert_eq!(postgres_type_code("int4"), type_codes::INTEGER);
        assert_eq!(postgres_type_code("int8"), type_codes::BIGINT);
    }

    #[test]
    fn test_text_and_temporal_types() {
        assert_eq!(postgres_type_code("varchar"), type_codes::VARCHAR);
        assert_eq!(postgres_type_code("text"), type_codes::VARCHAR);
        assert_eq!(postgres_type_code("bpchar"), type_codes::CHAR);
        assert_eq!(postgres_type_code("timestamptz"), type_codes::TIMESTAMP);
        assert_eq!(postgres_type_code("date"), type_codes::DATE);
    }

    #[test]
    fn test_other_types() {
        assert_eq!(postgres_type_code("bool"), type_codes::BIT);
        assert_eq!(postgres_type_code("xml"), type_codes::SQLXML);
        assert_eq!(postgres_type_code("uuid"), type_codes::OTHER);
        assert_eq!(postgres_type_code("_int4"), type_codes::OTHER);
    }

    #[test]
    fn test_size_rules() {
        assert!(has_character_length("varchar"));
        assert!(!has_character_length("text"));
        assert!(has_numeric_precision("numeric"));
        assert!(!has_numeric_precision("int4"));
    }
}

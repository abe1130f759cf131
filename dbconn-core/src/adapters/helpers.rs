//! Helper utilities for driver implementations.
//!
//! Row decoding for pass-through queries and SQL quoting are shared by every
//! driver so NULL handling and error mapping stay consistent.

use crate::{Result, error::DbConnError, models::QueryResult};
use sqlx::{ColumnIndex, Decode, Row};

/// Placeholder for a value the driver cannot render as text.
pub const UNREADABLE_VALUE: &str = "<unreadable>";

/// Converts fetched rows into a fixed-width text [`QueryResult`].
///
/// SQL NULL becomes [`QueryResult::NULL_TEXT`]. A value that cannot be
/// decoded as text becomes [`UNREADABLE_VALUE`] so one odd column does not
/// abort the whole result. Requesting more columns than a row holds is an
/// error.
///
/// # Arguments
/// * `rows` - Rows as returned by the driver, in driver order
/// * `column_count` - Number of leading columns to read from each row
///
/// # Errors
/// Returns a query error if a requested column index does not exist
pub fn rows_to_result<R>(rows: &[R], column_count: usize) -> Result<QueryResult>
where
    R: Row,
    usize: ColumnIndex<R>,
    for<'r> String: Decode<'r, R::Database>,
{
    let mut result = QueryResult::new(column_count);

    for row in rows {
        let mut values = Vec::with_capacity(column_count);
        for index in 0..column_count {
            let value = match row.try_get_unchecked::<Option<String>, usize>(index) {
                Ok(Some(text)) => text,
                Ok(None) => QueryResult::NULL_TEXT.to_string(),
                Err(sqlx::Error::ColumnDecode { source, .. }) => {
                    tracing::debug!("Column {} could not be read as text: {}", index + 1, source);
                    UNREADABLE_VALUE.to_string()
                }
                Err(e) => {
                    return Err(DbConnError::query_failed(
                        format!("Failed to read column {} of query result", index + 1),
                        e,
                    ));
                }
            };
            values.push(value);
        }
        result.push_row(values);
    }

    Ok(result)
}

/// Quotes a string as a SQL literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Parses a declared SQL type such as `DECIMAL(10, 2)` into its base name,
/// size and scale.
///
/// The base name is upper-cased. Missing or malformed arguments yield `None`.
pub fn parse_declared_type(declared: &str) -> (String, Option<u32>, Option<u32>) {
    let declared = declared.trim();
    let Some(open) = declared.find('(') else {
        return (declared.to_uppercase(), None, None);
    };

    let base = declared[..open].trim().to_uppercase();
    let arguments = declared[open + 1..].trim_end_matches(')');
    let mut parts = arguments.split(',').map(|part| part.trim().parse::<u32>().ok());

    let size = parts.next().flatten();
    let scale = parts.next().flatten();
    (base, size, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal("public"), "'public'");
        assert_eq!(quote_literal("o'brien"), "'o''brien'");
    }

    #[test]
    fn test_parse_declared_type() {
        assert_eq!(
            parse_declared_type("varchar(40)"),
            ("VARCHAR".to_string(), Some(40), None)
        );
        assert_eq!(
            parse_declared_type("DECIMAL(10, 2)"),
            ("DECIMAL".to_string(), Some(10), Some(2))
        );
        assert_eq!(
            parse_declared_type("INTEGER"),
            ("INTEGER".to_string(), None, None)
        );
        assert_eq!(
            parse_declared_type("CHAR(x)"),
            ("CHAR".to_string(), None, None)
        );
        assert_eq!(parse_declared_type(""), (String::new(), None, None));
    }
}

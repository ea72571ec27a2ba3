//! Queries behind the `analyze` command.

use super::builder::{quote_identifier, BuiltQuery, SqlBuilder};
use crate::error_handling::SourceError;

/// Row count of a table.
pub fn table_count_query(table: &str) -> Result<BuiltQuery, SourceError> {
    let table = quote_identifier(table)?;
    Ok(BuiltQuery::raw(format!("SELECT COUNT(*) AS total FROM {table}")))
}

/// Rows of a table whose `ean` column is non-empty.
pub fn ean_count_query(table: &str) -> Result<BuiltQuery, SourceError> {
    let table = quote_identifier(table)?;
    Ok(BuiltQuery::raw(format!(
        "SELECT COUNT(*) AS total FROM {table} WHERE ean IS NOT NULL AND TRIM(ean) <> ''"
    )))
}

/// The first `limit` rows of a table, all columns.
pub fn sample_rows_query(table: &str, limit: u64) -> Result<BuiltQuery, SourceError> {
    let table = quote_identifier(table)?;
    let mut builder = SqlBuilder::new(format!("SELECT * FROM {table} LIMIT "));
    builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_is_quoted() {
        let query = table_count_query("produits").unwrap();
        assert_eq!(query.sql, "SELECT COUNT(*) AS total FROM `produits`");
    }

    #[test]
    fn test_injection_in_table_name_is_rejected() {
        assert!(matches!(
            sample_rows_query("produits WHERE 1=1; --", 3),
            Err(SourceError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_sample_limit_is_bound() {
        let query = sample_rows_query("produits", 3).unwrap();
        assert_eq!(query.placeholder_count(), 1);
    }
}

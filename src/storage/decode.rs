//! Row decoding into backend-neutral [`Record`]s.
//!
//! The select lists are not known at compile time (`analyze` runs `SELECT *`),
//! so values are decoded column by column from their runtime type.

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error_handling::SourceError;
use crate::models::{Record, SqlValue};

pub(crate) fn mysql_record(row: &MySqlRow) -> Result<Record, SourceError> {
    let mut record = Record::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let value = mysql_value(row, index, column.type_info().name())?;
        record.push(column.name(), value);
    }
    Ok(record)
}

fn mysql_value(row: &MySqlRow, index: usize, type_name: &str) -> Result<SqlValue, SourceError> {
    let raw = row.try_get_raw(index).map_err(SourceError::from_statement)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }

    if let Ok(v) = row.try_get::<i64, _>(index) {
        return Ok(SqlValue::Int(v));
    }
    if let Ok(v) = row.try_get::<u64, _>(index) {
        return Ok(SqlValue::UInt(v));
    }
    if let Ok(v) = row.try_get::<f64, _>(index) {
        return Ok(SqlValue::Float(v));
    }
    if let Ok(v) = row.try_get::<NaiveDateTime, _>(index) {
        return Ok(SqlValue::DateTime(v));
    }
    if let Ok(v) = row.try_get::<NaiveDate, _>(index) {
        return Ok(SqlValue::Date(v));
    }
    if let Ok(v) = row.try_get::<String, _>(index) {
        return Ok(SqlValue::Text(v));
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
        return Ok(SqlValue::Text(String::from_utf8_lossy(&v).into_owned()));
    }

    // Zero dates ("0000-00-00") have no chrono representation.
    if type_name.contains("DATE") || type_name.contains("TIMESTAMP") {
        return Ok(SqlValue::Null);
    }

    // DECIMAL and other types without a checked Rust mapping arrive as text.
    row.try_get_unchecked::<String, _>(index)
        .map(SqlValue::Text)
        .map_err(SourceError::from_statement)
}

pub(crate) fn sqlite_record(row: &SqliteRow) -> Result<Record, SourceError> {
    let mut record = Record::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        record.push(column.name(), sqlite_value(row, index)?);
    }
    Ok(record)
}

fn sqlite_value(row: &SqliteRow, index: usize) -> Result<SqlValue, SourceError> {
    let raw = row.try_get_raw(index).map_err(SourceError::from_statement)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }

    // SQLite types values, not columns: dispatch on the storage class.
    let storage_class = raw.type_info().name().to_string();
    let value = match storage_class.as_str() {
        "INTEGER" => row.try_get_unchecked::<i64, _>(index).map(SqlValue::Int),
        "REAL" => row.try_get_unchecked::<f64, _>(index).map(SqlValue::Float),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(|v| SqlValue::Text(String::from_utf8_lossy(&v).into_owned())),
        _ => row.try_get_unchecked::<String, _>(index).map(SqlValue::Text),
    };
    value.map_err(SourceError::from_statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::{Connection, SqliteConnection};

    #[tokio::test]
    async fn test_sqlite_storage_classes() {
        let mut conn = SqliteConnection::connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        let row = sqlx::query("SELECT 42 AS i, 1.5 AS r, 'x' AS t, NULL AS n, '0012' AS ean")
            .fetch_one(&mut conn)
            .await
            .expect("row");

        let record = sqlite_record(&row).expect("decoded");
        assert_eq!(record.get("i"), Some(&SqlValue::Int(42)));
        assert_eq!(record.get("r"), Some(&SqlValue::Float(1.5)));
        assert_eq!(record.get("t"), Some(&SqlValue::from("x")));
        assert_eq!(record.get("n"), Some(&SqlValue::Null));
        assert_eq!(record.get("ean"), Some(&SqlValue::from("0012")));
        assert_eq!(record.len(), 5);
    }
}

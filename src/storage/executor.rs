//! The seam between query construction and a live database.

use async_trait::async_trait;

use crate::error_handling::SourceError;
use crate::models::Record;
use crate::query::BuiltQuery;

/// One column of a source table, as reported by the database catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    /// Key marker (`PRI`, `MUL`, `UNI`) or empty.
    pub key: String,
}

/// Runs built queries against one exclusively owned connection.
///
/// Implementations decode every column of every row into a [`Record`] in
/// select-list order. Statement failures are classified with
/// [`SourceError::from_statement`].
#[async_trait]
pub trait QueryExecutor: Send {
    /// Short backend name used in log messages.
    fn backend(&self) -> &'static str;

    async fn fetch_all(&mut self, query: &BuiltQuery) -> Result<Vec<Record>, SourceError>;

    /// Runs a single-row, single-column `COUNT(*)` query.
    async fn fetch_count(&mut self, query: &BuiltQuery) -> Result<u64, SourceError> {
        let rows = self.fetch_all(query).await?;
        let count = rows
            .first()
            .and_then(|row| row.value_at(0))
            .and_then(|value| value.as_i64())
            .unwrap_or(0);
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Names of every table of the connected database, sorted.
    async fn list_tables(&mut self) -> Result<Vec<String>, SourceError>;

    /// Columns of `table` in ordinal order; empty when the table does not exist.
    async fn table_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, SourceError>;

    /// Closes the connection. Later calls fail with a connection error.
    async fn close(&mut self) -> Result<(), SourceError>;
}

/// Error returned by an executor whose connection was already closed.
pub(crate) fn closed_connection() -> SourceError {
    SourceError::ConnectionLost(sqlx::Error::PoolClosed)
}

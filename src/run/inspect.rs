//! The `tables` and `analyze` commands.

use std::fmt;

use log::info;

use crate::config::{DbSettings, ANALYZE_SAMPLE_ROWS};
use crate::error_handling::{ExportError, SourceError, Stage};
use crate::models::Record;
use crate::query::{ean_count_query, sample_rows_query, table_count_query};
use crate::storage::{connect, ColumnInfo, QueryExecutor};

use super::close_quietly;

/// Fields shown for each sample product, when the table has them.
const SAMPLE_FIELDS: [(&str, &str); 5] = [
    ("idproduit", "ID"),
    ("ean", "EAN"),
    ("ref", "Reference"),
    ("prix", "Price"),
    ("status", "Status"),
];

/// Structure and content statistics of one table.
#[derive(Debug, Clone)]
pub struct TableAnalysis {
    pub table: String,
    pub columns: Vec<ColumnInfo>,
    pub total: u64,
    /// Rows with a non-empty `ean`; `None` when the table has no such column
    pub with_ean: Option<u64>,
    pub samples: Vec<Record>,
}

impl TableAnalysis {
    /// Percentage of rows with an EAN.
    pub fn ean_share(&self) -> Option<f64> {
        let with_ean = self.with_ean?;
        if self.total == 0 {
            return Some(0.0);
        }
        Some(with_ean as f64 * 100.0 / self.total as f64)
    }
}

impl fmt::Display for TableAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table {} analysis", self.table)?;
        writeln!(f, "{}", "=".repeat(50))?;
        writeln!(f, "Total rows: {}", self.total)?;
        if let (Some(with_ean), Some(share)) = (self.with_ean, self.ean_share()) {
            writeln!(f, "Rows with EAN: {with_ean} ({share:.1}%)")?;
        }
        writeln!(f)?;
        writeln!(f, "Structure ({} fields):", self.columns.len())?;
        writeln!(f, "{}", "-".repeat(70))?;
        for column in &self.columns {
            writeln!(
                f,
                "  {:<20} {:<20} {:<5} {:<5}",
                column.name,
                column.data_type,
                if column.nullable { "YES" } else { "NO" },
                column.key
            )?;
        }
        if !self.samples.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sample rows:")?;
            writeln!(f, "{}", "-".repeat(50))?;
            for (i, sample) in self.samples.iter().enumerate() {
                writeln!(f, "Row {}:", i + 1)?;
                for (field, label) in SAMPLE_FIELDS {
                    if let Some(value) = sample.get(field) {
                        writeln!(f, "  {label}: {value}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Names of every table of the source database, sorted.
pub async fn run_tables(settings: &DbSettings) -> Result<Vec<String>, ExportError> {
    let mut executor =
        connect(settings).await.map_err(|e| ExportError::source_at(Stage::Connect, 0, e))?;
    let result = executor
        .list_tables()
        .await
        .map_err(|e| ExportError::source_at(Stage::Query, 0, e));
    close_quietly(executor.as_mut()).await;

    let tables = result?;
    info!("{} tables in {}", tables.len(), settings.target());
    Ok(tables)
}

/// Describes `table`: columns, row counts and a few sample rows.
pub async fn run_analyze(settings: &DbSettings, table: &str) -> Result<TableAnalysis, ExportError> {
    let mut executor =
        connect(settings).await.map_err(|e| ExportError::source_at(Stage::Connect, 0, e))?;
    let result = analyze_with(executor.as_mut(), table).await;
    close_quietly(executor.as_mut()).await;
    result.map_err(|e| ExportError::source_at(Stage::Query, 0, e))
}

/// Same as [`run_analyze`] over an already open connection.
pub async fn analyze_with(
    executor: &mut dyn QueryExecutor,
    table: &str,
) -> Result<TableAnalysis, SourceError> {
    let columns = executor.table_columns(table).await?;
    if columns.is_empty() {
        return Err(SourceError::UnknownTable(table.to_string()));
    }

    let total = executor.fetch_count(&table_count_query(table)?).await?;
    let with_ean = if columns.iter().any(|c| c.name.eq_ignore_ascii_case("ean")) {
        Some(executor.fetch_count(&ean_count_query(table)?).await?)
    } else {
        None
    };
    let samples = executor
        .fetch_all(&sample_rows_query(table, ANALYZE_SAMPLE_ROWS)?)
        .await?;

    Ok(TableAnalysis {
        table: table.to_string(),
        columns,
        total,
        with_ean,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(total: u64, with_ean: Option<u64>) -> TableAnalysis {
        TableAnalysis {
            table: "produits".to_string(),
            columns: vec![ColumnInfo {
                name: "ean".to_string(),
                data_type: "varchar(20)".to_string(),
                nullable: true,
                key: "MUL".to_string(),
            }],
            total,
            with_ean,
            samples: vec![Record::new()
                .with("idproduit", 7_i64)
                .with("ean", "3664436019363")],
        }
    }

    #[test]
    fn test_ean_share() {
        assert_eq!(analysis(200, Some(50)).ean_share(), Some(25.0));
        assert_eq!(analysis(0, Some(0)).ean_share(), Some(0.0));
        assert_eq!(analysis(10, None).ean_share(), None);
    }

    #[test]
    fn test_display() {
        let text = analysis(200, Some(50)).to_string();
        assert!(text.contains("Total rows: 200"));
        assert!(text.contains("Rows with EAN: 50 (25.0%)"));
        assert!(text.contains("varchar(20)"));
        assert!(text.contains("EAN: 3664436019363"));
        assert!(!text.contains("Reference"));
    }
}

//! Startup check of a query shape against the live source schema.

use log::{debug, info};

use crate::error_handling::SourceError;
use crate::query::TableRequirement;

use super::executor::QueryExecutor;

/// Fails with [`SourceError::UnknownTable`] or [`SourceError::UnknownColumn`]
/// when a referenced table or column is missing. Column names compare
/// case-insensitively, as MySQL does.
pub async fn validate_requirements(
    executor: &mut dyn QueryExecutor,
    requirements: &[TableRequirement],
) -> Result<(), SourceError> {
    for requirement in requirements {
        let columns = executor.table_columns(requirement.table).await?;
        if columns.is_empty() {
            return Err(SourceError::UnknownTable(requirement.table.to_string()));
        }
        for wanted in &requirement.columns {
            if !columns.iter().any(|c| c.name.eq_ignore_ascii_case(wanted)) {
                return Err(SourceError::UnknownColumn {
                    table: requirement.table.to_string(),
                    column: wanted.to_string(),
                });
            }
        }
        debug!(
            "Table {} has the {} required columns",
            requirement.table,
            requirement.columns.len()
        );
    }
    info!("Source schema check passed ({} tables)", requirements.len());
    Ok(())
}

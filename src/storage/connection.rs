//! Connection setup from [`DbSettings`].

use crate::config::DbSettings;
use crate::error_handling::SourceError;

use super::executor::QueryExecutor;
use super::mysql::MySqlExecutor;
use super::sqlite::SqliteExecutor;

/// Opens the single connection an invocation owns.
///
/// The caller is responsible for calling [`QueryExecutor::close`] on every exit path.
pub async fn connect(settings: &DbSettings) -> Result<Box<dyn QueryExecutor>, SourceError> {
    match settings {
        DbSettings::MySql {
            host,
            port,
            user,
            password,
            database,
        } => Ok(Box::new(
            MySqlExecutor::connect(host, *port, user, password, database).await?,
        )),
        DbSettings::Sqlite { path } => Ok(Box::new(SqliteExecutor::open(path).await?)),
    }
}

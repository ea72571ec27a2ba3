//! SQLite backend: a local snapshot of the catalogue tables, opened read-only.

use std::path::Path;

use async_trait::async_trait;
use log::{debug, info};
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection, Sqlite};

use crate::error_handling::SourceError;
use crate::models::Record;
use crate::query::{BuiltQuery, SqlParam};

use super::decode::sqlite_record;
use super::executor::{closed_connection, ColumnInfo, QueryExecutor};
use super::hints::connect_hint;

pub struct SqliteExecutor {
    conn: Option<SqliteConnection>,
    target: String,
}

impl SqliteExecutor {
    pub async fn open(path: &Path) -> Result<Self, SourceError> {
        let target = format!("sqlite:{}", path.display());
        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .log_statements(log::LevelFilter::Debug);

        let conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| SourceError::Connect {
                hint: connect_hint(&e),
                target: target.clone(),
                source: e,
            })?;
        info!("Opened {target}");
        Ok(Self {
            conn: Some(conn),
            target,
        })
    }

    fn conn(&mut self) -> Result<&mut SqliteConnection, SourceError> {
        self.conn.as_mut().ok_or_else(closed_connection)
    }
}

fn bind_all<'q>(sql: &'q str, params: &[SqlParam]) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s.clone()),
            SqlParam::Int(v) => query.bind(*v),
        };
    }
    query
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn fetch_all(&mut self, query: &BuiltQuery) -> Result<Vec<Record>, SourceError> {
        let conn = self.conn()?;
        let rows = bind_all(&query.sql, &query.params)
            .fetch_all(&mut *conn)
            .await
            .map_err(SourceError::from_statement)?;
        rows.iter().map(sqlite_record).collect()
    }

    async fn list_tables(&mut self) -> Result<Vec<String>, SourceError> {
        let query = BuiltQuery::raw(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        );
        let rows = self.fetch_all(&query).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.value_at(0).map(|v| v.render()))
            .collect())
    }

    async fn table_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, SourceError> {
        let query = BuiltQuery {
            sql: "SELECT name, type, \"notnull\", pk FROM pragma_table_info(?) ORDER BY cid"
                .to_string(),
            params: vec![SqlParam::from(table)],
        };
        let rows = self.fetch_all(&query).await?;
        Ok(rows
            .iter()
            .map(|row| {
                let int = |index: usize| row.value_at(index).and_then(|v| v.as_i64()).unwrap_or(0);
                ColumnInfo {
                    name: row.value_at(0).map(|v| v.render()).unwrap_or_default(),
                    data_type: row.value_at(1).map(|v| v.render()).unwrap_or_default(),
                    nullable: int(2) == 0,
                    key: if int(3) > 0 { "PRI".to_string() } else { String::new() },
                }
            })
            .collect())
    }

    async fn close(&mut self) -> Result<(), SourceError> {
        if let Some(conn) = self.conn.take() {
            conn.close().await.map_err(SourceError::ConnectionLost)?;
            debug!("Closed {}", self.target);
        }
        Ok(())
    }
}

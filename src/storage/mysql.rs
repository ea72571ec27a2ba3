//! MySQL backend (the production catalogue).

use async_trait::async_trait;
use log::{debug, info};
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlConnection};
use sqlx::query::Query;
use sqlx::{ConnectOptions, Connection, MySql};

use crate::error_handling::SourceError;
use crate::models::Record;
use crate::query::{BuiltQuery, SqlParam};

use super::decode::mysql_record;
use super::executor::{closed_connection, ColumnInfo, QueryExecutor};
use super::hints::connect_hint;

pub struct MySqlExecutor {
    conn: Option<MySqlConnection>,
    target: String,
}

impl MySqlExecutor {
    /// Opens one connection. Statements are logged at `debug`.
    pub async fn connect(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        database: &str,
    ) -> Result<Self, SourceError> {
        let target = format!("mysql://{host}:{port}/{database}");
        let options = MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .username(user)
            .password(password)
            .database(database)
            .charset("utf8mb4")
            .log_statements(log::LevelFilter::Debug);

        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| SourceError::Connect {
                hint: connect_hint(&e),
                target: target.clone(),
                source: e,
            })?;
        info!("Connected to {target}");
        Ok(Self {
            conn: Some(conn),
            target,
        })
    }

    fn conn(&mut self) -> Result<&mut MySqlConnection, SourceError> {
        self.conn.as_mut().ok_or_else(closed_connection)
    }
}

fn bind_all<'q>(sql: &'q str, params: &[SqlParam]) -> Query<'q, MySql, MySqlArguments> {
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
impl QueryExecutor for MySqlExecutor {
    fn backend(&self) -> &'static str {
        "mysql"
    }

    async fn fetch_all(&mut self, query: &BuiltQuery) -> Result<Vec<Record>, SourceError> {
        let conn = self.conn()?;
        let rows = bind_all(&query.sql, &query.params)
            .fetch_all(&mut *conn)
            .await
            .map_err(SourceError::from_statement)?;
        rows.iter().map(mysql_record).collect()
    }

    async fn list_tables(&mut self) -> Result<Vec<String>, SourceError> {
        let query = BuiltQuery::raw(
            "SELECT TABLE_NAME AS name FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = DATABASE() ORDER BY TABLE_NAME",
        );
        let rows = self.fetch_all(&query).await?;
        Ok(rows
            .iter()
            .filter_map(|row| row.value_at(0).map(|v| v.render()))
            .collect())
    }

    async fn table_columns(&mut self, table: &str) -> Result<Vec<ColumnInfo>, SourceError> {
        let query = BuiltQuery {
            sql: "SELECT COLUMN_NAME AS name, COLUMN_TYPE AS data_type, \
                  IS_NULLABLE AS nullable, COLUMN_KEY AS column_key \
                  FROM information_schema.COLUMNS \
                  WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? \
                  ORDER BY ORDINAL_POSITION"
                .to_string(),
            params: vec![SqlParam::from(table)],
        };
        let rows = self.fetch_all(&query).await?;
        let text = |row: &Record, index: usize| {
            row.value_at(index).map(|v| v.render()).unwrap_or_default()
        };
        Ok(rows
            .iter()
            .map(|row| ColumnInfo {
                name: text(row, 0),
                data_type: text(row, 1),
                nullable: text(row, 2).eq_ignore_ascii_case("YES"),
                key: text(row, 3),
            })
            .collect())
    }

    async fn close(&mut self) -> Result<(), SourceError> {
        if let Some(conn) = self.conn.take() {
            conn.close().await.map_err(SourceError::ConnectionLost)?;
            debug!("Closed connection to {}", self.target);
        }
        Ok(())
    }
}

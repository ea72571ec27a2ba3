// storage/mod.rs
// Database access: connections, row decoding, catalogue introspection

mod connection;
mod decode;
mod executor;
mod hints;
mod mysql;
mod schema;
mod sqlite;

pub use connection::connect;
pub use executor::{ColumnInfo, QueryExecutor};
pub use mysql::MySqlExecutor;
pub use schema::validate_requirements;
pub use sqlite::SqliteExecutor;

//! Operator hints attached to connection failures.

use std::io::ErrorKind;

/// Picks the most likely fix for a failed connection attempt.
pub(crate) fn connect_hint(error: &sqlx::Error) -> &'static str {
    match error {
        sqlx::Error::Io(io) => match io.kind() {
            ErrorKind::ConnectionRefused => {
                "Check DB_HOST and DB_PORT: nothing is listening at that address."
            }
            ErrorKind::TimedOut => {
                "Check the network path to DB_HOST (firewall, VPN, security group)."
            }
            ErrorKind::NotFound => "Check DB_HOST: the host name does not resolve.",
            ErrorKind::PermissionDenied => "Check file permissions on DB_SQLITE_PATH.",
            _ => "Check DB_HOST, DB_PORT and network connectivity.",
        },
        sqlx::Error::Tls(_) => "The server rejected the TLS handshake; check its TLS settings.",
        sqlx::Error::Database(db) => {
            let message = db.message();
            if message.contains("Access denied") {
                "Check DB_USER and DB_PASSWORD."
            } else if message.contains("Unknown database") {
                "Check DB_NAME."
            } else if message.contains("unable to open database file") {
                "Check that DB_SQLITE_PATH points to an existing database file."
            } else {
                "Check DB_HOST, DB_PORT, DB_USER, DB_PASSWORD and DB_NAME."
            }
        }
        _ => "Check DB_HOST, DB_PORT, DB_USER, DB_PASSWORD and DB_NAME.",
    }
}

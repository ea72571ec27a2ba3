//! Configuration types.
//!
//! This module defines the logging enums used on the command line and the
//! database connection settings read from the environment.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::DEFAULT_DB_PORT;
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Where the product catalogue lives.
#[derive(Clone, PartialEq, Eq)]
pub enum DbSettings {
    /// Remote MySQL server (the production catalogue).
    MySql {
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    },
    /// Local SQLite snapshot of the same tables.
    Sqlite { path: PathBuf },
}

impl DbSettings {
    /// Reads the connection settings from the process environment.
    ///
    /// `DB_SQLITE_PATH` selects a local snapshot; otherwise `DB_HOST`, `DB_USER`,
    /// `DB_PASSWORD` and `DB_NAME` are required and `DB_PORT` defaults to 3306.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`DbSettings::from_env`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DB_SQLITE_PATH").filter(|p| !p.trim().is_empty()) {
            return Ok(DbSettings::Sqlite {
                path: PathBuf::from(path.trim()),
            });
        }

        let required = |name: &'static str| -> Result<String, ConfigError> {
            match lookup(name) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                _ => Err(ConfigError::MissingVar(name)),
            }
        };

        let host = required("DB_HOST")?;
        let user = required("DB_USER")?;
        // An empty password is legitimate; an unset one is a configuration mistake.
        let password = lookup("DB_PASSWORD").ok_or(ConfigError::MissingVar("DB_PASSWORD"))?;
        let database = required("DB_NAME")?;
        let port = match lookup("DB_PORT").filter(|p| !p.trim().is_empty()) {
            None => DEFAULT_DB_PORT,
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidVar {
                    name: "DB_PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
        };

        Ok(DbSettings::MySql {
            host,
            port,
            user,
            password,
            database,
        })
    }

    /// Human-readable connection target, without credentials.
    pub fn target(&self) -> String {
        match self {
            DbSettings::MySql {
                host,
                port,
                database,
                ..
            } => format!("mysql://{host}:{port}/{database}"),
            DbSettings::Sqlite { path } => format!("sqlite:{}", path.display()),
        }
    }
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbSettings::MySql {
                host,
                port,
                user,
                database,
                ..
            } => f
                .debug_struct("MySql")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("password", &"***")
                .field("database", database)
                .finish(),
            DbSettings::Sqlite { path } => f.debug_struct("Sqlite").field("path", path).finish(),
        }
    }
}

/// Parses a comma-separated language priority list (`"fr,en"`).
pub fn parse_languages(raw: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for lang in raw.split(',').map(|l| l.trim().to_lowercase()) {
        if !lang.is_empty() && !languages.contains(&lang) {
            languages.push(lang);
        }
    }
    languages
}

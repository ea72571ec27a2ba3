//! Error type definitions.
//!
//! Each layer has its own error enum; [`ExportError`] ties them together with the
//! pipeline stage that failed and the number of rows already written.

use std::path::PathBuf;

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Bad or missing configuration, detected before any connection attempt.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("no EAN codes provided")]
    NoEanCodes,

    #[error("cannot read EAN file {}: {source}", path.display())]
    EanFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("page size must be at least 1")]
    InvalidPageSize,
}

/// Failures raised by the database side of the pipeline.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The connection could not be established.
    #[error("cannot connect to {target}: {source}. {hint}")]
    Connect {
        target: String,
        hint: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The connection failed after it was established.
    #[error("database connection lost: {0}")]
    ConnectionLost(#[source] sqlx::Error),

    /// The source rejected the query.
    #[error("query rejected by the database: {0}")]
    QueryRejected(#[source] sqlx::Error),

    #[error("table `{0}` does not exist in the source database")]
    UnknownTable(String),

    #[error("column `{table}.{column}` does not exist in the source database")]
    UnknownColumn { table: String, column: String },

    #[error("`{0}` is not a valid table identifier")]
    InvalidIdentifier(String),

    #[error("cannot decode column `{column}`: {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::error::BoxDynError,
    },
}

impl SourceError {
    /// Classifies a driver error raised while running a statement.
    ///
    /// Errors reported by the database server mean the statement was rejected;
    /// everything else (I/O, TLS, protocol, closed connection) means the link failed.
    pub fn from_statement(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. } => SourceError::QueryRejected(error),
            sqlx::Error::ColumnDecode { index, source } => SourceError::Decode {
                column: index,
                source,
            },
            sqlx::Error::Decode(source) => SourceError::Decode {
                column: "<row>".to_string(),
                source,
            },
            other => SourceError::ConnectionLost(other),
        }
    }

    /// Returns `true` when the error concerns reachability rather than the query.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            SourceError::Connect { .. } | SourceError::ConnectionLost(_)
        )
    }
}

/// Sink failures.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("cannot open output file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write to {} failed after {rows_written} rows: {source}", path.display())]
    Write {
        path: PathBuf,
        rows_written: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Pipeline stage at which an export failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Config,
    Connect,
    Query,
    Fetch,
    Write,
}

impl Stage {
    /// Process exit status for a failure at this stage.
    pub fn exit_code(&self) -> i32 {
        match self {
            Stage::Config => 2,
            Stage::Connect => 3,
            Stage::Query => 4,
            Stage::Fetch => 5,
            Stage::Write => 6,
        }
    }
}

/// Top-level error returned by the library entry points.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{stage} failed after {rows_written} rows written: {source}")]
    Source {
        stage: Stage,
        rows_written: u64,
        #[source]
        source: SourceError,
    },

    #[error("write failed: {0}")]
    Write(#[from] WriteError),
}

impl ExportError {
    pub fn source_at(stage: Stage, rows_written: u64, source: SourceError) -> Self {
        ExportError::Source {
            stage,
            rows_written,
            source,
        }
    }

    /// Classifies a source error raised while pulling pages.
    pub fn fetch(rows_written: u64, source: SourceError) -> Self {
        let stage = if source.is_connection() {
            Stage::Fetch
        } else {
            Stage::Query
        };
        Self::source_at(stage, rows_written, source)
    }

    pub fn stage(&self) -> Stage {
        match self {
            ExportError::Config(_) => Stage::Config,
            ExportError::Source { stage, .. } => *stage,
            ExportError::Write(_) => Stage::Write,
        }
    }

    /// Rows that were fully written before the failure.
    pub fn rows_written(&self) -> u64 {
        match self {
            ExportError::Config(_) => 0,
            ExportError::Source { rows_written, .. } => *rows_written,
            ExportError::Write(WriteError::Open { .. }) => 0,
            ExportError::Write(WriteError::Write { rows_written, .. }) => *rows_written,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.stage().exit_code()
    }
}

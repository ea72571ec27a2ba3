//! Output sinks and batch commit logic.
//!
//! Every page is serialized into memory first and then written with a single
//! `write_all` + `flush`. The byte length of the file after the last successful
//! page is the commit point; when a write fails, the target is truncated back
//! to it, so the file always ends on a complete row.

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error_handling::WriteError;
use crate::models::SqlValue;

use super::schema::OutputSchema;

/// A writable output that can be cut back to a previous length.
pub trait OutputTarget: Write + Send {
    /// Truncates the output to `len` bytes and positions the cursor at the end.
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl OutputTarget for File {
    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)?;
        self.seek(SeekFrom::Start(len))?;
        Ok(())
    }
}

/// Incremental writer for flattened rows.
pub trait RowSink: Send {
    /// Writes whatever precedes the rows (header row, opening bracket).
    fn begin(&mut self, schema: &OutputSchema) -> Result<(), WriteError>;

    /// Writes one page of rows. On error nothing of the page remains in the output.
    fn write_batch(&mut self, rows: &[Vec<SqlValue>]) -> Result<(), WriteError>;

    /// Completes the output and returns its size in bytes.
    fn finish(&mut self) -> Result<u64, WriteError>;

    /// Leaves the output well-formed after a failure, as far as possible.
    fn abort(&mut self);

    /// Data rows committed so far.
    fn rows_written(&self) -> u64;

    fn path(&self) -> &Path;
}

/// Tracks the commit point of one output target.
pub(crate) struct BatchWriter<W: OutputTarget> {
    target: W,
    path: PathBuf,
    committed_bytes: u64,
    rows_written: u64,
}

impl<W: OutputTarget> BatchWriter<W> {
    pub(crate) fn new(target: W, path: PathBuf) -> Self {
        Self {
            target,
            path,
            committed_bytes: 0,
            rows_written: 0,
        }
    }

    /// Writes `bytes` holding `rows` complete rows, or rolls back to the last commit.
    pub(crate) fn commit(&mut self, bytes: &[u8], rows: u64) -> Result<(), WriteError> {
        let result = self
            .target
            .write_all(bytes)
            .and_then(|()| self.target.flush());

        match result {
            Ok(()) => {
                self.committed_bytes += bytes.len() as u64;
                self.rows_written += rows;
                Ok(())
            }
            Err(source) => {
                self.rollback();
                Err(self.failed(source))
            }
        }
    }

    fn rollback(&mut self) {
        match self.target.truncate_to(self.committed_bytes) {
            Ok(()) => debug!(
                "Rolled {} back to {} bytes ({} rows)",
                self.path.display(),
                self.committed_bytes,
                self.rows_written
            ),
            Err(e) => warn!(
                "Could not roll {} back to the last complete page: {e}",
                self.path.display()
            ),
        }
    }

    pub(crate) fn failed(&self, source: io::Error) -> WriteError {
        WriteError::Write {
            path: self.path.clone(),
            rows_written: self.rows_written,
            source,
        }
    }

    pub(crate) fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub(crate) fn committed_bytes(&self) -> u64 {
        self.committed_bytes
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

/// Creates (or truncates) the output file.
pub(crate) fn create_file(path: &Path) -> Result<File, WriteError> {
    File::create(path).map_err(|source| WriteError::Open {
        path: path.to_path_buf(),
        source,
    })
}

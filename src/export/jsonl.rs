//! JSON export.
//!
//! Two framings of the same objects: a single JSON array (`json`) or one object
//! per line (`jsonl`, ideal for piping to `jq` or bulk loaders). Object keys are
//! the schema's technical keys, written in schema order.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use crate::error_handling::WriteError;
use crate::models::SqlValue;

use super::schema::OutputSchema;
use super::sink::{create_file, BatchWriter, OutputTarget, RowSink};

/// How objects are framed in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonFraming {
    /// `[ {...}, {...} ]`
    Array,
    /// `{...}\n{...}\n`
    Lines,
}

pub struct JsonSink<W: OutputTarget> {
    writer: BatchWriter<W>,
    framing: JsonFraming,
    keys: Vec<&'static str>,
    closed: bool,
}

impl JsonSink<File> {
    pub fn create(path: &Path, framing: JsonFraming) -> Result<Self, WriteError> {
        let file = create_file(path)?;
        Ok(Self::new(file, path.to_path_buf(), framing))
    }
}

impl<W: OutputTarget> JsonSink<W> {
    pub fn new(target: W, path: PathBuf, framing: JsonFraming) -> Self {
        Self {
            writer: BatchWriter::new(target, path),
            framing,
            keys: Vec::new(),
            closed: false,
        }
    }

    fn closing_bytes(&self) -> &'static [u8] {
        match self.framing {
            JsonFraming::Array if self.writer.rows_written() > 0 => &b"\n]\n"[..],
            JsonFraming::Array => &b"]\n"[..],
            JsonFraming::Lines => &b""[..],
        }
    }

    fn close(&mut self) -> Result<(), WriteError> {
        if self.closed {
            return Ok(());
        }
        let closing = self.closing_bytes();
        self.writer.commit(closing, 0)?;
        self.closed = true;
        Ok(())
    }
}

/// Appends one object with keys in the given order.
fn write_object(buf: &mut Vec<u8>, keys: &[&str], row: &[SqlValue]) -> io::Result<()> {
    buf.push(b'{');
    for (index, (key, value)) in keys.iter().zip(row).enumerate() {
        if index > 0 {
            buf.push(b',');
        }
        serde_json::to_writer(&mut *buf, key)?;
        buf.push(b':');
        serde_json::to_writer(&mut *buf, &value.to_json())?;
    }
    buf.push(b'}');
    Ok(())
}

impl<W: OutputTarget> RowSink for JsonSink<W> {
    fn begin(&mut self, schema: &OutputSchema) -> Result<(), WriteError> {
        self.keys = schema.keys().collect();
        match self.framing {
            JsonFraming::Array => self.writer.commit(b"[", 0),
            JsonFraming::Lines => Ok(()),
        }
    }

    fn write_batch(&mut self, rows: &[Vec<SqlValue>]) -> Result<(), WriteError> {
        if rows.is_empty() {
            return Ok(());
        }
        let mut buf = Vec::new();
        let mut first = self.writer.rows_written() == 0;
        for row in rows {
            if self.framing == JsonFraming::Array {
                let separator: &[u8] = if first { b"\n" } else { b",\n" };
                buf.extend_from_slice(separator);
            }
            first = false;
            write_object(&mut buf, &self.keys, row).map_err(|e| self.writer.failed(e))?;
            if self.framing == JsonFraming::Lines {
                buf.push(b'\n');
            }
        }
        self.writer.commit(&buf, rows.len() as u64)
    }

    fn finish(&mut self) -> Result<u64, WriteError> {
        self.close()?;
        Ok(self.writer.committed_bytes())
    }

    fn abort(&mut self) {
        // The committed part ends on a complete object; closing the array keeps it parseable.
        if let Err(e) = self.close() {
            warn!("Could not close {}: {e}", self.writer.path().display());
        }
    }

    fn rows_written(&self) -> u64 {
        self.writer.rows_written()
    }

    fn path(&self) -> &Path {
        self.writer.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(schema: &OutputSchema, count: i64) -> Vec<Vec<SqlValue>> {
        (0..count)
            .map(|i| {
                let mut row = vec![SqlValue::from(""); schema.len()];
                row[0] = SqlValue::Int(i);
                row[4] = SqlValue::from("0012345678905");
                row
            })
            .collect()
    }

    #[test]
    fn test_json_array_keeps_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let schema = OutputSchema::standard();

        let mut sink = JsonSink::create(&path, JsonFraming::Array).unwrap();
        sink.begin(&schema).unwrap();
        sink.write_batch(&rows(&schema, 2)).unwrap();
        sink.write_batch(&rows(&schema, 1)).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array[0]["ean"], "0012345678905");
        assert_eq!(array[1]["idproduit"], 1);
        assert!(content.starts_with("[\n{\"idproduit\":0,\"idproduit_group\":\"\""));
    }

    #[test]
    fn test_empty_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut sink = JsonSink::create(&path, JsonFraming::Array).unwrap();
        sink.begin(&OutputSchema::standard()).unwrap();
        sink.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_jsonl_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let schema = OutputSchema::comprehensive();

        let mut sink = JsonSink::create(&path, JsonFraming::Lines).unwrap();
        sink.begin(&schema).unwrap();
        sink.write_batch(&rows(&schema, 3)).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in lines {
            let object: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(object.as_object().unwrap().len(), 37);
        }
    }

    #[test]
    fn test_abort_closes_the_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let schema = OutputSchema::standard();
        let mut sink = JsonSink::create(&path, JsonFraming::Array).unwrap();
        sink.begin(&schema).unwrap();
        sink.write_batch(&rows(&schema, 2)).unwrap();
        sink.abort();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }
}

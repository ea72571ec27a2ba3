//! CSV export.
//!
//! Comma-delimited, double-quote quoting (only where needed), UTF-8. The first
//! row holds the schema's display headers; with field codes enabled a second
//! row holds the technical column keys, as the marketplace import template
//! expects.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;

use crate::error_handling::WriteError;
use crate::models::SqlValue;

use super::schema::OutputSchema;
use super::sink::{create_file, BatchWriter, OutputTarget, RowSink};

pub struct CsvSink<W: OutputTarget> {
    writer: BatchWriter<W>,
    field_codes: bool,
}

impl CsvSink<File> {
    /// Creates the output file.
    pub fn create(path: &Path, field_codes: bool) -> Result<Self, WriteError> {
        let file = create_file(path)?;
        Ok(Self::new(file, path.to_path_buf(), field_codes))
    }
}

impl<W: OutputTarget> CsvSink<W> {
    pub fn new(target: W, path: PathBuf, field_codes: bool) -> Self {
        Self {
            writer: BatchWriter::new(target, path),
            field_codes,
        }
    }
}

/// Serializes records into one in-memory CSV chunk.
fn encode<I, R>(records: I) -> io::Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut csv = WriterBuilder::new().from_writer(Vec::new());
    for record in records {
        csv.write_record(record)?;
    }
    csv.into_inner().map_err(|e| e.into_error())
}

impl<W: OutputTarget> RowSink for CsvSink<W> {
    fn begin(&mut self, schema: &OutputSchema) -> Result<(), WriteError> {
        let mut header_rows: Vec<Vec<&str>> = vec![schema.headers().collect()];
        if self.field_codes {
            header_rows.push(schema.keys().collect());
        }
        let bytes = encode(header_rows).map_err(|e| self.writer.failed(e))?;
        self.writer.commit(&bytes, 0)
    }

    fn write_batch(&mut self, rows: &[Vec<SqlValue>]) -> Result<(), WriteError> {
        if rows.is_empty() {
            return Ok(());
        }
        let rendered = rows
            .iter()
            .map(|row| row.iter().map(SqlValue::render).collect::<Vec<String>>());
        let bytes = encode(rendered).map_err(|e| self.writer.failed(e))?;
        self.writer.commit(&bytes, rows.len() as u64)
    }

    fn finish(&mut self) -> Result<u64, WriteError> {
        Ok(self.writer.committed_bytes())
    }

    fn abort(&mut self) {}

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
    use crate::export::schema::OutputSchema;

    #[test]
    fn test_header_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let schema = OutputSchema::standard();

        let mut sink = CsvSink::create(&path, false).unwrap();
        sink.begin(&schema).unwrap();
        let mut row: Vec<SqlValue> = vec![SqlValue::from(""); schema.len()];
        row[0] = SqlValue::Int(1);
        row[5] = SqlValue::from("crème, \"bio\"\nligne");
        sink.write_batch(&[row]).unwrap();
        let size = sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(size, content.len() as u64);
        assert!(content.starts_with("idproduit,idproduit_group,idrows,ref,ean,"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 26);
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][5], "crème, \"bio\"\nligne");
        assert_eq!(sink.rows_written(), 1);
    }

    #[test]
    fn test_field_code_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut sink = CsvSink::create(&path, true).unwrap();
        sink.begin(&OutputSchema::comprehensive()).unwrap();
        sink.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Category,Shop sku,Titre du produit"));
        assert!(lines[1].starts_with("family_id,shop_sku,name,brand_id"));
        assert!(lines[1].ends_with("weight,size_id"));
    }
}

//! CSV export
//!
//! UTF-8 with a leading byte-order mark so spreadsheet applications pick the
//! right encoding, one header row, then one row per record.

use crate::model::Record;
use crate::output::table::Table;
use crate::output::traits::{ExportFormat, ExportResult, Exporter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn write_to<W: Write>(&self, records: &[Record], mut writer: W) -> ExportResult<()> {
        let table = Table::from_records(records)?;
        writer.write_all(UTF8_BOM)?;

        let mut csv_writer = csv::Writer::from_writer(writer);
        if !table.columns.is_empty() {
            csv_writer.write_record(&table.columns)?;
        }
        for row in table.rows() {
            csv_writer.write_record(row.iter().map(|cell| cell.to_text()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write(&self, records: &[Record], path: &Path) -> ExportResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        self.write_to(records, writer)
    }
}

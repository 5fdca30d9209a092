//! JSON export
//!
//! Writes one pretty-printed UTF-8 array of objects, with four-space
//! indentation and non-ASCII text left unescaped.

use crate::model::Record;
use crate::output::traits::{ExportFormat, ExportResult, Exporter};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as a JSON array
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl JsonExporter {
    /// Serializes records into any writer
    pub fn write_to<W: Write>(&self, records: &[Record], writer: W) -> ExportResult<()> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        records.serialize(&mut serializer)?;
        Ok(())
    }
}

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn write(&self, records: &[Record], path: &Path) -> ExportResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(records, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

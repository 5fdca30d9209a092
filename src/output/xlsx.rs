//! Spreadsheet export
//!
//! A single worksheet with a header row; integer fields are written as numbers.

use crate::model::Record;
use crate::output::table::{Cell, Table};
use crate::output::traits::{ExportError, ExportFormat, ExportResult, Exporter};
use rust_xlsxwriter::Workbook;
use std::borrow::Cow;
use std::path::Path;

/// Worksheet row limit of the file format
const MAX_ROWS: usize = 1_048_576;

/// Worksheet cells to write: the header in row 0, records from row 1
///
/// Empty cells are omitted, so a field a record lacks stays blank.
pub fn cell_writes(table: &Table) -> ExportResult<Vec<(u32, u16, Cell<'_>)>> {
    if table.row_count() + 1 > MAX_ROWS {
        return Err(ExportError::Format(format!(
            "{} records exceed the worksheet row limit",
            table.row_count()
        )));
    }

    let mut writes = Vec::with_capacity(table.columns.len() * (table.row_count() + 1));
    for (col, name) in table.columns.iter().enumerate() {
        writes.push((0, col as u16, Cell::Text(Cow::Borrowed(name.as_str()))));
    }

    for (index, row) in table.rows().enumerate() {
        let row_num = (index + 1) as u32;
        for (col, cell) in row.into_iter().enumerate() {
            if cell != Cell::Empty {
                writes.push((row_num, col as u16, cell));
            }
        }
    }

    Ok(writes)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxExporter;

impl Exporter for XlsxExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn write(&self, records: &[Record], path: &Path) -> ExportResult<()> {
        let table = Table::from_records(records)?;
        let writes = cell_writes(&table)?;

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (row, col, cell) in writes {
            match cell {
                Cell::Empty => {}
                Cell::Integer(n) => {
                    sheet.write_number(row, col, n as f64)?;
                }
                Cell::Text(s) => {
                    sheet.write_string(row, col, s.as_ref())?;
                }
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

//! Output module for exporting harvested records
//!
//! This module handles:
//! - Writing records as JSON, CSV and XLSX files
//! - Deriving a shared column order for the tabular formats
//! - Summarizing record counts of a finished job

mod csv_export;
mod json;
pub mod stats;
mod table;
mod traits;
mod xlsx;

pub use csv_export::{CsvExporter, UTF8_BOM};
pub use json::JsonExporter;
pub use stats::{print_summary, summarize, CrawlSummary};
pub use table::{Cell, Table};
pub use traits::{ExportError, ExportFormat, ExportResult, Exporter};
pub use xlsx::XlsxExporter;

use crate::config::OutputConfig;
use crate::model::Record;
use std::path::PathBuf;

/// Writes records in every configured format
///
/// Files are named `{base_name}.{extension}` inside the configured output
/// directory, which is created if missing. Existing files are overwritten.
///
/// # Arguments
///
/// * `records` - Records in crawl order
/// * `output` - Output directory and format list
/// * `base_name` - File name stem shared by all formats
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - The written files, in format order
/// * `Err(ExportError)` - An unknown format or a failed write
pub fn export_all(
    records: &[Record],
    output: &OutputConfig,
    base_name: &str,
) -> ExportResult<Vec<PathBuf>> {
    let formats = output
        .formats
        .iter()
        .map(|f| f.parse::<ExportFormat>())
        .collect::<ExportResult<Vec<_>>>()?;

    std::fs::create_dir_all(&output.directory)?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let path = output
            .directory
            .join(format!("{}.{}", base_name, format.extension()));
        format.exporter().write(records, &path)?;
        tracing::info!("Wrote {} records to {}", records.len(), path.display());
        written.push(path);
    }

    Ok(written)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::create_test_records;
    use serde_json::Value;
    use tempfile::TempDir;

    fn json_as_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    #[test]
    fn test_json_and_csv_agree() {
        let dir = TempDir::new().unwrap();
        let output = OutputConfig {
            directory: dir.path().to_path_buf(),
            formats: vec!["json".to_string(), "csv".to_string()],
            base_name: None,
        };
        let records = create_test_records();

        let written = export_all(&records, &output, "club1").unwrap();
        assert_eq!(
            written,
            vec![dir.path().join("club1.json"), dir.path().join("club1.csv")]
        );

        let json: Vec<serde_json::Map<String, Value>> =
            serde_json::from_slice(&std::fs::read(&written[0]).unwrap()).unwrap();
        let csv_bytes = std::fs::read(&written[1]).unwrap();
        assert!(csv_bytes.starts_with(UTF8_BOM));

        let mut reader = csv::Reader::from_reader(&csv_bytes[UTF8_BOM.len()..]);
        let headers = reader.headers().unwrap().clone();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(json.len(), 3);
        assert_eq!(rows.len(), json.len());

        for (object, row) in json.iter().zip(&rows) {
            for (column, cell) in headers.iter().zip(row.iter()) {
                match object.get(column) {
                    Some(value) => assert_eq!(json_as_text(value), cell, "column {}", column),
                    None => assert_eq!(cell, "", "column {}", column),
                }
            }
        }

        assert_eq!(&rows[2][0], "reply");
        let parent = headers.iter().position(|h| h == "parent_comment_id").unwrap();
        assert_eq!(&rows[2][parent], "100");
        assert_eq!(&rows[1][parent], "");
    }

    #[test]
    fn test_unknown_format_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = OutputConfig {
            directory: dir.path().join("out"),
            formats: vec!["json".to_string(), "pdf".to_string()],
            base_name: None,
        };

        let result = export_all(&create_test_records(), &output, "club1");
        assert!(matches!(result, Err(ExportError::UnknownFormat(_))));
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_creates_output_directory() {
        let dir = TempDir::new().unwrap();
        let output = OutputConfig {
            directory: dir.path().join("nested").join("out"),
            formats: vec!["xlsx".to_string()],
            base_name: None,
        };

        let written = export_all(&create_test_records(), &output, "club1").unwrap();
        assert!(written[0].exists());
    }
}

//! Exporter trait and associated types
//!
//! This module defines the interface every export format implements and the
//! errors they share.

use crate::model::Record;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// Returns the exporter that writes this format
    pub fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            Self::Json => Box::new(crate::output::JsonExporter),
            Self::Csv => Box::new(crate::output::CsvExporter),
            Self::Xlsx => Box::new(crate::output::XlsxExporter),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Trait for export sinks
///
/// Every implementation writes the same field set in the same order; the
/// tabular ones derive their columns from the records actually present.
pub trait Exporter {
    /// The format this exporter writes
    fn format(&self) -> ExportFormat;

    /// Writes `records` to `path`, replacing any existing file
    ///
    /// # Arguments
    ///
    /// * `records` - Records in crawl order
    /// * `path` - Destination file
    fn write(&self, records: &[Record], path: &Path) -> ExportResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!(matches!(
            "parquet".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_exporter_matches_format() {
        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Xlsx] {
            assert_eq!(format.exporter().format(), format);
        }
    }
}

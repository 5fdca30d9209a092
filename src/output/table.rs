//! Flattening records into a table for the tabular exporters
//!
//! Columns are the ordered union of field names by first appearance, so the
//! `type` tag leads and each kind's own fields keep their declared order.

use crate::model::Record;
use crate::output::traits::{ExportError, ExportResult};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashSet;

/// One rendered table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Empty,
    Integer(i64),
    Text(Cow<'a, str>),
}

impl Cell<'_> {
    /// Text form used by CSV and by comparisons
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Integer(n) => n.to_string(),
            Cell::Text(s) => s.to_string(),
        }
    }
}

/// Records laid out as rows under a shared column list
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    rows: Vec<Map<String, Value>>,
}

impl Table {
    pub fn from_records(records: &[Record]) -> ExportResult<Self> {
        let mut columns = Vec::new();
        let mut seen = HashSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let row = match serde_json::to_value(record)? {
                Value::Object(map) => map,
                other => {
                    return Err(ExportError::Format(format!(
                        "record did not serialize to an object: {}",
                        other
                    )))
                }
            };

            for key in row.keys() {
                if seen.insert(key.clone()) {
                    columns.push(key.clone());
                }
            }
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of every row in column order; missing fields are empty
    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell<'_>>> + '_ {
        self.rows.iter().map(move |row| {
            self.columns
                .iter()
                .map(|column| render_cell(row.get(column)))
                .collect()
        })
    }
}

/// Renders a field value as a cell
///
/// Integers stay numeric, strings are written as-is, and nested values are
/// written as compact JSON.
pub fn render_cell(value: Option<&Value>) -> Cell<'_> {
    match value {
        None | Some(Value::Null) => Cell::Empty,
        Some(Value::String(s)) => Cell::Text(Cow::Borrowed(s)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Cell::Integer(i),
            None => Cell::Text(Cow::Owned(n.to_string())),
        },
        Some(Value::Bool(b)) => Cell::Text(Cow::Owned(b.to_string())),
        Some(nested) => Cell::Text(Cow::Owned(nested.to_string())),
    }
}

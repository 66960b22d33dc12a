//! Table and JSON render strategies.
//!
//! Both strategies write complete documents to the supplied writer and never
//! reorder what they are given.

use std::io::{self, Write};

use serde_json::{Map, Value};

use crate::record::Record;
use crate::table::TableSpec;

const COLUMN_GAP: &str = "  ";

/// A rendering strategy selected by [`crate::FormatMode`].
pub trait Render: Send + Sync {
    /// Render one record.
    ///
    /// # Errors
    ///
    /// Returns an error only when the writer fails.
    fn key_value(&self, out: &mut dyn Write, record: &Record) -> io::Result<()>;

    /// Render several records as a sequence.
    ///
    /// # Errors
    ///
    /// Returns an error only when the writer fails.
    fn key_values(&self, out: &mut dyn Write, records: &[Record]) -> io::Result<()>;

    /// Render a table.
    ///
    /// # Errors
    ///
    /// Returns an error only when the writer fails.
    fn table(&self, out: &mut dyn Write, spec: &TableSpec) -> io::Result<()>;
}

/// Human-readable, column-aligned text output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer;

/// Pretty-printed JSON output.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Render for TableRenderer {
    fn key_value(&self, out: &mut dyn Write, record: &Record) -> io::Result<()> {
        let width = record
            .keys()
            .map(|key| key.chars().count())
            .max()
            .unwrap_or(0);
        for (key, value) in record.iter() {
            let label = format!("{key}:");
            let text = display_value(value);
            if text.is_empty() {
                writeln!(out, "{label}")?;
            } else {
                writeln!(out, "{label:<pad$} {text}", pad = width + 1)?;
            }
        }
        Ok(())
    }

    fn key_values(&self, out: &mut dyn Write, records: &[Record]) -> io::Result<()> {
        for (index, record) in records.iter().enumerate() {
            if index > 0 {
                writeln!(out)?;
            }
            self.key_value(out, record)?;
        }
        Ok(())
    }

    fn table(&self, out: &mut dyn Write, spec: &TableSpec) -> io::Result<()> {
        let headers = spec.headers();
        if headers.is_empty() {
            return Ok(());
        }
        let rows = spec.display_rows();

        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_aligned(out, headers, &widths)?;
        for row in rows {
            write_aligned(out, row, &widths)?;
        }
        Ok(())
    }
}

fn write_aligned(out: &mut dyn Write, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let mut line = String::new();
    // Trailing padding and gaps are dropped; cell text is never trimmed.
    let mut content_end = 0;
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        if !cell.is_empty() {
            content_end = line.len();
        }
        let padding = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat_n(' ', padding));
    }
    line.truncate(content_end);
    writeln!(out, "{line}")
}

impl Render for JsonRenderer {
    fn key_value(&self, out: &mut dyn Write, record: &Record) -> io::Result<()> {
        write_json(out, record)
    }

    fn key_values(&self, out: &mut dyn Write, records: &[Record]) -> io::Result<()> {
        write_json(out, &records)
    }

    fn table(&self, out: &mut dyn Write, spec: &TableSpec) -> io::Result<()> {
        let headers = spec.headers();
        let objects: Vec<Map<String, Value>> = spec
            .export_rows()
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .zip(row)
                    .map(|(header, cell)| (header.clone(), Value::String(cell.clone())))
                    .collect()
            })
            .collect();
        write_json(out, &objects)
    }
}

fn write_json<T: serde::Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::from)?;
    writeln!(out)
}

/// Text shown for a value in table mode.
///
/// Strings print unquoted, `null` prints empty, and nested arrays or objects
/// print as compact JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

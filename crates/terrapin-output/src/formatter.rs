//! Facade commands print through.

use std::io::{self, Write};

use serde_json::Value;

use crate::mode::FormatMode;
use crate::record::Record;
use crate::render::{JsonRenderer, Render, TableRenderer};
use crate::table::TableSpec;

/// Prints records and tables in the format selected for the current command.
///
/// Malformed tables are padded rather than rejected; the only errors surfaced
/// are failures of the underlying writer.
pub struct Formatter<W: Write> {
    mode: FormatMode,
    renderer: Box<dyn Render>,
    out: W,
}

impl<W: Write> Formatter<W> {
    /// Formatter writing to `out` using the strategy for `mode`.
    pub fn new(mode: FormatMode, out: W) -> Self {
        let renderer: Box<dyn Render> = match mode {
            FormatMode::Table => Box::new(TableRenderer),
            FormatMode::Json => Box::new(JsonRenderer),
        };
        Self {
            mode,
            renderer,
            out,
        }
    }

    /// Mode this formatter was created with.
    #[must_use]
    pub const fn mode(&self) -> FormatMode {
        self.mode
    }

    /// Print one record as `Key: Value` lines or as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn key_value(&mut self, record: &Record) -> io::Result<()> {
        self.renderer.key_value(&mut self.out, record)?;
        self.out.flush()
    }

    /// Print several records, blank-line separated or as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn key_values(&mut self, records: &[Record]) -> io::Result<()> {
        self.renderer.key_values(&mut self.out, records)?;
        self.out.flush()
    }

    /// Print a column-aligned table or a JSON array of header-keyed objects.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn table<H, R, C>(&mut self, headers: H, rows: R) -> io::Result<()>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.render_table(&TableSpec::new(headers, rows))
    }

    /// Like [`Formatter::table`], but JSON output is drawn from `full_rows` while
    /// table output is drawn from `rows`.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn table_with_full_rows<H, R, F, C, D>(
        &mut self,
        headers: H,
        rows: R,
        full_rows: F,
    ) -> io::Result<()>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
        F: IntoIterator,
        F::Item: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.render_table(&TableSpec::new(headers, rows).with_full_rows(full_rows))
    }

    /// Print a prepared table.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn render_table(&mut self, spec: &TableSpec) -> io::Result<()> {
        self.renderer.table(&mut self.out, spec)?;
        self.out.flush()
    }

    /// Pretty-print an arbitrary JSON document, preserving its key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn document(&mut self, document: &Value) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, document).map_err(io::Error::from)?;
        writeln!(self.out)?;
        self.out.flush()
    }

    /// Write bytes verbatim, adding a trailing newline when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn raw(&mut self, body: &[u8]) -> io::Result<()> {
        self.out.write_all(body)?;
        if !body.is_empty() && !body.ends_with(b"\n") {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// Write one plain line of text regardless of mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Consume the formatter and return its writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

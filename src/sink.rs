//! Incremental report output

use crate::accumulator::{ReportCell, ReportRow};
use crate::error::{ReconError, Result};
use crate::value::CellValue;
use csv::{Writer, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Prefix of the columns added by the report in front of the data columns
pub const DIFF_COLUMN_PREFIX: &str = "diff_";

/// Receives report rows while the comparison runs
pub trait ReportSink {
    /// Called once, before any row, with the data column names
    fn write_header(&mut self, columns: &[String]) -> Result<()>;

    fn write_row(&mut self, row: &ReportRow) -> Result<()>;

    /// Called once after the last row
    fn finish(&mut self) -> Result<()>;
}

/// How report cells are turned into text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellFormat {
    /// Text written for a null cell
    pub null_marker: String,
    /// Wraps a strictly different cell
    pub diff_marker: String,
    /// Wraps a cell equal only below single precision
    pub loss_marker: String,
}

impl Default for CellFormat {
    fn default() -> Self {
        Self {
            null_marker: "(null)".to_string(),
            diff_marker: "***".to_string(),
            loss_marker: "~".to_string(),
        }
    }
}

impl CellFormat {
    pub fn render(&self, cell: &ReportCell) -> String {
        match cell {
            ReportCell::Value(value) => self.render_value(value),
            ReportCell::Changed(value) => {
                format!("{0}{1}{0}", self.diff_marker, self.render_value(value))
            }
            ReportCell::LossEqual(value) => {
                format!("{0}{1}{0}", self.loss_marker, self.render_value(value))
            }
            ReportCell::Elided => String::new(),
        }
    }

    fn render_value(&self, value: &CellValue) -> String {
        match value {
            CellValue::Null => self.null_marker.clone(),
            other => other.to_string(),
        }
    }

    /// Render a report row as `[marker, key, cells...]`
    pub fn render_row(&self, row: &ReportRow) -> Vec<String> {
        let mut record = Vec::with_capacity(row.cells.len() + 2);
        record.push(row.marker.symbol().to_string());
        record.push(row.key.clone());
        record.extend(row.cells.iter().map(|cell| self.render(cell)));
        record
    }
}

/// Writes report rows as delimited text
pub struct CsvReportSink<W: Write> {
    writer: Writer<W>,
    format: CellFormat,
}

impl<W: Write> CsvReportSink<W> {
    pub fn new(output: W, format: CellFormat) -> Self {
        Self::with_delimiter(output, format, b',')
    }

    pub fn with_delimiter(output: W, format: CellFormat, delimiter: u8) -> Self {
        let writer = WriterBuilder::new().delimiter(delimiter).from_writer(output);
        Self { writer, format }
    }

    /// Flush and hand back the underlying output
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ReconError::report_sink(e.to_string()))
    }
}

impl<W: Write> ReportSink for CsvReportSink<W> {
    fn write_header(&mut self, columns: &[String]) -> Result<()> {
        let mut header = vec![
            format!("{}status", DIFF_COLUMN_PREFIX),
            format!("{}key", DIFF_COLUMN_PREFIX),
        ];
        header.extend(columns.iter().cloned());
        self.writer
            .write_record(&header)
            .map_err(|e| ReconError::report_sink(e.to_string()))
    }

    fn write_row(&mut self, row: &ReportRow) -> Result<()> {
        self.writer
            .write_record(self.format.render_row(row))
            .map_err(|e| ReconError::report_sink(e.to_string()))
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| ReconError::report_sink(e.to_string()))
    }
}

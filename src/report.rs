//! Immutable outcome of one comparison run

use crate::accumulator::{Marker, ReportRow};
use crate::error::Result;
use crate::sink::{CellFormat, CsvReportSink, ReportSink};
use serde::Serialize;
use std::io::Write;

/// Counters of a comparison run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffCounts {
    /// Comparison steps, one per classified row
    pub comparisons: u64,
    pub matches: u64,
    /// Added, removed and modified rows
    pub mismatches: u64,
    pub added: u64,
    pub removed: u64,
    pub modified: u64,
    /// Rows written to the listing
    pub report_rows: u64,
    pub source_rows: u64,
    pub target_rows: u64,
}

/// Result of comparing a source with a target.
///
/// Built once by the engine and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    schema_reason: String,
    columns: Vec<String>,
    counts: DiffCounts,
    rows: Vec<ReportRow>,
}

impl DiffReport {
    pub(crate) fn new(
        schema_reason: String,
        columns: Vec<String>,
        counts: DiffCounts,
        rows: Vec<ReportRow>,
    ) -> Self {
        Self {
            schema_reason,
            columns,
            counts,
            rows,
        }
    }

    /// Report of a comparison stopped at the schema gate
    pub(crate) fn schema_incompatible(reason: String, columns: Vec<String>) -> Self {
        Self::new(reason, columns, DiffCounts::default(), Vec::new())
    }

    /// True when the schemas are compatible and no row differs
    pub fn are_equal(&self) -> bool {
        self.schema_reason.is_empty() && self.counts.mismatches == 0
    }

    pub fn match_count(&self) -> u64 {
        self.counts.matches
    }

    pub fn mismatch_count(&self) -> u64 {
        self.counts.mismatches
    }

    pub fn comparison_count(&self) -> u64 {
        self.counts.comparisons
    }

    pub fn added_count(&self) -> u64 {
        self.counts.added
    }

    pub fn removed_count(&self) -> u64 {
        self.counts.removed
    }

    pub fn modified_count(&self) -> u64 {
        self.counts.modified
    }

    pub fn report_row_count(&self) -> u64 {
        self.counts.report_rows
    }

    /// Number of records compared: the row count of the longer side
    pub fn record_count(&self) -> u64 {
        self.counts.source_rows.max(self.counts.target_rows)
    }

    /// True when every source row is found unchanged in the target
    pub fn is_source_contained_in_target(&self) -> bool {
        self.schema_reason.is_empty() && self.counts.removed == 0 && self.counts.modified == 0
    }

    /// Schema incompatibility reason, empty when the schemas matched
    pub fn schema_reason(&self) -> &str {
        &self.schema_reason
    }

    pub fn is_schema_compatible(&self) -> bool {
        self.schema_reason.is_empty()
    }

    pub fn counts(&self) -> &DiffCounts {
        &self.counts
    }

    /// Column names of the compared data, from the source
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The ordered diff listing
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows of the listing carrying the given marker
    pub fn rows_with_marker(&self, marker: Marker) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |row| row.marker == marker)
    }

    /// Render the listing as delimited text
    pub fn write_csv<W: Write>(&self, writer: W, format: &CellFormat) -> Result<()> {
        let mut sink = CsvReportSink::new(writer, format.clone());
        sink.write_header(&self.columns)?;
        for row in &self.rows {
            sink.write_row(row)?;
        }
        sink.finish()
    }

    /// Summary of this report for the two named resources
    pub fn summary(&self, source: &str, target: &str) -> DiffSummary {
        DiffSummary {
            source: source.to_string(),
            target: target.to_string(),
            equal: self.are_equal(),
            schema_reason: (!self.schema_reason.is_empty()).then(|| self.schema_reason.clone()),
            record_count: self.record_count(),
            change_count: self.mismatch_count(),
            counts: self.counts,
        }
    }
}

/// One line summary of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffSummary {
    pub source: String,
    pub target: String,
    pub equal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_reason: Option<String>,
    pub record_count: u64,
    pub change_count: u64,
    pub counts: DiffCounts,
}

//! Running counters and report row emission for one comparison run

use crate::cell::CellDiff;
use crate::error::Result;
use crate::report::{DiffCounts, DiffReport};
use crate::sink::ReportSink;
use crate::value::CellValue;
use serde::{Deserialize, Serialize};

/// Joins the cells of a composite key in the listing
pub const KEY_SEPARATOR: &str = "|";

/// Outcome of one comparison step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowClassification {
    /// No cell differs
    Match,
    /// Same key, at least one cell differs
    Modified,
    /// Present only in the target
    Added,
    /// Present only in the source
    Removed,
}

/// How much of the comparison ends up in the report listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportDensity {
    /// Every row, matches included
    #[default]
    Dense,
    /// Only changes; equal cells of modified rows are elided
    Sparse,
}

impl ReportDensity {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "dense" => Ok(Self::Dense),
            "sparse" => Ok(Self::Sparse),
            _ => Err(format!("Invalid report density: {}. Use 'dense' or 'sparse'", s)),
        }
    }
}

/// Unified diff symbol of a report row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Marker {
    #[serde(rename = "")]
    Unchanged,
    #[serde(rename = "+")]
    Added,
    #[serde(rename = "-")]
    Removed,
}

impl Marker {
    pub fn symbol(&self) -> &'static str {
        match self {
            Marker::Unchanged => "",
            Marker::Added => "+",
            Marker::Removed => "-",
        }
    }
}

/// Side a report row was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Origin {
    #[serde(rename = "s")]
    Source,
    #[serde(rename = "t")]
    Target,
}

/// A cell of a report row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ReportCell {
    Value(CellValue),
    /// Strictly different from the other side
    Changed(CellValue),
    /// Different only below single precision
    LossEqual(CellValue),
    /// Equal cell left out of a sparse report
    Elided,
}

/// One line of the diff listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Sequential id in the listing, from 1
    pub id: u64,
    pub marker: Marker,
    /// Mismatch counter at emission; absent for unchanged rows
    pub change_id: Option<u64>,
    pub origin: Origin,
    /// Row number on the origin side
    pub origin_row: u64,
    /// Key values joined by `|`, or the origin row number when the comparison has no key
    pub key: String,
    pub cells: Vec<ReportCell>,
}

/// Values of one cursor row captured by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct RowSnapshot {
    pub row_number: u64,
    pub values: Vec<CellValue>,
}

/// A non matching classification together with its rows
#[derive(Debug, Clone)]
pub enum RowChange<'r> {
    Added(&'r RowSnapshot),
    Removed(&'r RowSnapshot),
    Modified {
        source: &'r RowSnapshot,
        target: &'r RowSnapshot,
        cell_diffs: Vec<CellDiff>,
    },
}

impl RowChange<'_> {
    pub fn classification(&self) -> RowClassification {
        match self {
            RowChange::Added(_) => RowClassification::Added,
            RowChange::Removed(_) => RowClassification::Removed,
            RowChange::Modified { .. } => RowClassification::Modified,
        }
    }
}

/// Accumulates counters and report rows while the merge-join runs
pub struct DiffAccumulator<'s> {
    columns: Vec<String>,
    /// 1-based positions of the key tuple
    key_positions: Vec<usize>,
    density: ReportDensity,
    counts: DiffCounts,
    rows: Vec<ReportRow>,
    sink: Option<&'s mut dyn ReportSink>,
}

impl<'s> DiffAccumulator<'s> {
    /// Create the accumulator; the sink, if any, receives the header right away
    pub fn new(
        columns: Vec<String>,
        key_positions: Vec<usize>,
        density: ReportDensity,
        mut sink: Option<&'s mut dyn ReportSink>,
    ) -> Result<Self> {
        if let Some(sink) = sink.as_deref_mut() {
            sink.write_header(&columns)?;
        }
        Ok(Self {
            columns,
            key_positions,
            density,
            counts: DiffCounts::default(),
            rows: Vec::new(),
            sink,
        })
    }

    pub fn comparison_count(&self) -> u64 {
        self.counts.comparisons
    }

    pub fn mismatch_count(&self) -> u64 {
        self.counts.mismatches
    }

    pub fn report_row_count(&self) -> u64 {
        self.counts.report_rows
    }

    /// Record a row present on both sides with no strict cell difference
    pub fn record_match(&mut self, row: &RowSnapshot) -> Result<()> {
        self.counts.comparisons += 1;
        self.counts.matches += 1;

        if self.density == ReportDensity::Sparse {
            return Ok(());
        }
        let cells = row.values.iter().cloned().map(ReportCell::Value).collect();
        self.emit(Marker::Unchanged, Origin::Source, row, cells)
    }

    /// Record an added, removed or modified row
    pub fn record_row(&mut self, change: RowChange<'_>) -> Result<()> {
        self.counts.comparisons += 1;
        self.counts.mismatches += 1;

        match change {
            RowChange::Added(target) => {
                self.counts.added += 1;
                let cells = target.values.iter().cloned().map(ReportCell::Value).collect();
                self.emit(Marker::Added, Origin::Target, target, cells)
            }
            RowChange::Removed(source) => {
                self.counts.removed += 1;
                let cells = source.values.iter().cloned().map(ReportCell::Value).collect();
                self.emit(Marker::Removed, Origin::Source, source, cells)
            }
            RowChange::Modified {
                source,
                target,
                cell_diffs,
            } => {
                self.counts.modified += 1;
                let source_cells = self.marked_cells(source, &cell_diffs);
                let target_cells = self.marked_cells(target, &cell_diffs);
                self.emit(Marker::Removed, Origin::Source, source, source_cells)?;
                self.emit(Marker::Added, Origin::Target, target, target_cells)
            }
        }
    }

    fn marked_cells(&self, row: &RowSnapshot, cell_diffs: &[CellDiff]) -> Vec<ReportCell> {
        row.values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let position = i + 1;
                match cell_diffs.iter().find(|d| d.position == position) {
                    Some(diff) if diff.is_strict() => ReportCell::Changed(value.clone()),
                    Some(_) => ReportCell::LossEqual(value.clone()),
                    None if self.density == ReportDensity::Sparse
                        && !self.key_positions.contains(&position) =>
                    {
                        ReportCell::Elided
                    }
                    None => ReportCell::Value(value.clone()),
                }
            })
            .collect()
    }

    fn emit(
        &mut self,
        marker: Marker,
        origin: Origin,
        row: &RowSnapshot,
        cells: Vec<ReportCell>,
    ) -> Result<()> {
        self.counts.report_rows += 1;

        let key = if self.key_positions.is_empty() {
            row.row_number.to_string()
        } else {
            self.key_positions
                .iter()
                .map(|&p| row.values.get(p - 1).map(ToString::to_string).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(KEY_SEPARATOR)
        };

        let report_row = ReportRow {
            id: self.counts.report_rows,
            marker,
            change_id: (marker != Marker::Unchanged).then_some(self.counts.mismatches),
            origin,
            origin_row: row.row_number,
            key,
            cells,
        };

        if let Some(sink) = self.sink.as_deref_mut() {
            sink.write_row(&report_row)?;
        }
        self.rows.push(report_row);
        Ok(())
    }

    /// Close the sink and freeze the result
    pub fn finish(mut self, source_rows: u64, target_rows: u64) -> Result<DiffReport> {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.finish()?;
        }
        self.counts.source_rows = source_rows;
        self.counts.target_rows = target_rows;
        Ok(DiffReport::new(String::new(), self.columns, self.counts, self.rows))
    }
}

//! Streaming merge-join over a source and a target row cursor
//!
//! Both cursors are advanced independently. With key columns, the side
//! holding the smaller key tuple is behind and only that side moves on the
//! next step; without them, rows are compared by physical position. Key
//! tuples must be non-decreasing on both sides. This is not checked: a
//! violation yields a wrong classification, not an error.
//!
//! Key cells are ordered by their natural order. In loss-tolerant mode two
//! float key cells that agree at single precision are the same key, so a
//! float keyed pair that is loss-equal lines up instead of splitting into a
//! removed and an added row.

use crate::accumulator::{DiffAccumulator, ReportDensity, RowChange, RowClassification, RowSnapshot};
use crate::cell::{CellComparator, CellDiff, CellOutcome, EqualityMode};
use crate::cursor::RowCursor;
use crate::error::{ReconError, Result, Side};
use crate::observer::{DiffEvent, DiffObserver};
use crate::report::DiffReport;
use crate::schema::{ColumnDef, ColumnIndex, SchemaComparator};
use crate::sink::ReportSink;
use crate::value::CellValue;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One of the columns driving the merge-join.
///
/// Configuration files and the command line read it the same way: a number,
/// or a string holding only digits, is a 1-based position and anything else
/// is a column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "KeyColumnRepr")]
pub enum KeyColumn {
    /// 1-based position
    Position(usize),
    Name(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyColumnRepr {
    Position(usize),
    Text(String),
}

impl From<KeyColumnRepr> for KeyColumn {
    fn from(repr: KeyColumnRepr) -> Self {
        match repr {
            KeyColumnRepr::Position(position) => KeyColumn::Position(position),
            KeyColumnRepr::Text(text) => KeyColumn::parse(&text),
        }
    }
}

impl KeyColumn {
    /// A number is read as a position, anything else as a name
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<usize>() {
            Ok(position) => Self::Position(position),
            Err(_) => Self::Name(s.trim().to_string()),
        }
    }

    /// Resolve against the source columns to a 1-based position
    pub fn resolve(&self, columns: &[ColumnDef]) -> Result<usize> {
        let index = ColumnIndex::new(columns);
        match self {
            KeyColumn::Position(position) if (1..=columns.len()).contains(position) => {
                Ok(*position)
            }
            KeyColumn::Position(position) => Err(ReconError::KeyColumnNotFound {
                column: position.to_string(),
                known: index.known_columns(),
            }),
            KeyColumn::Name(name) => {
                index
                    .position(name)
                    .ok_or_else(|| ReconError::KeyColumnNotFound {
                        column: name.clone(),
                        known: index.known_columns(),
                    })
            }
        }
    }

    /// Resolve every key column in order
    pub fn resolve_all(keys: &[KeyColumn], columns: &[ColumnDef]) -> Result<Vec<usize>> {
        keys.iter().map(|k| k.resolve(columns)).collect()
    }
}

/// Options of a comparison run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffOptions {
    /// Columns of the key tuple; empty compares rows by position
    pub key_columns: Vec<KeyColumn>,
    pub equality: EqualityMode,
    pub density: ReportDensity,
    /// Abort once more changes than this were found
    pub max_changes: Option<u64>,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column to the key tuple
    pub fn with_key_column(mut self, key_column: KeyColumn) -> Self {
        self.key_columns.push(key_column);
        self
    }

    pub fn with_key_columns(mut self, key_columns: impl IntoIterator<Item = KeyColumn>) -> Self {
        self.key_columns = key_columns.into_iter().collect();
        self
    }

    pub fn with_equality(mut self, equality: EqualityMode) -> Self {
        self.equality = equality;
        self
    }

    pub fn with_density(mut self, density: ReportDensity) -> Self {
        self.density = density;
        self
    }

    pub fn with_max_changes(mut self, max_changes: u64) -> Self {
        self.max_changes = Some(max_changes);
        self
    }
}

/// Compare two cursors with the given options and no sink or observer
pub fn compare<S, T>(source: &mut S, target: &mut T, options: &DiffOptions) -> Result<DiffReport>
where
    S: RowCursor + ?Sized,
    T: RowCursor + ?Sized,
{
    MergeJoinEngine::new(options.clone()).run(source, target)
}

/// One comparison run. The cursors stay owned by the caller.
pub struct MergeJoinEngine<'a> {
    options: DiffOptions,
    sink: Option<&'a mut dyn ReportSink>,
    observer: Option<&'a mut dyn DiffObserver>,
}

impl<'a> MergeJoinEngine<'a> {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            sink: None,
            observer: None,
        }
    }

    /// Write report rows to `sink` as they are produced
    pub fn with_sink(mut self, sink: &'a mut dyn ReportSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_observer(mut self, observer: &'a mut dyn DiffObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn run<S, T>(self, source: &mut S, target: &mut T) -> Result<DiffReport>
    where
        S: RowCursor + ?Sized,
        T: RowCursor + ?Sized,
    {
        let MergeJoinEngine {
            options,
            sink,
            mut observer,
        } = self;

        let columns: Vec<String> = source.columns().iter().map(|c| c.name.clone()).collect();

        let reason = SchemaComparator::compare(source.columns(), target.columns());
        notify(
            &mut observer,
            &DiffEvent::SchemaChecked {
                compatible: reason.is_empty(),
                reason: &reason,
            },
        );
        if !reason.is_empty() {
            log::info!("The source and target can not be compared:\n{}", reason);
            return Ok(DiffReport::schema_incompatible(reason, columns));
        }

        let key = KeyColumn::resolve_all(&options.key_columns, source.columns())?;

        let mut acc = DiffAccumulator::new(columns, key.clone(), options.density, sink)?;

        let mut source_advance = true;
        let mut target_advance = true;
        let mut source_row: Option<RowSnapshot> = None;
        let mut target_row: Option<RowSnapshot> = None;
        let mut source_rows = 0u64;
        let mut target_rows = 0u64;

        loop {
            if let Some(max) = options.max_changes {
                if acc.mismatch_count() > max {
                    return Err(ReconError::MaxChangesExceeded { max });
                }
            }

            if source_advance {
                source_row = read_row(source, Side::Source, &key)?;
                source_rows += u64::from(source_row.is_some());
            }
            if target_advance {
                target_row = read_row(target, Side::Target, &key)?;
                target_rows += u64::from(target_row.is_some());
            }

            let step = match (&source_row, &target_row) {
                (None, None) => break,
                (Some(s), Some(t)) => match key_cmp(s, t, &key, options.equality) {
                    Ordering::Equal => {
                        source_advance = true;
                        target_advance = true;
                        compare_pair(s, t, options.equality)
                    }
                    // the target is behind
                    Ordering::Greater => {
                        source_advance = false;
                        target_advance = true;
                        Step::Change(RowChange::Added(t))
                    }
                    // the source is behind
                    Ordering::Less => {
                        source_advance = true;
                        target_advance = false;
                        Step::Change(RowChange::Removed(s))
                    }
                },
                (Some(s), None) => {
                    source_advance = true;
                    target_advance = false;
                    Step::Change(RowChange::Removed(s))
                }
                (None, Some(t)) => {
                    source_advance = false;
                    target_advance = true;
                    Step::Change(RowChange::Added(t))
                }
            };

            let classification = match step {
                Step::Match(row) => {
                    acc.record_match(row)?;
                    RowClassification::Match
                }
                Step::Change(change) => {
                    let classification = change.classification();
                    acc.record_row(change)?;
                    classification
                }
            };

            notify(
                &mut observer,
                &DiffEvent::RowClassified {
                    classification,
                    comparisons: acc.comparison_count(),
                },
            );
        }

        let comparisons = acc.comparison_count();
        let report_rows = acc.report_row_count();
        let report = acc.finish(source_rows, target_rows)?;

        log::info!(
            "Comparison completed: {} comparisons performed, {} report rows written",
            comparisons,
            report_rows
        );
        notify(
            &mut observer,
            &DiffEvent::Completed {
                comparisons,
                report_rows,
            },
        );

        Ok(report)
    }
}

fn notify(observer: &mut Option<&mut dyn DiffObserver>, event: &DiffEvent<'_>) {
    if let Some(observer) = observer.as_deref_mut() {
        observer.on_event(event);
    }
}

/// What one comparison step found
enum Step<'r> {
    Match(&'r RowSnapshot),
    Change(RowChange<'r>),
}

/// Order two rows by their key tuple, column by column
fn key_cmp(
    source: &RowSnapshot,
    target: &RowSnapshot,
    key: &[usize],
    mode: EqualityMode,
) -> Ordering {
    key.iter()
        .map(|&position| {
            key_cell_cmp(&source.values[position - 1], &target.values[position - 1], mode)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn key_cell_cmp(source: &CellValue, target: &CellValue, mode: EqualityMode) -> Ordering {
    match (source, target) {
        (CellValue::Float(_), CellValue::Float(_))
            if mode == EqualityMode::LossTolerant
                && CellComparator::equal(source, target, mode) =>
        {
            Ordering::Equal
        }
        _ => source.key_cmp(target),
    }
}

/// Advance a cursor and capture its row; no key cell may be null
fn read_row<C>(cursor: &mut C, side: Side, key: &[usize]) -> Result<Option<RowSnapshot>>
where
    C: RowCursor + ?Sized,
{
    if !cursor.next()? {
        return Ok(None);
    }
    let values = cursor.row_values()?;
    if let Some(&position) = key
        .iter()
        .find(|&&p| values.get(p - 1).map_or(true, CellValue::is_null))
    {
        return Err(ReconError::null_key(side, cursor.row_number(), position));
    }
    Ok(Some(RowSnapshot {
        row_number: cursor.row_number(),
        values,
    }))
}

/// Compare two rows with the same key cell by cell
fn compare_pair<'r>(
    source: &'r RowSnapshot,
    target: &'r RowSnapshot,
    mode: EqualityMode,
) -> Step<'r> {
    let mut cell_diffs = Vec::new();

    for (i, (source_value, target_value)) in source.values.iter().zip(&target.values).enumerate() {
        let position = i + 1;
        match CellComparator::compare(source_value, target_value, mode) {
            CellOutcome::Equal => {}
            CellOutcome::LossEqual => {
                log::debug!(
                    "Cell(Row,Col)({},{}), loss equal: {}, {}",
                    source.row_number,
                    position,
                    source_value,
                    target_value
                );
                cell_diffs.push(CellDiff::loss_tolerant(position));
            }
            CellOutcome::Different => {
                log::debug!(
                    "Cell(Row,Col)({},{}), diff found: {}, {}",
                    source.row_number,
                    position,
                    source_value,
                    target_value
                );
                cell_diffs.push(CellDiff::strict(position));
            }
        }
    }

    if cell_diffs.iter().any(CellDiff::is_strict) {
        Step::Change(RowChange::Modified {
            source,
            target,
            cell_diffs,
        })
    } else {
        Step::Match(source)
    }
}

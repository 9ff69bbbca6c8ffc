//! # tabrecon
//!
//! Streaming reconciliation of two tabular data sets. A source and a target
//! are read through forward-only row cursors and merge-joined on a key column
//! (or on row position), producing counters and a unified diff listing.

pub mod accumulator;
pub mod cell;
pub mod cli;
pub mod commands;
pub mod config;
pub mod csv_cursor;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod observer;
pub mod output;
pub mod progress;
pub mod report;
pub mod schema;
pub mod sink;
pub mod value;

pub use accumulator::{Marker, Origin, ReportCell, ReportDensity, ReportRow, RowClassification};
pub use cell::{CellComparator, EqualityMode};
pub use config::ReconConfig;
pub use csv_cursor::{CsvCursor, CsvOptions};
pub use cursor::{MemoryCursor, RowCursor};
pub use engine::{compare, DiffOptions, KeyColumn, MergeJoinEngine};
pub use error::{ReconError, Result, Side};
pub use observer::{DiffEvent, DiffObserver, LogObserver};
pub use report::{DiffCounts, DiffReport, DiffSummary};
pub use schema::{ColumnDef, SchemaComparator};
pub use sink::{CellFormat, CsvReportSink, ReportSink};
pub use value::{CellValue, DataType};

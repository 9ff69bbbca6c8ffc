//! Output formatting utilities

use crate::accumulator::Marker;
use crate::error::Result;
use crate::report::{DiffReport, DiffSummary};
use crate::schema::ColumnDef;
use crate::sink::CellFormat;

/// Number of changed rows listed under the pretty summary
const SAMPLE_ROWS: usize = 5;

/// Pretty printer for tabrecon output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the comparison summary with a sample of the changed rows,
    /// rendering cells with `format`
    pub fn print_report(summary: &DiffSummary, report: &DiffReport, format: &CellFormat) {
        println!("🔍 Comparison: {} → {}", summary.source, summary.target);

        if let Some(reason) = &summary.schema_reason {
            println!("├─ ❌ Schema: NOT COMPATIBLE");
            for line in reason.lines() {
                println!("│  └─ {}", line);
            }
            println!("└─ Rows were not compared");
            return;
        }
        println!("├─ ✅ Schema: compatible");

        let counts = &summary.counts;
        if summary.equal {
            println!("├─ ✅ Rows: {} matched", counts.matches);
        } else {
            println!("├─ ❌ Changes: {}", summary.change_count);
            println!("│  ├─ Modified: {}", counts.modified);
            println!("│  ├─ Added: {}", counts.added);
            println!("│  └─ Removed: {}", counts.removed);
            for line in Self::sample_lines(report, format) {
                println!("{}", line);
            }
        }

        println!(
            "├─ Rows read: {} source, {} target",
            counts.source_rows, counts.target_rows
        );
        println!("└─ Records: {}", summary.record_count);
    }

    fn sample_lines(report: &DiffReport, format: &CellFormat) -> Vec<String> {
        let changed: Vec<_> = report
            .rows()
            .iter()
            .filter(|row| row.marker != Marker::Unchanged)
            .collect();
        if changed.is_empty() {
            return Vec::new();
        }

        let mut lines = vec!["├─ Changed rows:".to_string()];
        for (i, row) in changed.iter().take(SAMPLE_ROWS).enumerate() {
            let is_last = i == SAMPLE_ROWS.min(changed.len()) - 1;
            let prefix = if is_last { "└─" } else { "├─" };
            let cells: Vec<String> = row.cells.iter().map(|c| format.render(c)).collect();
            lines.push(format!(
                "│  {} {} {}: {}",
                prefix,
                row.marker.symbol(),
                row.key,
                cells.join(", ")
            ));
        }
        if changed.len() > SAMPLE_ROWS {
            lines.push(format!("│     ... and {} more", changed.len() - SAMPLE_ROWS));
        }
        lines
    }

    /// Print the column layout of two resources and the schema verdict
    pub fn print_schema(source: &[ColumnDef], target: &[ColumnDef], reason: &str) {
        println!("📋 Schema comparison");
        let width = source.len().max(target.len());
        for position in 1..=width {
            let describe = |columns: &[ColumnDef]| {
                columns
                    .get(position - 1)
                    .map(|c| format!("{} ({})", c.name, c.data_type))
                    .unwrap_or_else(|| "-".to_string())
            };
            println!(
                "├─ {}: {} | {}",
                position,
                describe(source),
                describe(target)
            );
        }
        if reason.is_empty() {
            println!("└─ ✅ Compatible");
        } else {
            println!("└─ ❌ Not compatible");
            for line in reason.lines() {
                println!("   └─ {}", line);
            }
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format the summary together with the diff listing
    pub fn format_report(summary: &DiffSummary, report: &DiffReport) -> Result<String> {
        let json = serde_json::json!({
            "summary": summary,
            "columns": report.columns(),
            "rows": report.rows(),
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }
}

//! Progress reporting for comparison runs

use crate::accumulator::RowClassification;
use crate::observer::{DiffEvent, DiffObserver};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// How often the row spinner message is refreshed
const REFRESH_EVERY: u64 = 1000;

/// Terminal progress for one comparison, driven by engine events
#[derive(Debug)]
pub struct ProgressObserver {
    pub schema_pb: Option<ProgressBar>,
    pub rows_pb: Option<ProgressBar>,
    mismatches: u64,
    show_progress: bool,
}

impl ProgressObserver {
    /// Create a progress observer with terminal spinners
    pub fn new() -> Self {
        Self {
            schema_pb: Some(create_spinner("Comparing schemas...")),
            rows_pb: None,
            mismatches: 0,
            show_progress: true,
        }
    }

    /// Create minimal observer (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            schema_pb: None,
            rows_pb: None,
            mismatches: 0,
            show_progress: false,
        }
    }

    pub fn mismatches(&self) -> u64 {
        self.mismatches
    }

    /// Lazily create the rows spinner once the schema check passed
    fn ensure_rows_pb(&mut self) {
        if self.show_progress && self.rows_pb.is_none() {
            self.rows_pb = Some(create_spinner("Comparing rows..."));
        }
    }

    fn finish_schema(&mut self, message: &str) {
        if let Some(pb) = self.schema_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    fn update_rows(&mut self, comparisons: u64) {
        self.ensure_rows_pb();
        if let Some(pb) = &self.rows_pb {
            pb.set_position(comparisons);
            if comparisons % REFRESH_EVERY == 0 {
                pb.set_message(format!(
                    "Compared {} rows, {} changes",
                    comparisons, self.mismatches
                ));
            }
        }
    }

    fn finish_rows(&mut self, message: &str) {
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffObserver for ProgressObserver {
    fn on_event(&mut self, event: &DiffEvent<'_>) {
        match event {
            DiffEvent::SchemaChecked { compatible: true, .. } => {
                self.finish_schema("✅ Schemas are compatible");
                self.ensure_rows_pb();
            }
            DiffEvent::SchemaChecked { .. } => {
                self.finish_schema("❌ Schemas are not compatible");
            }
            DiffEvent::RowClassified {
                classification,
                comparisons,
            } => {
                if *classification != RowClassification::Match {
                    self.mismatches += 1;
                }
                self.update_rows(*comparisons);
            }
            DiffEvent::Completed { comparisons, .. } => {
                let message = format!(
                    "✅ Compared {} rows, {} changes",
                    comparisons, self.mismatches
                );
                self.finish_rows(&message);
            }
        }
    }
}

impl Drop for ProgressObserver {
    fn drop(&mut self) {
        // An aborted run leaves spinners behind; clear them silently
        if let Some(pb) = self.schema_pb.take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = self.rows_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

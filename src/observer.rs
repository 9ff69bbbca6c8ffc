//! Progress events emitted by the engine

use crate::accumulator::RowClassification;

/// A progress event of one comparison run
#[derive(Debug, Clone, PartialEq)]
pub enum DiffEvent<'a> {
    /// The schema gate ran; `reason` is empty when compatible
    SchemaChecked { compatible: bool, reason: &'a str },
    /// One comparison step was classified
    RowClassified {
        classification: RowClassification,
        comparisons: u64,
    },
    /// The run finished successfully
    Completed { comparisons: u64, report_rows: u64 },
}

/// Receives progress events from the engine
pub trait DiffObserver {
    fn on_event(&mut self, event: &DiffEvent<'_>);
}

impl<F> DiffObserver for F
where
    F: FnMut(&DiffEvent<'_>),
{
    fn on_event(&mut self, event: &DiffEvent<'_>) {
        self(event)
    }
}

/// Forwards events to the `log` facade.
///
/// The engine already logs the schema verdict and the completion line at
/// info, so those events are only traced at debug here.
#[derive(Debug, Default)]
pub struct LogObserver;

impl DiffObserver for LogObserver {
    fn on_event(&mut self, event: &DiffEvent<'_>) {
        match event {
            DiffEvent::SchemaChecked { compatible: true, .. } => {
                log::debug!("Schemas are compatible");
            }
            DiffEvent::SchemaChecked { reason, .. } => {
                log::debug!("Schemas are not compatible:\n{}", reason);
            }
            DiffEvent::RowClassified {
                classification,
                comparisons,
            } => {
                log::trace!("Comparison {}: {:?}", comparisons, classification);
            }
            DiffEvent::Completed {
                comparisons,
                report_rows,
            } => {
                log::debug!(
                    "Observed completion after {} comparisons, {} report rows",
                    comparisons,
                    report_rows
                );
            }
        }
    }
}

//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, PatientSnapshotRow, TickSummaryRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// When driven by [`EngineOutputObserver`][crate::EngineOutputObserver],
/// errors are stored and retrieved with
/// [`take_error`][crate::EngineOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of patient snapshots.
    fn write_snapshots(&mut self, rows: &[PatientSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

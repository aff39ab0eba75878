//! `EngineOutputObserver<W>`: bridges `EngineObserver` to an `OutputWriter`.

use pf_core::SimTime;
use pf_engine::{EngineObserver, TickReport};
use pf_patient::Roster;

use crate::row::{PatientSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// An [`EngineObserver`] that writes one tick summary per tick and a patient
/// snapshot batch every `snapshot_interval` ticks, starting with the first.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  Call [`finish`][Self::finish] when the run is over,
/// then check [`take_error`][Self::take_error].
pub struct EngineOutputObserver<W: OutputWriter> {
    writer:            W,
    snapshot_interval: u64,
    ticks_seen:        u64,
    last_error:        Option<OutputError>,
}

impl<W: OutputWriter> EngineOutputObserver<W> {
    /// `snapshot_interval` is in ticks; zero is treated as one.
    pub fn new(writer: W, snapshot_interval: u64) -> Self {
        Self {
            writer,
            snapshot_interval: snapshot_interval.max(1),
            ticks_seen:        0,
            last_error:        None,
        }
    }

    /// Flush the writer.  Idempotent.
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> EngineObserver for EngineOutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(report));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, time: SimTime, roster: &Roster) {
        let due = self.ticks_seen % self.snapshot_interval == 0;
        self.ticks_seen += 1;
        if !due {
            return;
        }

        let rows: Vec<PatientSnapshotRow> = roster
            .iter()
            .map(|p| PatientSnapshotRow::from_patient(p, time.as_millis()))
            .collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }
}

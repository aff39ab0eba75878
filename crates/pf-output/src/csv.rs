//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `patient_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{OutputResult, PatientSnapshotRow, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 8] =
    ["patient_id", "time_ms", "patient_type", "status", "area", "target", "x", "y"];

pub const SUMMARY_HEADER: [&str; 6] =
    ["time_ms", "admitted", "completed", "arrived", "skipped", "active"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("patient_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[PatientSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.patient_id.to_string(),
                row.time_ms.to_string(),
                row.patient_type.clone(),
                row.status.to_owned(),
                row.area.clone(),
                row.target.clone(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.time_ms.to_string(),
            row.admitted.to_string(),
            row.completed.to_string(),
            row.arrived.to_string(),
            row.skipped.to_string(),
            row.active.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}

//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `patient_snapshots` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{OutputResult, PatientSnapshotRow, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS patient_snapshots (
                 patient_id   INTEGER NOT NULL,
                 time_ms      INTEGER NOT NULL,
                 patient_type TEXT    NOT NULL,
                 status       TEXT    NOT NULL,
                 area         TEXT    NOT NULL,
                 target       TEXT    NOT NULL,
                 x            REAL    NOT NULL,
                 y            REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 time_ms   INTEGER NOT NULL,
                 admitted  INTEGER NOT NULL,
                 completed INTEGER NOT NULL,
                 arrived   INTEGER NOT NULL,
                 skipped   INTEGER NOT NULL,
                 active    INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[PatientSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO patient_snapshots \
                 (patient_id, time_ms, patient_type, status, area, target, x, y) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.patient_id,
                    row.time_ms as i64,
                    row.patient_type,
                    row.status,
                    row.area,
                    row.target,
                    row.x,
                    row.y,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (time_ms, admitted, completed, arrived, skipped, active) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.time_ms as i64,
                row.admitted as i64,
                row.completed as i64,
                row.arrived as i64,
                row.skipped as i64,
                row.active as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

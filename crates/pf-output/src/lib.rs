//! `pf-output`: simulation output for the patient-flow simulator.
//!
//! Per-tick output goes through an [`OutputWriter`] backend, selected by
//! Cargo feature:
//!
//! | Feature   | Backend     | Files created                                         |
//! |-----------|-------------|-------------------------------------------------------|
//! | *(none)*  | CSV         | `patient_snapshots.csv`, `tick_summaries.csv`         |
//! | `sqlite`  | SQLite      | `output.db`                                           |
//! | `parquet` | Parquet     | `patient_snapshots.parquet`, `tick_summaries.parquet` |
//!
//! All backends are driven by [`EngineOutputObserver`], which implements
//! `pf_engine::EngineObserver`.
//!
//! One-shot documents (metrics, bottlenecks, roster, layout, report) are
//! written as pretty-printed JSON by the functions in [`json`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use pf_output::{CsvWriter, EngineOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = EngineOutputObserver::new(writer, 10);
//! for _ in 0..ticks {
//!     engine.update_with(1_000, &mut obs);
//! }
//! obs.finish();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::{
    export_bottlenecks_json, export_layout_json, export_metrics_json, export_patients_json,
    export_report_json,
};
pub use observer::EngineOutputObserver;
pub use row::{PatientSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;

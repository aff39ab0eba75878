//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `patient_snapshots.parquet`
//! - `tick_summaries.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::OutputWriter;
use crate::{OutputResult, PatientSnapshotRow, TickSummaryRow};

fn snapshot_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("patient_id",   DataType::UInt32,  false),
        Field::new("time_ms",      DataType::UInt64,  false),
        Field::new("patient_type", DataType::Utf8,    false),
        Field::new("status",       DataType::Utf8,    false),
        Field::new("area",         DataType::Utf8,    false),
        Field::new("target",       DataType::Utf8,    false),
        Field::new("x",            DataType::Float64, false),
        Field::new("y",            DataType::Float64, false),
    ]))
}

fn summary_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time_ms",   DataType::UInt64, false),
        Field::new("admitted",  DataType::UInt64, false),
        Field::new("completed", DataType::UInt64, false),
        Field::new("arrived",   DataType::UInt64, false),
        Field::new("skipped",   DataType::UInt64, false),
        Field::new("active",    DataType::UInt64, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes simulation output to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    snapshots:   Option<ArrowWriter<File>>,
    summaries:   Option<ArrowWriter<File>>,
    snap_schema: Arc<Schema>,
    summ_schema: Arc<Schema>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let snap_schema = snapshot_schema();
        let summ_schema = summary_schema();

        let snapshots = ArrowWriter::try_new(
            File::create(dir.join("patient_snapshots.parquet"))?,
            Arc::clone(&snap_schema),
            Some(snappy_props()),
        )?;
        let summaries = ArrowWriter::try_new(
            File::create(dir.join("tick_summaries.parquet"))?,
            Arc::clone(&summ_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            snapshots: Some(snapshots),
            summaries: Some(summaries),
            snap_schema,
            summ_schema,
        })
    }
}

impl OutputWriter for ParquetWriter {
    fn write_snapshots(&mut self, rows: &[PatientSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.snapshots.as_mut() else {
            return Ok(());
        };

        let mut ids     = UInt32Builder::new();
        let mut times   = UInt64Builder::new();
        let mut types   = StringBuilder::new();
        let mut states  = StringBuilder::new();
        let mut areas   = StringBuilder::new();
        let mut targets = StringBuilder::new();
        let mut xs      = Float64Builder::new();
        let mut ys      = Float64Builder::new();

        for row in rows {
            ids.append_value(row.patient_id);
            times.append_value(row.time_ms);
            types.append_value(&row.patient_type);
            states.append_value(row.status);
            areas.append_value(&row.area);
            targets.append_value(&row.target);
            xs.append_value(row.x);
            ys.append_value(row.y);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.snap_schema),
            vec![
                Arc::new(ids.finish()),
                Arc::new(times.finish()),
                Arc::new(types.finish()),
                Arc::new(states.finish()),
                Arc::new(areas.finish()),
                Arc::new(targets.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        let Some(writer) = self.summaries.as_mut() else {
            return Ok(());
        };

        let column = |v: u64| {
            let mut b = UInt64Builder::new();
            b.append_value(v);
            Arc::new(b.finish()) as arrow::array::ArrayRef
        };

        let batch = RecordBatch::try_new(
            Arc::clone(&self.summ_schema),
            vec![
                column(row.time_ms),
                column(row.admitted),
                column(row.completed),
                column(row.arrived),
                column(row.skipped),
                column(row.active),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.snapshots.take() {
            w.close()?;
        }
        if let Some(w) = self.summaries.take() {
            w.close()?;
        }
        Ok(())
    }
}

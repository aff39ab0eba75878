//! JSON export of engine outputs.
//!
//! Each document mirrors the in-memory structure with its camelCase field
//! names and adds a single `generatedAt` field (Unix epoch milliseconds).
//! Objects get it alongside their own fields; arrays are wrapped as
//! `{ "generatedAt": …, "<name>": [ … ] }`.
//!
//! All functions write pretty-printed JSON to any `io::Write`.

use std::io::Write;

use serde::Serialize;

use pf_facility::FacilityLayout;
use pf_metrics::{unix_millis, Bottleneck, SystemMetrics};
use pf_patient::Patient;

use crate::OutputResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Stamped<'a, T: Serialize> {
    #[serde(flatten)]
    body:         &'a T,
    generated_at: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BottleneckDoc<'a> {
    generated_at: u64,
    bottlenecks:  &'a [Bottleneck],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatientDoc<'a> {
    generated_at: u64,
    patients:     Vec<&'a Patient>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDoc<'a> {
    generated_at: u64,
    metrics:      &'a SystemMetrics,
    bottlenecks:  &'a [Bottleneck],
}

fn write_pretty<W: Write, T: Serialize>(mut writer: W, doc: &T) -> OutputResult<()> {
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// `SystemMetrics` plus `generatedAt`.
pub fn export_metrics_json<W: Write>(writer: W, metrics: &SystemMetrics) -> OutputResult<()> {
    write_pretty(writer, &Stamped { body: metrics, generated_at: unix_millis() })
}

/// `{ generatedAt, bottlenecks: [...] }`, in the order given.
pub fn export_bottlenecks_json<W: Write>(writer: W, bottlenecks: &[Bottleneck]) -> OutputResult<()> {
    write_pretty(writer, &BottleneckDoc { generated_at: unix_millis(), bottlenecks })
}

/// `{ generatedAt, patients: [...] }`.
pub fn export_patients_json<'a, W, I>(writer: W, patients: I) -> OutputResult<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Patient>,
{
    let doc = PatientDoc { generated_at: unix_millis(), patients: patients.into_iter().collect() };
    write_pretty(writer, &doc)
}

/// The layout document plus `generatedAt`.
pub fn export_layout_json<W: Write>(writer: W, layout: &FacilityLayout) -> OutputResult<()> {
    write_pretty(writer, &Stamped { body: layout, generated_at: unix_millis() })
}

/// The analytics report: `{ generatedAt, metrics, bottlenecks }`.
pub fn export_report_json<W: Write>(
    writer:      W,
    metrics:     &SystemMetrics,
    bottlenecks: &[Bottleneck],
) -> OutputResult<()> {
    write_pretty(writer, &ReportDoc { generated_at: unix_millis(), metrics, bottlenecks })
}

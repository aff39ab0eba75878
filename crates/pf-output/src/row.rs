//! Plain data row types written by output backends.

use pf_engine::TickReport;
use pf_patient::Patient;

/// One patient's state at a given simulated time.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientSnapshotRow {
    pub patient_id:   u32,
    /// Simulated milliseconds.
    pub time_ms:      u64,
    pub patient_type: String,
    /// Kebab-case status, as in the JSON roster.
    pub status:       &'static str,
    /// The area the patient is at, or walked away from while moving.
    pub area:         String,
    /// Walk target; empty unless moving.
    pub target:       String,
    pub x:            f64,
    pub y:            f64,
}

impl PatientSnapshotRow {
    pub fn from_patient(patient: &Patient, time_ms: u64) -> Self {
        Self {
            patient_id:   patient.id.0,
            time_ms,
            patient_type: patient.patient_type.id.to_string(),
            status:       patient.status.as_str(),
            area:         patient.current_area.to_string(),
            target:       patient.target_area.as_ref().map(ToString::to_string).unwrap_or_default(),
            x:            patient.position.x,
            y:            patient.position.y,
        }
    }
}

/// Counters for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub time_ms:   u64,
    pub admitted:  u64,
    pub completed: u64,
    pub arrived:   u64,
    pub skipped:   u64,
    pub active:    u64,
}

impl From<&TickReport> for TickSummaryRow {
    fn from(r: &TickReport) -> Self {
        Self {
            time_ms:   r.time.as_millis(),
            admitted:  r.admitted as u64,
            completed: r.completed as u64,
            arrived:   r.arrived as u64,
            skipped:   r.skipped as u64,
            active:    r.active as u64,
        }
    }
}

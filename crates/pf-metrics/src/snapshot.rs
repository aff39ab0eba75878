//! Report types.  Field names serialize in camelCase and match the
//! collaborator's export format exactly.

use std::collections::BTreeMap;

use pf_core::{AreaId, PatientTypeId, SimTime};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AreaStatus {
    #[default]
    Normal,
    Warning,
    Critical,
}

impl AreaStatus {
    /// Status band for `occupancy` patients in an area of `capacity`.
    pub fn from_occupancy(occupancy: u32, capacity: u32) -> Self {
        if capacity == 0 {
            return AreaStatus::Normal;
        }
        let ratio = occupancy as f64 / capacity as f64;
        if ratio >= 1.0 {
            AreaStatus::Critical
        } else if ratio >= 0.75 {
            AreaStatus::Warning
        } else {
            AreaStatus::Normal
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GlobalMetrics {
    pub active_patients:  u64,
    pub total_processed:  u64,
    pub avg_wait_time:    f64,
    pub avg_system_time:  f64,
    /// Completions per simulated minute.
    pub throughput:       f64,
    pub utilization_rate: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AreaMetrics {
    pub area_id:           AreaId,
    /// Active patients attributed to the area, including those in service.
    pub current_occupancy: u32,
    pub capacity:          u32,
    pub utilization_rate:  f64,
    pub avg_wait_time:     f64,
    pub avg_service_time:  f64,
    pub queue_length:      u32,
    /// Completed patients whose last area was this one.
    pub throughput:        u64,
    pub status:            AreaStatus,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PatientTypeMetrics {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub patient_type:    PatientTypeId,
    pub count:           u64,
    pub avg_system_time: f64,
    pub avg_wait_time:   f64,
    pub completion_rate: f64,
}

/// One metrics snapshot of the whole system.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SystemMetrics {
    /// Simulated clock the snapshot was computed at.
    pub timestamp:       SimTime,
    pub global:          GlobalMetrics,
    pub by_area:         BTreeMap<AreaId, AreaMetrics>,
    pub by_patient_type: BTreeMap<PatientTypeId, PatientTypeMetrics>,
}

// ── Bottlenecks ───────────────────────────────────────────────────────────────

/// Ordered `Low < Medium < High < Critical`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Indicators {
    pub utilization:        f64,
    pub wait_time_ratio:    f64,
    pub queue_length:       u32,
    pub throughput_deficit: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Bottleneck {
    pub area_id:                AreaId,
    pub severity:               Severity,
    pub indicators:             Indicators,
    pub recommendations:        Vec<String>,
    /// Sorted, de-duplicated types of active patients at the area.  Filled
    /// by the engine; the detector leaves it empty.
    pub impacted_patient_types: Vec<PatientTypeId>,
    /// Simulated milliseconds.
    pub timestamp:              SimTime,
}

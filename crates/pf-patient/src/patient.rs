//! Per-patient state.

use std::sync::Arc;

use pf_core::{AreaId, PatientId, Point, SimTime};
use pf_facility::PatientType;

/// Lifecycle state.  `Completed` is terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PatientStatus {
    Waiting,
    InService,
    Moving,
    Completed,
}

impl PatientStatus {
    /// The wire name (`"in-service"` etc.).
    pub fn as_str(self) -> &'static str {
        match self {
            PatientStatus::Waiting => "waiting",
            PatientStatus::InService => "in-service",
            PatientStatus::Moving => "moving",
            PatientStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Timestamps {
    pub entry:              SimTime,
    /// Arrival at the current area (end of the last walk).
    pub current_area_entry: SimTime,
    /// Start of the current service; `None` until first admitted.
    pub service_start:      Option<SimTime>,
    pub exit:               Option<SimTime>,
}

/// One completed area visit.  Durations are simulated milliseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PathRecord {
    pub area:         AreaId,
    pub entry_time:   SimTime,
    pub exit_time:    SimTime,
    pub wait_time:    u64,
    pub service_time: u64,
}

/// Running totals, in simulated milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PatientMetrics {
    pub total_wait_time:    f64,
    pub total_service_time: f64,
    pub total_system_time:  f64,
}

/// A patient in the roster.
///
/// `current_area` is set on creation and never cleared, including after
/// completion; throughput attribution relies on it.  `target_area` is `Some`
/// exactly while the patient is `Moving`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Patient {
    pub id:           PatientId,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub patient_type: Arc<PatientType>,
    pub status:       PatientStatus,
    pub current_area: AreaId,
    pub target_area:  Option<AreaId>,
    pub position:     Point,
    pub timestamps:   Timestamps,
    pub path:         Vec<PathRecord>,
    pub metrics:      PatientMetrics,
}

impl Patient {
    /// A freshly admitted patient waiting at `area`, with every timestamp at
    /// `now` and zeroed metrics.
    pub fn arrive(
        id:           PatientId,
        patient_type: Arc<PatientType>,
        area:         AreaId,
        position:     Point,
        now:          SimTime,
    ) -> Self {
        Self {
            id,
            patient_type,
            status: PatientStatus::Waiting,
            current_area: area,
            target_area: None,
            position,
            timestamps: Timestamps {
                entry:              now,
                current_area_entry: now,
                service_start:      None,
                exit:               None,
            },
            path: Vec::new(),
            metrics: PatientMetrics::default(),
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.status == PatientStatus::Completed
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.is_completed()
    }

    /// Counted towards occupancy of `current_area`: anything not in transit.
    #[inline]
    pub fn occupies(&self, area: &str) -> bool {
        self.status != PatientStatus::Moving && self.current_area.as_str() == area
    }

    /// Service elapsed at `now`; zero if never admitted.
    #[inline]
    pub fn service_elapsed(&self, now: SimTime) -> u64 {
        self.timestamps.service_start.map_or(0, |start| now.since(start))
    }

    #[inline]
    pub fn priority(&self) -> f64 {
        self.patient_type.priority
    }
}

//! The per-patient state machine.
//!
//! ```text
//!            admit (room, or enforcement off)            service done, next area
//!  waiting ───────────────────────────────▶ in-service ───────────────────────────▶ moving
//!     ▲                                          │                                  │
//!     └──────────────── arrive ──────────────────┼──────────────────────────────────┘
//!                                                │ service done, no next area
//!                                                ▼
//!                                            completed
//! ```
//!
//! [`step`] is pure: it reads one patient and the tick context and returns
//! the transition to apply.  The engine applies it, including the routing
//! draw for [`Step::Finish`], so the state machine itself needs no RNG and no
//! mutable state.  Exactly one step is taken per patient per tick.

use std::fmt;

use pf_core::{AreaId, Point, SimTime};
use pf_facility::{Area, FacilityGraph};
use pf_patient::{advance_toward, walking_speed, Patient, PatientStatus, Roster, Travel};

#[cfg(feature = "fx-hash")]
type LoadMap<'g> = rustc_hash::FxHashMap<&'g str, u32>;
#[cfg(not(feature = "fx-hash"))]
type LoadMap<'g> = std::collections::HashMap<&'g str, u32>;

// ── AreaLoad ──────────────────────────────────────────────────────────────────

/// In-service patients per area, kept current as transitions are applied
/// within a tick.  Keys borrow the graph's area ids.
#[derive(Debug, Default)]
pub struct AreaLoad<'g> {
    in_service: LoadMap<'g>,
}

impl<'g> AreaLoad<'g> {
    /// Count in-service patients of `roster` at areas of `graph`.
    pub fn from_roster(graph: &'g FacilityGraph, roster: &Roster) -> Self {
        let mut load = AreaLoad::default();
        for p in roster.iter().filter(|p| p.status == PatientStatus::InService) {
            if let Some(area) = graph.get(p.current_area.as_str()) {
                load.admit(area);
            }
        }
        load
    }

    #[inline]
    pub fn in_service(&self, area: &str) -> u32 {
        self.in_service.get(area).copied().unwrap_or(0)
    }

    pub fn admit(&mut self, area: &'g Area) {
        *self.in_service.entry(area.id.as_str()).or_insert(0) += 1;
    }

    pub fn release(&mut self, area: &'g Area) {
        if let Some(n) = self.in_service.get_mut(area.id.as_str()) {
            *n = n.saturating_sub(1);
        }
    }
}

// ── Context & transitions ─────────────────────────────────────────────────────

/// Everything a transition may read.
pub struct TickContext<'g, 'l> {
    pub graph:            &'g FacilityGraph,
    pub load:             &'l AreaLoad<'g>,
    /// Clock after this tick's advance.
    pub now:              SimTime,
    pub delta_ms:         u64,
    pub enforce_capacity: bool,
}

/// Why a patient's tick was skipped.  The patient is left untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Moving with no target recorded.
    NoTarget,
    /// The walk target is not in the graph.
    UnknownTarget(AreaId),
    /// The current area is not in the graph.
    UnknownArea(AreaId),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoTarget => f.write_str("moving without a target"),
            SkipReason::UnknownTarget(a) => write!(f, "target area {a} not in facility"),
            SkipReason::UnknownArea(a) => write!(f, "current area {a} not in facility"),
        }
    }
}

/// The transition chosen for one patient this tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Step<'g> {
    /// Already completed.
    Idle,
    Skip(SkipReason),
    /// Still walking; the new position.
    Travel(Point),
    /// Reached `area`: becomes `waiting` there.
    Arrive(&'g Area),
    /// Waiting with no room; accumulates `waited_ms`.
    Queue { waited_ms: u64 },
    /// Waiting, accumulates `waited_ms`, then enters service at `area`.
    Admit { area: &'g Area, waited_ms: u64 },
    /// In service, not yet done.
    Serve,
    /// Service at `area` finished after `service_ms`; route onwards.
    Finish { area: &'g Area, service_ms: u64 },
}

/// Choose the transition for `patient`.
pub fn step<'g>(patient: &Patient, ctx: &TickContext<'g, '_>) -> Step<'g> {
    match patient.status {
        PatientStatus::Completed => Step::Idle,
        PatientStatus::Moving => moving(patient, ctx),
        PatientStatus::Waiting => waiting(patient, ctx),
        PatientStatus::InService => in_service(patient, ctx),
    }
}

fn moving<'g>(patient: &Patient, ctx: &TickContext<'g, '_>) -> Step<'g> {
    let Some(target_id) = &patient.target_area else {
        return Step::Skip(SkipReason::NoTarget);
    };
    let Some(target) = ctx.graph.get(target_id.as_str()) else {
        return Step::Skip(SkipReason::UnknownTarget(target_id.clone()));
    };
    if !ctx.graph.contains(patient.current_area.as_str()) {
        return Step::Skip(SkipReason::UnknownArea(patient.current_area.clone()));
    }

    let speed = walking_speed(patient.priority());
    let delta_secs = ctx.delta_ms as f64 / 1_000.0;
    match advance_toward(patient.position, target.position, speed, delta_secs) {
        Travel::Arrived => Step::Arrive(target),
        Travel::Moved(position) => Step::Travel(position),
    }
}

fn waiting<'g>(patient: &Patient, ctx: &TickContext<'g, '_>) -> Step<'g> {
    let Some(area) = ctx.graph.get(patient.current_area.as_str()) else {
        return Step::Skip(SkipReason::UnknownArea(patient.current_area.clone()));
    };
    let capacity = area.capacity();
    let has_room = capacity > 0
        && (!ctx.enforce_capacity || ctx.load.in_service(area.id.as_str()) < capacity);
    if has_room {
        Step::Admit { area, waited_ms: ctx.delta_ms }
    } else {
        Step::Queue { waited_ms: ctx.delta_ms }
    }
}

fn in_service<'g>(patient: &Patient, ctx: &TickContext<'g, '_>) -> Step<'g> {
    let Some(area) = ctx.graph.get(patient.current_area.as_str()) else {
        return Step::Skip(SkipReason::UnknownArea(patient.current_area.clone()));
    };
    let elapsed = patient.service_elapsed(ctx.now);
    if elapsed as f64 >= area.process_time_ms() {
        Step::Finish { area, service_ms: elapsed }
    } else {
        Step::Serve
    }
}

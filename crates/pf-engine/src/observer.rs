//! Engine observer trait for progress reporting and data collection.

use pf_core::{PatientId, SimTime};
use pf_patient::{Patient, Roster};

use crate::SkipReason;

/// Counters for one `update` call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Simulated clock after the tick.
    pub time:      SimTime,
    /// Waiting patients promoted to service.
    pub admitted:  usize,
    pub completed: usize,
    /// Walking patients that reached their target area.
    pub arrived:   usize,
    /// Patients whose tick was skipped over a missing area.
    pub skipped:   usize,
    /// Patients not yet completed after the tick.
    pub active:    usize,
}

/// Callbacks invoked by [`SimulationEngine::update_with`][crate::SimulationEngine::update_with].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait EngineObserver {
    /// Called after the clock advances, before any patient is processed.
    fn on_tick_start(&mut self, _time: SimTime) {}

    /// Called once a patient reaches `completed`, within the tick.
    fn on_patient_completed(&mut self, _patient: &Patient) {}

    /// Called when a patient's tick is skipped.
    fn on_patient_skipped(&mut self, _patient: PatientId, _reason: &SkipReason) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called after `on_tick_end` with read-only access to the roster, so
    /// writers can record patient snapshots without the engine knowing about
    /// any output format.
    fn on_snapshot(&mut self, _time: SimTime, _roster: &Roster) {}
}

/// An [`EngineObserver`] that does nothing.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}

//! The `SimulationEngine` and its tick loop.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use pf_core::{PatientId, PatientTypeId, SimClock, SimConfig, SimRng, SimTime, UnitDraw};
use pf_facility::{validate, Diagnostic, FacilityGraph, PatientType};
use pf_metrics::{calculate_metrics_with_archive, detect_bottlenecks, Bottleneck, SystemMetrics};
use pf_patient::{PathRecord, Patient, PatientStatus, Roster};

use crate::fsm::{self, AreaLoad, Step, TickContext};
use crate::routing::decide_next_area;
use crate::{ArrivalGenerator, EngineError, EngineObserver, EngineResult, NoopObserver, TickReport};

/// The patient-flow simulation.
///
/// `SimulationEngine<D>` owns the roster, the clock, and a keyed copy of the
/// facility graph, and is the only mutator of patient state.  Each
/// [`update`](Self::update) advances the clock and then takes exactly one
/// state-machine step per patient in ascending [`PatientId`] order:
///
/// | Status       | Step                                                        |
/// |--------------|-------------------------------------------------------------|
/// | `moving`     | walk toward the target; on arrival become `waiting`         |
/// | `waiting`    | accumulate wait; enter service if the area has room         |
/// | `in-service` | when service time has elapsed, record the visit and route   |
/// | `completed`  | nothing                                                     |
///
/// The in-service count per area is kept current as steps are applied, so a
/// completion frees a slot for a later patient in the same tick.
///
/// A patient whose current or target area is missing from the graph has its
/// tick skipped; the rest of the roster is processed normally.
///
/// Routing draws come from `D` (a seeded [`SimRng`] by default).  Create via
/// [`EngineBuilder`][crate::EngineBuilder] or [`SimulationEngine::new`].
pub struct SimulationEngine<D: UnitDraw = SimRng> {
    pub(crate) config:      SimConfig,
    pub(crate) clock:       SimClock,
    pub(crate) graph:       FacilityGraph,
    pub(crate) catalog:     Vec<Arc<PatientType>>,
    pub(crate) roster:      Roster,
    pub(crate) draw:        D,
    pub(crate) arrivals:    Option<ArrivalGenerator>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl SimulationEngine<SimRng> {
    /// An engine over `graph` with an empty catalog, seeded from `config.seed`.
    pub fn new(graph: FacilityGraph, config: SimConfig) -> EngineResult<Self> {
        crate::EngineBuilder::new(config, graph).build()
    }
}

impl<D: UnitDraw> SimulationEngine<D> {
    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the clock by `delta_ms` simulated milliseconds and step every
    /// patient once.
    pub fn update(&mut self, delta_ms: u64) -> TickReport {
        self.update_with(delta_ms, &mut NoopObserver)
    }

    /// Advance by `real` elapsed wall time scaled by `config.speed`.
    pub fn advance_real(&mut self, real: Duration) -> TickReport {
        let delta = self.config.scaled_delta(real);
        self.update(delta)
    }

    /// [`update`](Self::update) with observer callbacks.
    pub fn update_with<O: EngineObserver>(&mut self, delta_ms: u64, observer: &mut O) -> TickReport {
        self.clock.advance(delta_ms);
        let now = self.clock.now;
        observer.on_tick_start(now);

        let graph = &self.graph;
        let draw = &mut self.draw;
        let residual = self.config.residual_routing;
        let enforce_capacity = self.config.constraints.enforce_capacity;

        let mut load = AreaLoad::from_roster(graph, &self.roster);
        let mut report = TickReport { time: now, ..TickReport::default() };
        let mut finished: Vec<PatientId> = Vec::new();

        for patient in self.roster.iter_mut() {
            let step = fsm::step(
                patient,
                &TickContext { graph, load: &load, now, delta_ms, enforce_capacity },
            );
            match step {
                Step::Idle | Step::Serve => {}

                Step::Skip(reason) => {
                    debug!("{} tick skipped: {reason}", patient.id);
                    report.skipped += 1;
                    observer.on_patient_skipped(patient.id, &reason);
                }

                Step::Travel(position) => patient.position = position,

                Step::Arrive(area) => {
                    patient.position = area.position;
                    patient.current_area = area.id.clone();
                    patient.target_area = None;
                    patient.status = PatientStatus::Waiting;
                    patient.timestamps.current_area_entry = now;
                    report.arrived += 1;
                }

                Step::Queue { waited_ms } => {
                    patient.metrics.total_wait_time += waited_ms as f64;
                }

                Step::Admit { area, waited_ms } => {
                    patient.metrics.total_wait_time += waited_ms as f64;
                    patient.status = PatientStatus::InService;
                    patient.timestamps.service_start = Some(now);
                    load.admit(area);
                    report.admitted += 1;
                }

                Step::Finish { area, service_ms } => {
                    load.release(area);
                    patient.metrics.total_service_time += service_ms as f64;

                    let entered = patient.timestamps.current_area_entry;
                    let service_start = patient.timestamps.service_start.unwrap_or(now);
                    patient.path.push(PathRecord {
                        area:         area.id.clone(),
                        entry_time:   entered,
                        exit_time:    now,
                        wait_time:    service_start.since(entered),
                        service_time: now.since(service_start),
                    });

                    let next = decide_next_area(&patient.patient_type, area.id.as_str(), graph, &mut *draw, residual);
                    match next {
                        Some(next) => {
                            patient.status = PatientStatus::Moving;
                            patient.target_area = Some(next.id.clone());
                        }
                        None => {
                            patient.status = PatientStatus::Completed;
                            patient.timestamps.exit = Some(now);
                            patient.metrics.total_system_time = now.since(patient.timestamps.entry) as f64;
                            report.completed += 1;
                            finished.push(patient.id);
                            observer.on_patient_completed(patient);
                        }
                    }
                }
            }
        }

        let mut evicted = 0;
        for id in finished {
            evicted += self.roster.record_completion(id);
        }
        if evicted > 0 {
            debug!("archived {evicted} completed patients");
        }

        report.active = self.roster.active_count();
        debug!(
            "tick {now}: admitted {}, completed {}, arrived {}, skipped {}, active {}",
            report.admitted, report.completed, report.arrived, report.skipped, report.active
        );
        observer.on_tick_end(&report);
        observer.on_snapshot(now, &self.roster);
        report
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Create a patient of `patient_type` waiting at its entry area.
    ///
    /// Uses the first `ENTRY` edge.  The catalog's shared copy is reused when
    /// it matches.
    ///
    /// # Errors
    ///
    /// [`EngineError::NoEntryEdge`] or [`EngineError::UnknownArea`]; the
    /// roster is unchanged.
    pub fn add_patient(&mut self, patient_type: &PatientType) -> EngineResult<PatientId> {
        let shared = self
            .catalog
            .iter()
            .find(|t| t.id == patient_type.id && ***t == *patient_type)
            .cloned()
            .unwrap_or_else(|| Arc::new(patient_type.clone()));
        self.admit(shared)
    }

    /// Create a patient of the catalog type `type_id`.
    pub fn add_patient_by_id(&mut self, type_id: &str) -> EngineResult<PatientId> {
        let shared = self
            .catalog
            .iter()
            .find(|t| t.id == type_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownPatientType(PatientTypeId::from(type_id)))?;
        self.admit(shared)
    }

    fn admit(&mut self, patient_type: Arc<PatientType>) -> EngineResult<PatientId> {
        let Some(edge) = patient_type.entry_edge() else {
            return Err(EngineError::NoEntryEdge { patient_type: patient_type.id.clone() });
        };
        let Some(area) = self.graph.get(edge.to.as_str()) else {
            return Err(EngineError::UnknownArea {
                patient_type: patient_type.id.clone(),
                area:         edge.to.clone(),
            });
        };
        let (area_id, position, now) = (area.id.clone(), area.position, self.clock.now);
        Ok(self
            .roster
            .insert_with(|id| Patient::arrive(id, patient_type, area_id, position, now)))
    }

    /// Inject the patients the arrival generator schedules within the next
    /// `delta_ms`.  They enter at the current clock.
    ///
    /// Returns nothing when generation is disabled or no patterns exist.
    pub fn generate_arrivals(&mut self, delta_ms: u64) -> Vec<PatientId> {
        if !self.config.patient_generation.enabled {
            return Vec::new();
        }
        let Some(generator) = self.arrivals.as_mut() else {
            return Vec::new();
        };
        let now = self.clock.now;
        let due = generator.arrivals(now, now + delta_ms);

        let mut injected = Vec::with_capacity(due.len());
        for type_id in due {
            match self.add_patient_by_id(type_id.as_str()) {
                Ok(id) => injected.push(id),
                Err(e) => warn!("arrival of {type_id} dropped: {e}"),
            }
        }
        injected
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Clear the roster and reset the clock.  Configuration, facility, and
    /// the routing draw stream are kept.
    pub fn reset(&mut self) {
        self.roster.clear();
        self.clock.reset();
        if let Some(generator) = self.arrivals.as_mut() {
            generator.reset();
        }
        info!("simulation reset");
    }

    /// Replace the facility graph and re-run validation.  Patients referencing
    /// areas that no longer exist are skipped on later ticks.
    pub fn set_facility(&mut self, graph: FacilityGraph) -> &[Diagnostic] {
        info!("facility replaced: {} areas, {} connections", graph.len(), graph.connections().len());
        self.graph = graph;
        self.revalidate();
        &self.diagnostics
    }

    /// Replace the patient-type catalog and re-run validation.
    pub fn set_catalog(&mut self, catalog: impl IntoIterator<Item = PatientType>) -> &[Diagnostic] {
        self.catalog = catalog.into_iter().map(Arc::new).collect();
        self.revalidate();
        &self.diagnostics
    }

    pub(crate) fn revalidate(&mut self) {
        self.diagnostics = validate(&self.graph, self.catalog.iter().map(|t| &**t));
        for d in &self.diagnostics {
            warn!("{d}");
        }
    }

    /// Toggle capacity enforcement at runtime.
    pub fn set_enforce_capacity(&mut self, enforce: bool) {
        self.config.constraints.enforce_capacity = enforce;
    }

    /// Change the real-to-simulated time multiplier.
    pub fn set_speed(&mut self, speed: f64) -> EngineResult<()> {
        let mut config = self.config.clone();
        config.speed = speed;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Patients at `area` that are not walking, including completed ones
    /// whose last area it was.
    pub fn get_area_occupancy(&self, area: &str) -> usize {
        self.roster.iter().filter(|p| p.occupies(area)).count()
    }

    /// All held patients in admission order.
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.roster.iter()
    }

    pub fn patient(&self, id: PatientId) -> Option<&Patient> {
        self.roster.get(id)
    }

    pub fn get_metrics(&self) -> SystemMetrics {
        calculate_metrics_with_archive(
            self.roster.iter(),
            self.graph.areas(),
            self.clock.now,
            self.roster.archive(),
        )
    }

    /// Bottlenecks from a fresh metrics snapshot, with the types of active
    /// patients at each area filled in.
    pub fn get_bottlenecks(&self) -> Vec<Bottleneck> {
        let metrics = self.get_metrics();
        let mut found = detect_bottlenecks(
            self.graph.areas(),
            &metrics.by_area,
            &self.config.thresholds,
            self.clock.now,
        );

        let mut types_at: BTreeMap<&str, BTreeSet<&PatientTypeId>> = BTreeMap::new();
        for p in self.roster.iter().filter(|p| p.is_active()) {
            types_at.entry(p.current_area.as_str()).or_default().insert(&p.patient_type.id);
        }
        for b in &mut found {
            if let Some(types) = types_at.get(b.area_id.as_str()) {
                b.impacted_patient_types = types.iter().map(|&t| t.clone()).collect();
            }
        }
        found
    }

    pub fn now(&self) -> SimTime {
        self.clock.now
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn graph(&self) -> &FacilityGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &[Arc<PatientType>] {
        &self.catalog
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Findings of the last validation pass.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn draw_mut(&mut self) -> &mut D {
        &mut self.draw
    }
}

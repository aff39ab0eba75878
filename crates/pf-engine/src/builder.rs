//! Fluent builder for constructing a [`SimulationEngine`].

use std::sync::Arc;

use pf_core::{SimClock, SimConfig, SimRng, UnitDraw};
use pf_facility::{validate, FacilityGraph, PatientType};
use pf_patient::Roster;

use crate::{ArrivalGenerator, EngineError, EngineResult, SimulationEngine};

/// Seed offset of the arrival generator's stream.
const ARRIVAL_STREAM: u64 = 1;

/// Fluent builder for [`SimulationEngine<D>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: speed, capacity enforcement, seed, retention, …
/// - [`FacilityGraph`]: the areas and connections
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                   |
/// |-----------------|-------------------------------------------|
/// | `.catalog(v)`   | empty; `add_patient` still accepts types  |
/// | `.strict(b)`    | `false`: validation errors only log       |
/// | `.draw(d)`      | `SimRng::new(config.seed)`                |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(config, layout.graph())
///     .catalog(catalog)
///     .strict(true)
///     .build()?;
/// engine.add_patient_by_id("walk-in")?;
/// engine.update(1_000);
/// ```
pub struct EngineBuilder<D: UnitDraw = SimRng> {
    config:  SimConfig,
    graph:   FacilityGraph,
    catalog: Vec<PatientType>,
    strict:  bool,
    draw:    D,
}

impl EngineBuilder<SimRng> {
    pub fn new(config: SimConfig, graph: FacilityGraph) -> Self {
        let draw = SimRng::new(config.seed);
        Self { config, graph, catalog: Vec::new(), strict: false, draw }
    }
}

impl<D: UnitDraw> EngineBuilder<D> {
    /// Patient types known to the engine, in catalog order.
    pub fn catalog(mut self, catalog: impl IntoIterator<Item = PatientType>) -> Self {
        self.catalog = catalog.into_iter().collect();
        self
    }

    /// Fail [`build`](Self::build) when validation reports any error-level
    /// diagnostic.  Per-tick behaviour is the same either way.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replace the routing draw source, e.g. with
    /// [`FixedDraws`][pf_core::FixedDraws] to pin decisions in tests.
    pub fn draw<E: UnitDraw>(self, draw: E) -> EngineBuilder<E> {
        EngineBuilder {
            config:  self.config,
            graph:   self.graph,
            catalog: self.catalog,
            strict:  self.strict,
            draw,
        }
    }

    /// Validate inputs and return a ready-to-run engine.
    pub fn build(self) -> EngineResult<SimulationEngine<D>> {
        self.config.validate()?;

        // ── Generation patterns must name catalog types ───────────────────
        let generation = &self.config.patient_generation;
        if generation.enabled {
            for pattern in &generation.patterns {
                if !self.catalog.iter().any(|t| t.id == pattern.patient_type) {
                    return Err(EngineError::UnknownPatientType(pattern.patient_type.clone()));
                }
            }
        }

        // ── Facility validation ───────────────────────────────────────────
        let diagnostics = validate(&self.graph, &self.catalog);
        for d in &diagnostics {
            log::warn!("{d}");
        }
        if self.strict && diagnostics.iter().any(|d| d.is_error()) {
            return Err(EngineError::Validation(diagnostics));
        }

        let arrivals = (!generation.patterns.is_empty()).then(|| {
            ArrivalGenerator::new(
                generation,
                self.config.randomness.arrival_time_variance,
                SimRng::new(self.config.seed).child(ARRIVAL_STREAM),
            )
        });

        Ok(SimulationEngine {
            clock:    SimClock::new(),
            roster:   Roster::new(self.config.retention),
            catalog:  self.catalog.into_iter().map(Arc::new).collect(),
            graph:    self.graph,
            draw:     self.draw,
            arrivals,
            diagnostics,
            config:   self.config,
        })
    }
}

//! Construction-time validation of the facility graph against the catalog.
//!
//! The tick loop silently skips patients that reference missing areas, which
//! keeps a single bad entity from halting the run but hides authoring
//! mistakes.  `validate` reports all of them up front.  It never changes
//! per-tick behaviour.

use std::fmt;

use pf_core::{AreaId, PatientTypeId};

use crate::{FacilityGraph, PatientType};

/// Tolerance for comparing probability sums against one.
const SUM_EPSILON: f64 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

/// Which end of a flow-path edge a diagnostic refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeEnd {
    From,
    To,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticKind {
    /// The type has no `ENTRY` edge; injecting it always fails.
    MissingEntry { patient_type: PatientTypeId },
    /// More than one `ENTRY` edge; only the first is used.
    ExtraEntry { patient_type: PatientTypeId, count: usize },
    /// An edge endpoint names no area in the graph.
    UnknownArea { patient_type: PatientTypeId, area: AreaId, end: EdgeEnd },
    ProbabilityOutOfRange { patient_type: PatientTypeId, from: AreaId, to: AreaId, probability: f64 },
    /// Outgoing probabilities exceed one; later edges are partly unreachable.
    OverAllocated { patient_type: PatientTypeId, from: AreaId, total: f64 },
    /// Outgoing probabilities fall short of one; the rest discharges.
    ImplicitExit { patient_type: PatientTypeId, from: AreaId, residual: f64 },
    /// The area never admits anybody.
    ZeroCapacity { area: AreaId },
    DuplicateArea { area: AreaId },
    UnknownConnectionEndpoint { connection: String, area: AreaId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub kind:  DiagnosticKind,
}

impl Diagnostic {
    fn warning(kind: DiagnosticKind) -> Self {
        Self { level: DiagnosticLevel::Warning, kind }
    }

    fn error(kind: DiagnosticKind) -> Self {
        Self { level: DiagnosticLevel::Error, kind }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DiagnosticKind::*;
        match &self.kind {
            MissingEntry { patient_type } => {
                write!(f, "patient type {patient_type} has no ENTRY edge")
            }
            ExtraEntry { patient_type, count } => {
                write!(f, "patient type {patient_type} has {count} ENTRY edges; only the first is used")
            }
            UnknownArea { patient_type, area, end } => {
                let end = match end {
                    EdgeEnd::From => "source",
                    EdgeEnd::To => "target",
                };
                write!(f, "patient type {patient_type} routes through unknown {end} area {area}")
            }
            ProbabilityOutOfRange { patient_type, from, to, probability } => write!(
                f,
                "patient type {patient_type}: edge {from} -> {to} has probability {probability} outside [0, 1]"
            ),
            OverAllocated { patient_type, from, total } => write!(
                f,
                "patient type {patient_type}: edges from {from} sum to {total:.3}; later edges are unreachable"
            ),
            ImplicitExit { patient_type, from, residual } => write!(
                f,
                "patient type {patient_type}: {residual:.3} of the probability mass leaving {from} discharges the patient"
            ),
            ZeroCapacity { area } => write!(f, "area {area} has capacity 0 and never admits"),
            DuplicateArea { area } => write!(f, "area id {area} appears more than once"),
            UnknownConnectionEndpoint { connection, area } => {
                write!(f, "connection {connection} references unknown area {area}")
            }
        }
    }
}

/// Report every dangling reference and suspicious routing table.
///
/// Diagnostics are ordered: graph-level findings first, then per patient type
/// in catalog order.
pub fn validate<'a, I>(graph: &FacilityGraph, catalog: I) -> Vec<Diagnostic>
where
    I: IntoIterator<Item = &'a PatientType>,
{
    let mut out = Vec::new();

    for area in graph.duplicates() {
        out.push(Diagnostic::warning(DiagnosticKind::DuplicateArea { area: area.clone() }));
    }
    for area in graph.areas() {
        if area.capacity() == 0 {
            out.push(Diagnostic::warning(DiagnosticKind::ZeroCapacity { area: area.id.clone() }));
        }
    }
    for conn in graph.connections() {
        for end in [&conn.from, &conn.to] {
            if !graph.contains(end.as_str()) {
                out.push(Diagnostic::warning(DiagnosticKind::UnknownConnectionEndpoint {
                    connection: conn.id.clone(),
                    area:       end.clone(),
                }));
            }
        }
    }

    for ty in catalog {
        validate_type(graph, ty, &mut out);
    }
    out
}

fn validate_type(graph: &FacilityGraph, ty: &PatientType, out: &mut Vec<Diagnostic>) {
    let entries = ty.flow_path.iter().filter(|p| p.from.is_entry()).count();
    match entries {
        0 => out.push(Diagnostic::error(DiagnosticKind::MissingEntry { patient_type: ty.id.clone() })),
        1 => {}
        count => out.push(Diagnostic::warning(DiagnosticKind::ExtraEntry {
            patient_type: ty.id.clone(),
            count,
        })),
    }

    for edge in &ty.flow_path {
        if !edge.from.is_entry() && !graph.contains(edge.from.as_str()) {
            out.push(Diagnostic::error(DiagnosticKind::UnknownArea {
                patient_type: ty.id.clone(),
                area:         edge.from.clone(),
                end:          EdgeEnd::From,
            }));
        }
        // An entry edge must land on a real area; other edges may also EXIT.
        let target_ok = graph.contains(edge.to.as_str()) || (edge.to.is_exit() && !edge.from.is_entry());
        if !target_ok {
            out.push(Diagnostic::error(DiagnosticKind::UnknownArea {
                patient_type: ty.id.clone(),
                area:         edge.to.clone(),
                end:          EdgeEnd::To,
            }));
        }
        if !(0.0..=1.0).contains(&edge.probability) {
            out.push(Diagnostic::error(DiagnosticKind::ProbabilityOutOfRange {
                patient_type: ty.id.clone(),
                from:         edge.from.clone(),
                to:           edge.to.clone(),
                probability:  edge.probability,
            }));
        }
    }

    for from in ty.sources() {
        let total: f64 = ty.edges_from(from.as_str()).map(|p| p.probability).sum();
        if total > 1.0 + SUM_EPSILON {
            out.push(Diagnostic::warning(DiagnosticKind::OverAllocated {
                patient_type: ty.id.clone(),
                from:         from.clone(),
                total,
            }));
        } else if total < 1.0 - SUM_EPSILON {
            out.push(Diagnostic::warning(DiagnosticKind::ImplicitExit {
                patient_type: ty.id.clone(),
                from:         from.clone(),
                residual:     1.0 - total,
            }));
        }
    }
}

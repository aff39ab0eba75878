//! Next-area selection.

use pf_core::{ResidualRouting, UnitDraw};
use pf_facility::{Area, FacilityGraph, PatientType};

/// Pick the area a patient leaving `from` walks to next, or `None` if the
/// patient leaves the facility.
///
/// Edges leaving `from` are walked in declaration order, accumulating
/// probability; the first edge whose cumulative sum reaches the draw `r`
/// fires.  An edge to `EXIT` discharges the patient.  An edge whose target is
/// not in the graph does not fire and the walk continues with later edges.
///
/// No edges means exit without consuming a draw.  When the edges sum to less
/// than one, [`ResidualRouting::Exit`] lets a draw above the sum discharge
/// the patient; [`ResidualRouting::Renormalize`] scales the draw by the sum
/// so some edge always fires.  Sums above one are not corrected.
pub fn decide_next_area<'g, D: UnitDraw + ?Sized>(
    patient_type: &PatientType,
    from:         &str,
    graph:        &'g FacilityGraph,
    draw:         &mut D,
    residual:     ResidualRouting,
) -> Option<&'g Area> {
    let mut edges = patient_type.edges_from(from).peekable();
    edges.peek()?;

    let mut r = draw.unit();
    if residual == ResidualRouting::Renormalize {
        let total: f64 = patient_type.edges_from(from).map(|e| e.probability).sum();
        if total > 0.0 && total < 1.0 {
            r *= total;
        }
    }

    let mut cumulative = 0.0;
    for edge in edges {
        cumulative += edge.probability;
        if r <= cumulative {
            if edge.to.is_exit() {
                return None;
            }
            if let Some(area) = graph.get(edge.to.as_str()) {
                return Some(area);
            }
        }
    }
    None
}

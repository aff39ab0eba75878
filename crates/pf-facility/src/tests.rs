//! Unit tests for pf-facility.

use pf_core::Point;

use crate::{Area, Connection, ConnectionKind, FacilityGraph, FlowPath, PatientType};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn area(id: &str, capacity: u32) -> Area {
    Area::new(id, capacity, 10.0, 5.0, Point::new(0.0, 0.0))
}

fn conn(id: &str, from: &str, to: &str) -> Connection {
    Connection {
        id:            id.into(),
        from:          from.into(),
        to:            to.into(),
        bidirectional: true,
        distance:      0.0,
        kind:          ConnectionKind::Primary,
    }
}

fn triage_type() -> PatientType {
    PatientType::new(
        "emergency",
        2.0,
        vec![
            FlowPath::new("ENTRY", "triage", 1.0),
            FlowPath::new("triage", "consult", 0.7),
            FlowPath::new("triage", "EXIT", 0.3),
        ],
    )
}

// ── FacilityGraph ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use super::*;

    #[test]
    fn preserves_supplied_order() {
        let g = FacilityGraph::new(vec![area("b", 1), area("a", 1), area("c", 1)], vec![]);
        let ids: Vec<&str> = g.areas().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn lookup_by_str() {
        let g = FacilityGraph::new(vec![area("triage", 2)], vec![]);
        assert_eq!(g.get("triage").map(Area::capacity), Some(2));
        assert!(g.get("missing").is_none());
        assert!(g.contains("triage"));
    }

    #[test]
    fn duplicate_keeps_first_position_last_value() {
        let g = FacilityGraph::new(vec![area("a", 1), area("b", 1), area("a", 9)], vec![]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.areas()[0].id.as_str(), "a");
        assert_eq!(g.areas()[0].capacity(), 9);
        assert_eq!(g.duplicates().len(), 1);
    }

    #[test]
    fn empty_graph() {
        let g = FacilityGraph::empty();
        assert!(g.is_empty());
        assert!(g.get("a").is_none());
    }
}

// ── PatientType ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod patient_type {
    use super::*;

    #[test]
    fn entry_edge_is_first_from_entry() {
        let mut ty = triage_type();
        ty.flow_path.push(FlowPath::new("ENTRY", "consult", 1.0));
        assert_eq!(ty.entry_edge().map(|e| e.to.as_str()), Some("triage"));
    }

    #[test]
    fn edges_from_in_declaration_order() {
        let ty = triage_type();
        let targets: Vec<&str> = ty.edges_from("triage").map(|e| e.to.as_str()).collect();
        assert_eq!(targets, vec!["consult", "EXIT"]);
        assert_eq!(ty.edges_from("consult").count(), 0);
    }

    #[test]
    fn sources_skip_entry() {
        let ty = triage_type();
        let sources: Vec<&str> = ty.sources().iter().map(|a| a.as_str()).collect();
        assert_eq!(sources, vec!["triage"]);
    }

    #[test]
    fn process_time_in_millis() {
        assert_eq!(area("a", 1).process_time_ms(), 600_000.0);
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;
    use crate::{validate, DiagnosticKind, DiagnosticLevel, EdgeEnd};

    fn graph() -> FacilityGraph {
        FacilityGraph::new(vec![area("triage", 2), area("consult", 1)], vec![])
    }

    #[test]
    fn clean_catalog_has_no_diagnostics() {
        let diags = validate(&graph(), [&triage_type()]);
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn missing_entry_is_an_error() {
        let ty = PatientType::new("lost", 0.0, vec![FlowPath::new("triage", "consult", 1.0)]);
        let diags = validate(&graph(), [&ty]);
        assert!(diags.iter().any(|d| d.is_error()
            && matches!(&d.kind, DiagnosticKind::MissingEntry { patient_type } if patient_type == "lost")));
    }

    #[test]
    fn unknown_areas_reported_on_both_ends() {
        let ty = PatientType::new(
            "t",
            0.0,
            vec![
                FlowPath::new("ENTRY", "triage", 1.0),
                FlowPath::new("ghost", "consult", 1.0),
                FlowPath::new("triage", "nowhere", 1.0),
            ],
        );
        let diags = validate(&graph(), [&ty]);
        let ends: Vec<EdgeEnd> = diags
            .iter()
            .filter_map(|d| match &d.kind {
                DiagnosticKind::UnknownArea { end, .. } => Some(*end),
                _ => None,
            })
            .collect();
        assert_eq!(ends, vec![EdgeEnd::From, EdgeEnd::To]);
    }

    #[test]
    fn entry_into_exit_is_unknown() {
        let ty = PatientType::new("t", 0.0, vec![FlowPath::new("ENTRY", "EXIT", 1.0)]);
        let diags = validate(&graph(), [&ty]);
        assert!(diags.iter().any(|d| matches!(d.kind, DiagnosticKind::UnknownArea { end: EdgeEnd::To, .. })));
    }

    #[test]
    fn residual_and_overallocation_are_warnings() {
        let ty = PatientType::new(
            "t",
            0.0,
            vec![
                FlowPath::new("ENTRY", "triage", 1.0),
                FlowPath::new("triage", "consult", 0.6),
                FlowPath::new("consult", "triage", 0.8),
                FlowPath::new("consult", "EXIT", 0.5),
            ],
        );
        let diags = validate(&graph(), [&ty]);
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.level == DiagnosticLevel::Warning));
        assert!(matches!(diags[0].kind, DiagnosticKind::ImplicitExit { residual, .. } if (residual - 0.4).abs() < 1e-9));
        assert!(matches!(diags[1].kind, DiagnosticKind::OverAllocated { .. }));
    }

    #[test]
    fn probability_out_of_range() {
        let ty = PatientType::new(
            "t",
            0.0,
            vec![FlowPath::new("ENTRY", "triage", 1.0), FlowPath::new("triage", "EXIT", -0.1)],
        );
        let diags = validate(&graph(), [&ty]);
        assert!(diags.iter().any(|d| matches!(d.kind, DiagnosticKind::ProbabilityOutOfRange { .. })));
    }

    #[test]
    fn graph_level_findings() {
        let g = FacilityGraph::new(
            vec![area("a", 0), area("b", 1), area("b", 1)],
            vec![conn("c1", "a", "z")],
        );
        let diags = validate(&g, std::iter::empty());
        assert!(matches!(&diags[0].kind, DiagnosticKind::DuplicateArea { area } if area == "b"));
        assert!(matches!(&diags[1].kind, DiagnosticKind::ZeroCapacity { area } if area == "a"));
        assert!(matches!(&diags[2].kind, DiagnosticKind::UnknownConnectionEndpoint { area, .. } if area == "z"));
        assert_eq!(diags.len(), 3);
    }

    #[test]
    fn display_names_the_type() {
        let ty = PatientType::new("lost", 0.0, vec![]);
        let diags = validate(&graph(), [&ty]);
        assert_eq!(diags[0].to_string(), "patient type lost has no ENTRY edge");
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{load_catalog_reader, load_flow_paths_reader, load_layout_reader, AreaCategory, FacilityError};

    const LAYOUT: &str = r#"{
        "id": "clinic-1",
        "name": "Clinic",
        "scale": 10.0,
        "areas": [
            {
                "id": "triage",
                "name": "Triage",
                "category": "CLINICAL",
                "type": "triage",
                "position": { "x": 1.0, "y": 2.0 },
                "properties": { "capacity": 2, "processTime": 5, "expectedWaitTime": 10 }
            },
            {
                "id": "wash",
                "category": "WASH",
                "position": { "x": 4.0, "y": 6.0 },
                "properties": { "capacity": 1, "processTime": 3 }
            }
        ],
        "connections": [
            { "id": "c1", "from": "triage", "to": "wash", "type": "secondary" }
        ]
    }"#;

    #[test]
    fn layout_json_defaults_display_fields() {
        let layout = load_layout_reader(Cursor::new(LAYOUT)).unwrap();
        assert_eq!(layout.areas.len(), 2);
        let wash = &layout.areas[1];
        assert_eq!(wash.category, AreaCategory::Wash);
        assert_eq!(wash.expected_wait_time(), 0.0);
        assert_eq!(wash.name, "");
        assert_eq!(layout.areas[0].properties.capacity, 2);

        let g = layout.graph();
        assert_eq!(g.get("triage").map(|a| a.position.y), Some(2.0));
        assert_eq!(g.connections().len(), 1);
    }

    #[test]
    fn catalog_json() {
        let json = r#"[
            { "id": "walk-in", "name": "Walk-in", "priority": 1,
              "flowPath": [ { "from": "ENTRY", "to": "triage", "probability": 1.0, "avgTransitionTime": 2 } ] }
        ]"#;
        let catalog = load_catalog_reader(Cursor::new(json)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].entry_edge().map(|e| e.avg_transition_time), Some(2.0));
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let json = r#"[ { "id": "a" }, { "id": "a" } ]"#;
        assert!(matches!(load_catalog_reader(Cursor::new(json)), Err(FacilityError::Parse(_))));
    }

    #[test]
    fn flow_paths_grouped_in_file_order() {
        let csv = "patient_type,from,to,probability,avg_transition_time\n\
                   b,ENTRY,triage,1.0,\n\
                   a,ENTRY,wash,1.0,0\n\
                   b,triage,EXIT,0.5,3\n";
        let groups = load_flow_paths_reader(Cursor::new(csv)).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0.as_str(), "b");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[0].1[0].avg_transition_time, 0.0);
        assert_eq!(groups[0].1[1].avg_transition_time, 3.0);
        assert_eq!(groups[1].0.as_str(), "a");
    }

    #[test]
    fn flow_paths_bad_probability_is_csv_error() {
        let csv = "patient_type,from,to,probability,avg_transition_time\nb,ENTRY,triage,high,0\n";
        assert!(matches!(load_flow_paths_reader(Cursor::new(csv)), Err(FacilityError::Csv(_))));
    }
}

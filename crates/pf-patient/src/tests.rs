//! Unit tests for pf-patient.

use std::sync::Arc;

use pf_core::{AreaId, PatientId, Point, SimTime};
use pf_facility::{FlowPath, PatientType};

use crate::{Patient, PatientStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn walk_in() -> Arc<PatientType> {
    Arc::new(PatientType::new("walk-in", 0.0, vec![FlowPath::new("ENTRY", "triage", 1.0)]))
}

fn urgent() -> Arc<PatientType> {
    Arc::new(PatientType::new("urgent", 2.0, vec![FlowPath::new("ENTRY", "triage", 1.0)]))
}

fn waiting(id: PatientId, area: &str) -> Patient {
    Patient::arrive(id, walk_in(), AreaId::from(area), Point::new(0.0, 0.0), SimTime::ZERO)
}

fn waiting_urgent(id: PatientId, area: &str) -> Patient {
    Patient::arrive(id, urgent(), AreaId::from(area), Point::new(0.0, 0.0), SimTime::ZERO)
}

fn completed(id: PatientId, area: &str, wait_ms: f64, system_ms: f64) -> Patient {
    let mut p = waiting(id, area);
    p.status = PatientStatus::Completed;
    p.metrics.total_wait_time = wait_ms;
    p.metrics.total_system_time = system_ms;
    p
}

fn completed_urgent(id: PatientId) -> Patient {
    let mut p = waiting_urgent(id, "a");
    p.status = PatientStatus::Completed;
    p
}

// ── Patient ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod patient {
    use super::*;

    #[test]
    fn arrive_sets_all_timestamps_to_now() {
        let now = SimTime(5_000);
        let p = Patient::arrive(PatientId(0), walk_in(), "triage".into(), Point::new(1.0, 1.0), now);
        assert_eq!(p.status, PatientStatus::Waiting);
        assert_eq!(p.timestamps.entry, now);
        assert_eq!(p.timestamps.current_area_entry, now);
        assert_eq!(p.timestamps.service_start, None);
        assert!(p.target_area.is_none());
        assert!(p.path.is_empty());
        assert_eq!(p.metrics.total_wait_time, 0.0);
    }

    #[test]
    fn moving_patients_do_not_occupy() {
        let mut p = waiting(PatientId(0), "triage");
        assert!(p.occupies("triage"));
        p.status = PatientStatus::Moving;
        assert!(!p.occupies("triage"));
    }

    #[test]
    fn service_elapsed_without_start_is_zero() {
        let mut p = waiting(PatientId(0), "triage");
        assert_eq!(p.service_elapsed(SimTime(10_000)), 0);
        p.timestamps.service_start = Some(SimTime(4_000));
        assert_eq!(p.service_elapsed(SimTime(10_000)), 6_000);
    }

    #[test]
    fn status_wire_names() {
        assert_eq!(PatientStatus::InService.to_string(), "in-service");
        assert_eq!(PatientStatus::Completed.as_str(), "completed");
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod movement {
    use super::*;
    use crate::{advance_toward, walking_speed, Travel};

    #[test]
    fn speed_scales_with_priority() {
        assert!((walking_speed(0.0) - 1.2).abs() < 1e-12);
        assert!((walking_speed(2.0) - 1.56).abs() < 1e-12);
    }

    #[test]
    fn arrives_when_step_covers_distance() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(1.2, 0.0);
        assert_eq!(advance_toward(from, to, 1.2, 1.0), Travel::Arrived);
    }

    #[test]
    fn moves_proportionally() {
        let from = Point::new(0.0, 0.0);
        let to = Point::new(10.0, 0.0);
        match advance_toward(from, to, 2.0, 1.0) {
            Travel::Moved(p) => assert!((p.x - 2.0).abs() < 1e-12 && p.y == 0.0),
            other => panic!("expected Moved, got {other:?}"),
        }
    }

    #[test]
    fn zero_delta_at_target_arrives() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(advance_toward(p, p, 1.2, 0.0), Travel::Arrived);
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod roster {
    use pf_core::Retention;

    use super::*;
    use crate::Roster;

    #[test]
    fn ids_are_sequential_and_iteration_is_ordered() {
        let mut roster = Roster::new(Retention::Unbounded);
        let a = roster.insert_with(|id| waiting(id, "x"));
        let b = roster.insert_with(|id| waiting(id, "y"));
        assert_eq!((a, b), (PatientId(0), PatientId(1)));
        let order: Vec<PatientId> = roster.iter().map(|p| p.id).collect();
        assert_eq!(order, vec![a, b]);
        assert_eq!(roster.active_count(), 2);
    }

    #[test]
    fn unbounded_keeps_completed() {
        let mut roster = Roster::new(Retention::Unbounded);
        for _ in 0..10 {
            let id = roster.insert_with(|id| waiting(id, "x"));
            if let Some(p) = roster.get_mut(id) {
                p.status = PatientStatus::Completed;
            }
            assert_eq!(roster.record_completion(id), 0);
        }
        assert_eq!(roster.len(), 10);
        assert_eq!(roster.active_count(), 0);
        assert_eq!(roster.completed_total(), 10);
        assert!(roster.archive().is_empty());
    }

    #[test]
    fn last_completed_evicts_oldest_into_archive() {
        let mut roster = Roster::new(Retention::LastCompleted(2));
        let live = roster.insert_with(|id| waiting_urgent(id, "x"));
        for i in 0..4 {
            let area = if i % 2 == 0 { "a" } else { "b" };
            roster.insert_with(|id| completed(id, area, 1_000.0, 5_000.0));
        }
        assert_eq!(roster.len(), 3);
        assert!(roster.get(live).is_some());
        assert!(roster.get(PatientId(1)).is_none());
        assert!(roster.get(PatientId(2)).is_none());

        let archive = roster.archive();
        assert_eq!(archive.count, 2);
        assert_eq!(archive.total_wait_time, 2_000.0);
        assert_eq!(archive.by_last_area.get("a"), Some(&1));
        assert_eq!(archive.by_last_area.get("b"), Some(&1));
        assert_eq!(archive.by_type.get("walk-in").map(|t| t.count), Some(2));
        assert_eq!(roster.completed_total(), 4);
        assert_eq!(roster.active_count(), 1);
    }

    #[test]
    fn active_patient_holds_back_later_completions_of_its_type() {
        let mut roster = Roster::new(Retention::LastCompleted(1));
        let first = roster.insert_with(|id| waiting(id, "x"));
        for _ in 0..3 {
            roster.insert_with(|id| completed(id, "a", 1_000.0, 2_000.0));
        }
        roster.insert_with(|id| completed_urgent(id));
        roster.insert_with(|id| completed_urgent(id));

        // Only the urgent completions could be archived.
        assert_eq!(roster.archive().count, 2);
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.active_count(), 1);

        if let Some(p) = roster.get_mut(first) {
            p.status = PatientStatus::Completed;
        }
        assert_eq!(roster.record_completion(first), 3);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.completed_total(), 6);
        let walk_in = roster.archive().by_type.get("walk-in").copied().unwrap_or_default();
        assert_eq!(walk_in.count, 3);
        assert_eq!(walk_in.completion_rate, 1.0);
    }

    #[test]
    fn switching_to_bounded_respects_type_order() {
        let mut roster = Roster::new(Retention::Unbounded);
        roster.insert_with(|id| waiting(id, "x"));
        roster.insert_with(|id| completed(id, "a", 0.0, 0.0));
        roster.insert_with(|id| completed_urgent(id));
        roster.insert_with(|id| completed_urgent(id));
        assert_eq!(roster.set_retention(Retention::LastCompleted(1)), 2);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.set_retention(Retention::Unbounded), 0);
        assert_eq!(roster.active_count(), 1);
    }

    #[test]
    fn tightening_retention_applies_immediately() {
        let mut roster = Roster::new(Retention::Unbounded);
        for _ in 0..3 {
            roster.insert_with(|id| completed(id, "a", 0.0, 0.0));
        }
        assert_eq!(roster.set_retention(Retention::LastCompleted(1)), 2);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn clear_restarts_ids() {
        let mut roster = Roster::new(Retention::LastCompleted(1));
        roster.insert_with(|id| completed(id, "a", 0.0, 0.0));
        roster.insert_with(|id| completed(id, "a", 0.0, 0.0));
        roster.clear();
        assert!(roster.is_empty());
        assert!(roster.archive().is_empty());
        assert_eq!(roster.insert_with(|id| waiting(id, "a")), PatientId(0));
    }
}

//! Unit tests for pf-metrics.

use std::collections::BTreeMap;
use std::sync::Arc;

use pf_core::{AreaId, PatientId, Point, SimTime};
use pf_facility::{Area, FlowPath, PatientType};
use pf_patient::{Patient, PatientStatus};

use crate::AreaMetrics;

// ── Helpers ───────────────────────────────────────────────────────────────────

const MIN: u64 = 60_000;

fn area(id: &str, capacity: u32, expected_wait: f64) -> Area {
    Area::new(id, capacity, 10.0, expected_wait, Point::new(0.0, 0.0))
}

fn ty(id: &str) -> Arc<PatientType> {
    Arc::new(PatientType::new(id, 0.0, vec![FlowPath::new("ENTRY", "a", 1.0)]))
}

fn patient(id: u32, type_id: &str, area: &str, status: PatientStatus) -> Patient {
    let mut p = Patient::arrive(PatientId(id), ty(type_id), AreaId::from(area), Point::default(), SimTime::ZERO);
    p.status = status;
    p
}

fn done(id: u32, type_id: &str, area: &str, wait_ms: u64, system_ms: u64) -> Patient {
    let mut p = patient(id, type_id, area, PatientStatus::Completed);
    p.metrics.total_wait_time = wait_ms as f64;
    p.metrics.total_system_time = system_ms as f64;
    p.timestamps.exit = Some(SimTime(system_ms));
    p
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── Calculator ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod calculator {
    use super::*;
    use crate::{calculate_metrics, AreaStatus};

    #[test]
    fn empty_roster() {
        let areas = vec![area("a", 2, 5.0), area("b", 1, 5.0)];
        let m = calculate_metrics(std::iter::empty(), &areas, SimTime(10 * MIN));
        assert_eq!(m.global.active_patients, 0);
        assert_eq!(m.global.total_processed, 0);
        assert_eq!(m.global.avg_wait_time, 0.0);
        assert_eq!(m.global.throughput, 0.0);
        assert_eq!(m.by_area.len(), 2);
        assert!(m.by_patient_type.is_empty());
        assert_eq!(m.timestamp, SimTime(10 * MIN));
    }

    #[test]
    fn no_areas_means_zero_utilization() {
        let m = calculate_metrics(std::iter::empty(), &[], SimTime::ZERO);
        assert_eq!(m.global.utilization_rate, 0.0);
    }

    #[test]
    fn per_area_waiting_and_in_service() {
        let areas = vec![area("a", 2, 5.0)];
        let waiting = patient(0, "t", "a", PatientStatus::Waiting);
        let mut serving = patient(1, "t", "a", PatientStatus::InService);
        serving.timestamps.service_start = Some(SimTime(MIN));

        let m = calculate_metrics([&waiting, &serving], &areas, SimTime(2 * MIN));
        let a = &m.by_area["a"];
        assert_eq!(a.current_occupancy, 2);
        assert_eq!(a.queue_length, 1);
        assert!(close(a.utilization_rate, 0.5));
        assert!(close(a.avg_wait_time, 2.0));
        assert!(close(a.avg_service_time, 1.0));
        assert_eq!(a.status, AreaStatus::Critical);
        assert!(close(m.global.utilization_rate, 0.5));
    }

    #[test]
    fn moving_patients_count_towards_their_current_area() {
        let areas = vec![area("a", 4, 5.0), area("b", 4, 5.0)];
        let mut walker = patient(0, "t", "a", PatientStatus::Moving);
        walker.target_area = Some("b".into());
        let m = calculate_metrics([&walker], &areas, SimTime(MIN));
        assert_eq!(m.by_area["a"].current_occupancy, 1);
        assert_eq!(m.by_area["a"].queue_length, 0);
        assert_eq!(m.by_area["b"].current_occupancy, 0);
        assert_eq!(m.global.active_patients, 1);
    }

    #[test]
    fn status_bands() {
        assert_eq!(AreaStatus::from_occupancy(3, 4), AreaStatus::Warning);
        assert_eq!(AreaStatus::from_occupancy(2, 4), AreaStatus::Normal);
        assert_eq!(AreaStatus::from_occupancy(4, 4), AreaStatus::Critical);
        assert_eq!(AreaStatus::from_occupancy(9, 0), AreaStatus::Normal);
    }

    #[test]
    fn zero_capacity_is_never_utilized() {
        let areas = vec![area("z", 0, 5.0)];
        let p = patient(0, "t", "z", PatientStatus::InService);
        let m = calculate_metrics([&p], &areas, SimTime(MIN));
        assert_eq!(m.by_area["z"].utilization_rate, 0.0);
        assert_eq!(m.by_area["z"].status, AreaStatus::Normal);
    }

    #[test]
    fn throughput_credits_last_area() {
        let areas = vec![area("a", 1, 5.0), area("b", 1, 5.0)];
        let patients = vec![done(0, "t", "b", 0, MIN), done(1, "t", "b", 0, MIN), done(2, "t", "a", 0, MIN)];
        let m = calculate_metrics(&patients, &areas, SimTime(4 * MIN));
        assert_eq!(m.by_area["a"].throughput, 1);
        assert_eq!(m.by_area["b"].throughput, 2);
        assert_eq!(m.global.total_processed, 3);
        assert!(close(m.global.throughput, 0.75));
    }

    #[test]
    fn global_throughput_floor_is_one_minute() {
        let patients = vec![done(0, "t", "a", 0, 0)];
        let m = calculate_metrics(&patients, &[], SimTime(30_000));
        assert!(close(m.global.throughput, 1.0));
    }

    #[test]
    fn global_averages_in_minutes() {
        let patients = vec![done(0, "t", "a", MIN, 4 * MIN), done(1, "t", "a", 3 * MIN, 6 * MIN)];
        let m = calculate_metrics(&patients, &[], SimTime(10 * MIN));
        assert!(close(m.global.avg_wait_time, 2.0));
        assert!(close(m.global.avg_system_time, 5.0));
    }

    #[test]
    fn per_type_incremental_means() {
        let patients = vec![
            done(0, "t", "a", 0, MIN),
            patient(1, "t", "a", PatientStatus::Waiting),
            done(2, "t", "a", 0, 3 * MIN),
            patient(3, "u", "a", PatientStatus::Waiting),
        ];
        let m = calculate_metrics(&patients, &[], SimTime(10 * MIN));
        let t = &m.by_patient_type["t"];
        assert_eq!(t.count, 3);
        assert!(close(t.avg_system_time, 5.0 / 3.0));
        let u = &m.by_patient_type["u"];
        assert_eq!(u.count, 1);
        assert_eq!(u.completion_rate, 0.0);
    }
}

// ── Archive folding ───────────────────────────────────────────────────────────

#[cfg(test)]
mod archive {
    use pf_core::Retention;
    use pf_patient::Roster;

    use super::*;
    use crate::{calculate_metrics, calculate_metrics_with_archive};

    fn fill(roster: &mut Roster) {
        roster.insert_with(|id| done(id.0, "t", "a", MIN, 2 * MIN));
        roster.insert_with(|id| done(id.0, "t", "b", 3 * MIN, 4 * MIN));
        roster.insert_with(|id| done(id.0, "u", "a", 0, 6 * MIN));
        roster.insert_with(|id| patient(id.0, "t", "a", PatientStatus::Waiting));
    }

    #[test]
    fn bounded_roster_reports_same_totals() {
        let areas = vec![area("a", 1, 5.0), area("b", 1, 5.0)];
        let mut full = Roster::new(Retention::Unbounded);
        let mut bounded = Roster::new(Retention::LastCompleted(1));
        fill(&mut full);
        fill(&mut bounded);
        assert_eq!(bounded.len(), 2);

        let now = SimTime(10 * MIN);
        let a = calculate_metrics(full.iter(), &areas, now);
        let b = calculate_metrics_with_archive(bounded.iter(), &areas, now, bounded.archive());

        assert_eq!(a.global, b.global);
        assert_eq!(a.by_area, b.by_area);
        assert_eq!(a.by_patient_type, b.by_patient_type);
    }

    fn finish(roster: &mut Roster, id: PatientId, wait_ms: u64, system_ms: u64) {
        if let Some(p) = roster.get_mut(id) {
            p.status = PatientStatus::Completed;
            p.metrics.total_wait_time = wait_ms as f64;
            p.metrics.total_system_time = system_ms as f64;
        }
        roster.record_completion(id);
    }

    #[test]
    fn waiting_patient_ahead_of_completions_keeps_type_means() {
        let areas = vec![area("a", 1, 5.0)];
        let now = SimTime(10 * MIN);
        let mut full = Roster::new(Retention::Unbounded);
        let mut bounded = Roster::new(Retention::LastCompleted(1));
        for roster in [&mut full, &mut bounded] {
            roster.insert_with(|id| patient(id.0, "t", "a", PatientStatus::Waiting));
            roster.insert_with(|id| done(id.0, "t", "a", MIN, 2 * MIN));
            roster.insert_with(|id| done(id.0, "t", "a", 3 * MIN, 4 * MIN));
        }
        // The waiting patient pins the later completions of its type.
        assert_eq!(bounded.len(), 3);

        let a = calculate_metrics(full.iter(), &areas, now);
        let b = calculate_metrics_with_archive(bounded.iter(), &areas, now, bounded.archive());
        assert_eq!(a.by_patient_type, b.by_patient_type);
        let t = &b.by_patient_type["t"];
        assert!(close(t.avg_system_time, 2.0));
        assert!(close(t.avg_wait_time, 4.0 / 3.0));
        assert!(close(t.completion_rate, 2.0 / 3.0));

        finish(&mut full, PatientId(0), 5 * MIN, 6 * MIN);
        finish(&mut bounded, PatientId(0), 5 * MIN, 6 * MIN);
        assert_eq!(bounded.len(), 1);
        assert_eq!(bounded.archive().count, 2);

        let a = calculate_metrics(full.iter(), &areas, now);
        let b = calculate_metrics_with_archive(bounded.iter(), &areas, now, bounded.archive());
        assert_eq!(a.global, b.global);
        assert_eq!(a.by_area, b.by_area);
        assert_eq!(a.by_patient_type, b.by_patient_type);
    }
}

// ── Bottleneck detector ───────────────────────────────────────────────────────

#[cfg(test)]
mod bottleneck {
    use pf_core::BottleneckThresholds;

    use super::*;
    use crate::{detect_bottlenecks, severity_for_score, AreaStatus, Severity};

    fn metrics(id: &str, capacity: u32, utilization: f64, avg_wait: f64, queue: u32, throughput: u64) -> AreaMetrics {
        AreaMetrics {
            area_id:           id.into(),
            current_occupancy: 0,
            capacity,
            utilization_rate:  utilization,
            avg_wait_time:     avg_wait,
            avg_service_time:  0.0,
            queue_length:      queue,
            throughput,
            status:            AreaStatus::Normal,
        }
    }

    fn by_area(list: Vec<AreaMetrics>) -> BTreeMap<AreaId, AreaMetrics> {
        list.into_iter().map(|m| (m.area_id.clone(), m)).collect()
    }

    #[test]
    fn high_pressure_scenario() {
        let areas = vec![area("er", 10, 10.0).named("Emergency")];
        let m = by_area(vec![metrics("er", 10, 0.9, 20.0, 0, 10)]);
        let found = detect_bottlenecks(&areas, &m, &BottleneckThresholds::default(), SimTime(MIN));

        assert_eq!(found.len(), 1);
        let b = &found[0];
        assert_eq!(b.severity, Severity::High);
        assert!(close(b.indicators.wait_time_ratio, 2.0));
        assert_eq!(b.indicators.throughput_deficit, 0.0);
        assert_eq!(
            b.recommendations,
            vec!["Review capacity of Emergency".to_owned(), "Evaluate staff reinforcement".to_owned()]
        );
        assert!(!b.recommendations.iter().any(|r| r == "Optimize care protocols"));
        assert_eq!(b.timestamp, SimTime(MIN));
        assert!(b.impacted_patient_types.is_empty());
    }

    #[test]
    fn wait_advice_only_strictly_above_two() {
        let areas = vec![area("a", 10, 10.0)];
        let m = by_area(vec![metrics("a", 10, 0.0, 20.1, 0, 10)]);
        let found = detect_bottlenecks(&areas, &m, &BottleneckThresholds::default(), SimTime::ZERO);
        assert_eq!(found[0].severity, Severity::Medium);
        assert_eq!(found[0].recommendations.len(), 2);
        assert_eq!(found[0].recommendations[0], "Optimize care protocols");
    }

    #[test]
    fn quiet_area_is_excluded() {
        let areas = vec![area("a", 2, 10.0)];
        let m = by_area(vec![metrics("a", 2, 0.5, 1.0, 1, 2)]);
        assert!(detect_bottlenecks(&areas, &m, &BottleneckThresholds::default(), SimTime::ZERO).is_empty());
    }

    #[test]
    fn missing_metrics_are_skipped() {
        let areas = vec![area("a", 0, 0.0)];
        let found = detect_bottlenecks(&areas, &BTreeMap::new(), &BottleneckThresholds::default(), SimTime::ZERO);
        assert!(found.is_empty());
    }

    #[test]
    fn zero_capacity_scores_only_the_queue() {
        let areas = vec![area("z", 0, 0.0)];
        let m = by_area(vec![metrics("z", 0, 0.0, 30.0, 0, 0)]);
        let found = detect_bottlenecks(&areas, &m, &BottleneckThresholds::default(), SimTime::ZERO);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].severity, Severity::Low);
        assert_eq!(found[0].indicators.wait_time_ratio, 0.0);
        assert_eq!(found[0].indicators.throughput_deficit, 0.0);
    }

    #[test]
    fn sorted_by_severity_and_stable() {
        let areas = vec![area("low1", 2, 10.0), area("crit", 2, 10.0), area("low2", 2, 10.0)];
        let m = by_area(vec![
            metrics("low1", 2, 0.0, 0.0, 0, 0),
            metrics("crit", 2, 1.0, 30.0, 3, 0),
            metrics("low2", 2, 0.0, 0.0, 0, 0),
        ]);
        let found = detect_bottlenecks(&areas, &m, &BottleneckThresholds::default(), SimTime::ZERO);
        let ids: Vec<&str> = found.iter().map(|b| b.area_id.as_str()).collect();
        assert_eq!(ids, vec!["crit", "low1", "low2"]);
        assert_eq!(found[0].severity, Severity::Critical);
        assert_eq!(found[0].recommendations.len(), 6);
    }

    #[test]
    fn score_bands() {
        assert_eq!(severity_for_score(0), None);
        assert_eq!(severity_for_score(1), Some(Severity::Low));
        assert_eq!(severity_for_score(3), Some(Severity::Medium));
        assert_eq!(severity_for_score(5), Some(Severity::High));
        assert_eq!(severity_for_score(7), Some(Severity::Critical));
        assert_eq!(severity_for_score(8), Some(Severity::Critical));
        assert!(Severity::Critical > Severity::High);
    }
}

// ── History ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod history {
    use crate::{MetricsHistory, MetricsSnapshot, SystemMetrics, DEFAULT_HISTORY_LEN};

    fn snap(ms: u64) -> MetricsSnapshot {
        let metrics = SystemMetrics { timestamp: pf_core::SimTime(ms), ..SystemMetrics::default() };
        MetricsSnapshot { metrics, generated_at: ms }
    }

    #[test]
    fn keeps_last_fifty() {
        let mut h = MetricsHistory::default();
        for i in 0..60 {
            h.push(snap(i));
        }
        assert_eq!(h.len(), DEFAULT_HISTORY_LEN);
        assert_eq!(h.iter().next().map(|s| s.generated_at), Some(10));
        assert_eq!(h.latest().map(|s| s.generated_at), Some(59));
    }

    #[test]
    fn capacity_is_at_least_one() {
        let mut h = MetricsHistory::with_capacity(0);
        h.push(snap(1));
        h.push(snap(2));
        assert_eq!(h.len(), 1);
        assert_eq!(h.capacity(), 1);
    }

    #[test]
    fn record_stamps_wall_clock() {
        let mut h = MetricsHistory::with_capacity(2);
        let stamped = h.record(SystemMetrics::default()).generated_at;
        assert!(stamped > 0);
        h.clear();
        assert!(h.is_empty());
    }
}

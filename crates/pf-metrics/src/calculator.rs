//! The metrics calculator.
//!
//! # Passes
//!
//! 1. **Bucket** (sequential, O(patients)): split the roster into active and
//!    completed, and group active patients by `current_area`.
//! 2. **Per area** (parallel with the `parallel` feature): one `AreaMetrics`
//!    per area of the facility graph, from its bucket only.
//! 3. **Per type** (sequential, roster order): incremental means.  These are
//!    order-sensitive, so they always run in admission order.

use std::collections::{BTreeMap, HashMap};

use pf_core::{PatientTypeId, SimTime, MS_PER_MINUTE};
use pf_facility::Area;
use pf_patient::{ArchiveSummary, Patient, PatientStatus, TypeRunning};

use crate::{AreaMetrics, AreaStatus, GlobalMetrics, PatientTypeMetrics, SystemMetrics};

#[inline]
fn to_minutes(ms: f64) -> f64 {
    ms / MS_PER_MINUTE
}

/// Active patients at one area, split by status.
#[derive(Default)]
struct AreaBucket<'a> {
    occupancy:  u32,
    waiting:    Vec<&'a Patient>,
    in_service: Vec<&'a Patient>,
}

/// Metrics over the patients supplied, with no archived history.
pub fn calculate_metrics<'a, I>(patients: I, areas: &[Area], now: SimTime) -> SystemMetrics
where
    I: IntoIterator<Item = &'a Patient>,
{
    calculate_metrics_with_archive(patients, areas, now, &ArchiveSummary::default())
}

/// Metrics over the patients supplied plus those folded into `archive`.
///
/// Archived patients count as if they had been enumerated before the live
/// roster: they add to the completed totals and to the throughput of their
/// last area.  Each type's running means resume where the archive left off.
pub fn calculate_metrics_with_archive<'a, I>(
    patients: I,
    areas:    &[Area],
    now:      SimTime,
    archive:  &ArchiveSummary,
) -> SystemMetrics
where
    I: IntoIterator<Item = &'a Patient>,
{
    let patients: Vec<&Patient> = patients.into_iter().collect();

    // ── Pass 1: bucket ────────────────────────────────────────────────────
    let mut buckets: HashMap<&str, AreaBucket<'_>> = HashMap::new();
    let mut completed_by_area: HashMap<&str, u64> = HashMap::new();
    let mut active = 0u64;
    let mut completed = archive.count;
    let mut wait_sum = archive.total_wait_time;
    let mut system_sum = archive.total_system_time;

    for &p in &patients {
        let area = p.current_area.as_str();
        match p.status {
            PatientStatus::Completed => {
                completed += 1;
                wait_sum += p.metrics.total_wait_time;
                system_sum += p.metrics.total_system_time;
                *completed_by_area.entry(area).or_default() += 1;
            }
            status => {
                active += 1;
                let bucket = buckets.entry(area).or_default();
                bucket.occupancy += 1;
                match status {
                    PatientStatus::Waiting => bucket.waiting.push(p),
                    PatientStatus::InService => bucket.in_service.push(p),
                    _ => {}
                }
            }
        }
    }

    // ── Pass 2: per area ──────────────────────────────────────────────────
    let empty = AreaBucket::default();
    let per_area = |area: &Area| {
        let id = area.id.as_str();
        let throughput = completed_by_area.get(id).copied().unwrap_or(0)
            + archive.by_last_area.get(id).copied().unwrap_or(0);
        area_metrics(area, buckets.get(id).unwrap_or(&empty), throughput, now)
    };

    #[cfg(not(feature = "parallel"))]
    let area_list: Vec<AreaMetrics> = areas.iter().map(per_area).collect();

    #[cfg(feature = "parallel")]
    let area_list: Vec<AreaMetrics> = {
        use rayon::prelude::*;
        areas.par_iter().map(per_area).collect()
    };

    let utilization_rate = if area_list.is_empty() {
        0.0
    } else {
        area_list.iter().map(|m| m.utilization_rate).sum::<f64>() / area_list.len() as f64
    };
    let by_area = area_list.into_iter().map(|m| (m.area_id.clone(), m)).collect();

    // ── Pass 3: per patient type ──────────────────────────────────────────
    let by_patient_type = type_metrics(&patients, archive);

    let (avg_wait_time, avg_system_time) = if completed > 0 {
        (to_minutes(wait_sum / completed as f64), to_minutes(system_sum / completed as f64))
    } else {
        (0.0, 0.0)
    };

    SystemMetrics {
        timestamp: now,
        global: GlobalMetrics {
            active_patients: active,
            total_processed: completed,
            avg_wait_time,
            avg_system_time,
            throughput: completed as f64 / now.as_minutes().max(1.0),
            utilization_rate,
        },
        by_area,
        by_patient_type,
    }
}

fn area_metrics(area: &Area, bucket: &AreaBucket<'_>, throughput: u64, now: SimTime) -> AreaMetrics {
    let capacity = area.capacity();
    let queue = bucket.waiting.len();
    let served = bucket.in_service.len();

    let utilization_rate = if capacity == 0 { 0.0 } else { served as f64 / capacity as f64 };

    let avg_wait_time = if queue == 0 {
        0.0
    } else {
        let total: f64 = bucket
            .waiting
            .iter()
            .map(|p| now.since(p.timestamps.current_area_entry) as f64)
            .sum();
        to_minutes(total / queue as f64)
    };

    let avg_service_time = if served == 0 {
        0.0
    } else {
        let total: f64 = bucket.in_service.iter().map(|p| p.service_elapsed(now) as f64).sum();
        to_minutes(total / served as f64)
    };

    AreaMetrics {
        area_id: area.id.clone(),
        current_occupancy: bucket.occupancy,
        capacity,
        utilization_rate,
        avg_wait_time,
        avg_service_time,
        queue_length: queue as u32,
        throughput,
        status: AreaStatus::from_occupancy(bucket.occupancy, capacity),
    }
}

/// Per-type running means, resumed from the archive and continued over the
/// live roster in admission order.  See [`TypeRunning`].
fn type_metrics(
    patients: &[&Patient],
    archive:  &ArchiveSummary,
) -> BTreeMap<PatientTypeId, PatientTypeMetrics> {
    let mut running: BTreeMap<PatientTypeId, TypeRunning> = archive.by_type.clone();
    for p in patients {
        running.entry(p.patient_type.id.clone()).or_default().push(p);
    }

    running
        .into_iter()
        .filter(|(_, r)| r.count > 0)
        .map(|(id, r)| {
            let entry = PatientTypeMetrics {
                patient_type:    id.clone(),
                count:           r.count,
                avg_system_time: r.avg_system_time,
                avg_wait_time:   r.avg_wait_time,
                completion_rate: r.completion_rate,
            };
            (id, entry)
        })
        .collect()
}

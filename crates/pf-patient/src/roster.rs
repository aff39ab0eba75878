//! The `Roster`: every patient the engine knows about, keyed by handle.
//!
//! # Ordering
//!
//! Patients live in a `BTreeMap<PatientId, Patient>` and ids are allocated
//! sequentially, so iteration is always admission order.  The tick loop
//! relies on this to be deterministic.
//!
//! # Retention
//!
//! With [`Retention::Unbounded`] completed patients stay forever.  With
//! [`Retention::LastCompleted(n)`](Retention::LastCompleted) completions are
//! folded into the [`ArchiveSummary`] once more than `n` are held.
//!
//! A completion is only archived once every earlier patient of the same type
//! has been archived too, so each type's archive is a prefix of its admission
//! order.  That keeps the per-type running means replayable: the calculator
//! resumes from the archived [`TypeRunning`] and continues over the live
//! roster.  While an older patient of the type is still active, later
//! completions of that type stay held, even beyond `n`.

use std::collections::{BTreeMap, VecDeque};

use pf_core::{AreaId, PatientId, PatientTypeId, Retention, MS_PER_MINUTE};

use crate::Patient;

// ── ArchiveSummary ────────────────────────────────────────────────────────────

/// Running means for one patient type, in minutes.
///
/// Each patient updates `avg = (avg × (n − 1) + value) / n`, where `n` counts
/// every patient of the type seen so far, completed or not.  Only completed
/// patients move the means.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TypeRunning {
    pub count:           u64,
    pub avg_system_time: f64,
    pub avg_wait_time:   f64,
    pub completion_rate: f64,
}

impl TypeRunning {
    pub fn push(&mut self, patient: &Patient) {
        self.count += 1;
        if !patient.is_completed() {
            return;
        }
        let n = self.count as f64;
        let system = patient.metrics.total_system_time / MS_PER_MINUTE;
        let wait = patient.metrics.total_wait_time / MS_PER_MINUTE;
        self.avg_system_time = (self.avg_system_time * (n - 1.0) + system) / n;
        self.avg_wait_time = (self.avg_wait_time * (n - 1.0) + wait) / n;
        self.completion_rate = (self.completion_rate * (n - 1.0) + 1.0) / n;
    }
}

/// Aggregates of every completed patient evicted from the roster.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ArchiveSummary {
    pub count:             u64,
    pub total_wait_time:   f64,
    pub total_system_time: f64,
    /// Completions credited to the last area each patient occupied.
    pub by_last_area:      BTreeMap<AreaId, u64>,
    /// Running means over the archived prefix of each type.
    pub by_type:           BTreeMap<PatientTypeId, TypeRunning>,
}

impl ArchiveSummary {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Fold one completed patient into the totals.
    pub fn fold(&mut self, patient: &Patient) {
        self.count += 1;
        self.total_wait_time += patient.metrics.total_wait_time;
        self.total_system_time += patient.metrics.total_system_time;
        *self.by_last_area.entry(patient.current_area.clone()).or_default() += 1;
        self.by_type.entry(patient.patient_type.id.clone()).or_default().push(patient);
    }
}

// ── Roster ────────────────────────────────────────────────────────────────────

/// Held patients of one type, in id order.  The first `ready` are completed
/// and already queued for archiving.
#[derive(Clone, Debug, Default)]
struct TypeQueue {
    held:  VecDeque<PatientId>,
    ready: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Roster {
    patients:       BTreeMap<PatientId, Patient>,
    next_id:        u32,
    held_completed: usize,
    retention:      Retention,
    archive:        ArchiveSummary,
    // Only maintained under `LastCompleted`.
    type_queues:    BTreeMap<PatientTypeId, TypeQueue>,
    /// Completions that may be archived, in the order they became eligible.
    archivable:     VecDeque<PatientId>,
}

impl Roster {
    pub fn new(retention: Retention) -> Self {
        Self { retention, ..Self::default() }
    }

    /// Allocate the next handle and insert the patient built for it.
    pub fn insert_with(&mut self, build: impl FnOnce(PatientId) -> Patient) -> PatientId {
        let id = PatientId(self.next_id);
        self.next_id += 1;
        let patient = build(id);
        let type_id = patient.patient_type.id.clone();
        let completed = patient.is_completed();
        self.patients.insert(id, patient);

        if self.bounded() {
            self.type_queues.entry(type_id.clone()).or_default().held.push_back(id);
        }
        if completed {
            self.held_completed += 1;
            self.promote(&type_id);
            self.enforce_retention();
        }
        id
    }

    /// Note that `id` has just completed, archiving old completions if the
    /// retention limit is exceeded.  Call once per completion.  Returns the
    /// number archived.
    pub fn record_completion(&mut self, id: PatientId) -> usize {
        let Some(type_id) = self
            .patients
            .get(&id)
            .filter(|p| p.is_completed())
            .map(|p| p.patient_type.id.clone())
        else {
            return 0;
        };
        self.held_completed += 1;
        self.promote(&type_id);
        self.enforce_retention()
    }

    fn bounded(&self) -> bool {
        matches!(self.retention, Retention::LastCompleted(_))
    }

    /// Queue the completed head run of `type_id` for archiving.
    fn promote(&mut self, type_id: &PatientTypeId) {
        let Some(queue) = self.type_queues.get_mut(type_id) else {
            return;
        };
        while let Some(&next) = queue.held.get(queue.ready) {
            if !self.patients.get(&next).is_some_and(Patient::is_completed) {
                break;
            }
            self.archivable.push_back(next);
            queue.ready += 1;
        }
    }

    fn enforce_retention(&mut self) -> usize {
        let Retention::LastCompleted(keep) = self.retention else {
            return 0;
        };
        let mut evicted = 0;
        while self.held_completed > keep {
            let Some(oldest) = self.archivable.pop_front() else { break };
            let Some(patient) = self.patients.remove(&oldest) else { continue };
            let type_id = &patient.patient_type.id;
            if let Some(queue) = self.type_queues.get_mut(type_id) {
                queue.held.pop_front();
                queue.ready = queue.ready.saturating_sub(1);
                if queue.held.is_empty() {
                    self.type_queues.remove(type_id);
                }
            }
            self.archive.fold(&patient);
            self.held_completed -= 1;
            evicted += 1;
        }
        evicted
    }

    /// Rebuild the per-type queues from the held patients.
    fn rebuild_queues(&mut self) {
        self.type_queues.clear();
        self.archivable.clear();
        if !self.bounded() {
            return;
        }
        for (&id, patient) in &self.patients {
            self.type_queues
                .entry(patient.patient_type.id.clone())
                .or_default()
                .held
                .push_back(id);
        }
        let types: Vec<PatientTypeId> = self.type_queues.keys().cloned().collect();
        for type_id in &types {
            self.promote(type_id);
        }
    }

    /// Change the retention policy, applying it immediately.
    pub fn set_retention(&mut self, retention: Retention) -> usize {
        self.retention = retention;
        self.rebuild_queues();
        self.enforce_retention()
    }

    /// Drop every patient and the archive, and restart id allocation.
    pub fn clear(&mut self) {
        self.patients.clear();
        self.type_queues.clear();
        self.archivable.clear();
        self.held_completed = 0;
        self.archive = ArchiveSummary::default();
        self.next_id = 0;
    }

// ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn get(&self, id: PatientId) -> Option<&Patient> {
        self.patients.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        self.patients.get_mut(&id)
    }

    /// Patients in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Patient> {
        self.patients.values_mut()
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn archive(&self) -> &ArchiveSummary {
        &self.archive
    }

    /// Patients currently held (archived ones excluded).
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.patients.len() - self.held_completed
    }

    /// Completed patients ever, held or archived.
    pub fn completed_total(&self) -> u64 {
        self.held_completed as u64 + self.archive.count
    }
}

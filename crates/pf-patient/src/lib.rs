//! `pf-patient`: patient state and the roster that owns it.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`patient`]  | `Patient`, `PatientStatus`, `Timestamps`, `PathRecord`, metrics |
//! | [`movement`] | straight-line walking model (`walking_speed`, `advance_toward`) |
//! | [`roster`]   | `Roster` arena keyed by `PatientId`, `ArchiveSummary` ledger    |
//!
//! The engine is the only mutator of patient state; everything here is plain
//! data plus the bookkeeping needed to keep it consistent.

pub mod movement;
pub mod patient;
pub mod roster;

#[cfg(test)]
mod tests;

pub use movement::{advance_toward, walking_speed, Travel, BASE_SPEED_MPS, PRIORITY_SPEED_FACTOR};
pub use patient::{PathRecord, Patient, PatientMetrics, PatientStatus, Timestamps};
pub use roster::{ArchiveSummary, Roster, TypeRunning};

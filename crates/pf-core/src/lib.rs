//! `pf-core`: foundational types for the patient-flow simulator.
//!
//! This crate is a dependency of every other `pf-*` crate.  It has no `pf-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`/`serde_json`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`ids`]       | `PatientId`, `AreaId`, `PatientTypeId`, routing sentinels |
//! | [`geo`]       | `Point`: planar facility coordinates in metres           |
//! | [`time`]      | `SimTime` (ms), `SimClock`                                |
//! | [`rng`]       | `SimRng`, `UnitDraw`, `FixedDraws`                        |
//! | [`config`]    | `SimConfig` and its sub-sections                          |
//! | [`error`]     | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types and       |
//! |         | enables `SimConfig::from_json_*`.                            |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    ArrivalDistribution, BottleneckThresholds, Constraints, GenerationPattern,
    PatientGeneration, Randomness, ResidualRouting, Retention, SimConfig, TimeWindow,
};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{AreaId, PatientId, PatientTypeId, ENTRY, EXIT};
pub use rng::{FixedDraws, SimRng, UnitDraw};
pub use time::{SimClock, SimTime, MS_PER_MINUTE};

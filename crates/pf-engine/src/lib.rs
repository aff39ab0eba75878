//! `pf-engine`: the tick-driven patient-flow simulation.
//!
//! # Tick loop
//!
//! ```text
//! update(delta_ms):
//!   ① Clock   : advance the simulated clock by delta_ms.
//!   ② Load    : count in-service patients per area.
//!   ③ Step    : for each patient in ascending PatientId order:
//!                  fsm::step(patient, ctx)  → Step   (pure)
//!                  apply Step                        (mutates patient + load;
//!                                                    Finish draws the next area)
//!   ④ Retain  : record completions; evict into the archive past the limit.
//!   ⑤ Observe : on_tick_end(report), on_snapshot(roster).
//! ```
//!
//! The caller drives the loop (once per frame or in a batch) and must not
//! call into the engine concurrently.  `get_metrics` / `get_bottlenecks` are
//! pure reads between ticks.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Per-area metrics on Rayon's thread pool.                 |
//! | `fx-hash`  | FxHash for the per-tick area load index.                 |
//! | `serde`    | serde derives on patients, metrics, and config types.    |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pf_core::SimConfig;
//! use pf_engine::EngineBuilder;
//!
//! let mut engine = EngineBuilder::new(SimConfig::default(), layout.graph())
//!     .catalog(catalog)
//!     .build()?;
//! engine.add_patient_by_id("walk-in")?;
//! for _ in 0..600 {
//!     engine.update(1_000);
//! }
//! let metrics = engine.get_metrics();
//! ```

pub mod arrivals;
pub mod builder;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod observer;
pub mod routing;


pub use arrivals::ArrivalGenerator;
pub use builder::EngineBuilder;
pub use engine::SimulationEngine;
pub use error::{EngineError, EngineResult};
pub use fsm::{step, AreaLoad, SkipReason, Step, TickContext};
pub use observer::{EngineObserver, NoopObserver, TickReport};
pub use routing::decide_next_area;

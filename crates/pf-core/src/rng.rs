//! Deterministic random sources for routing and arrivals.
//!
//! # Determinism strategy
//!
//! The engine never draws from a global source.  Routing decisions take an
//! explicit [`UnitDraw`] so tests can substitute a scripted sequence
//! ([`FixedDraws`]) and production runs use a seeded [`SimRng`]:
//!
//! - Same seed + same `update` delta sequence ⇒ bit-identical rosters.
//! - Subsystems that need their own stream (the arrival generator) derive a
//!   child with [`SimRng::child`] so they never perturb routing draws.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── UnitDraw ──────────────────────────────────────────────────────────────────

/// A source of uniform draws in `[0, 1)`.
///
/// This is the only randomness the routing step consumes.
pub trait UnitDraw {
    /// Next uniform value in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level seeded RNG.
///
/// Used only in single-threaded contexts.  If a subsystem needs its own
/// stream, derive it with [`child`](Self::child).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand`/`rand_distr`
    /// distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }
}

impl UnitDraw for SimRng {
    #[inline]
    fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

impl std::fmt::Debug for SimRng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SimRng(..)")
    }
}

// ── FixedDraws ────────────────────────────────────────────────────────────────

/// A scripted draw sequence, replayed cyclically.
///
/// Useful for replaying a recorded run or pinning routing decisions in tests.
/// An empty script always yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct FixedDraws {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedDraws {
    /// Values are clamped into `[0, 1)`.
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let values = values
            .into_iter()
            .map(|v| v.clamp(0.0, 1.0 - f64::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UnitDraw for FixedDraws {
    fn unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

impl<D: UnitDraw + ?Sized> UnitDraw for &mut D {
    #[inline]
    fn unit(&mut self) -> f64 {
        (**self).unit()
    }
}

//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing count of simulated milliseconds held in
//! `SimTime`.  Every `update(delta)` call advances the `SimClock` by an
//! arbitrary number of milliseconds (one animation frame, scaled by the
//! configured speed), so unlike a fixed-resolution tick counter the clock
//! also records how many ticks have elapsed separately.
//!
//! Using integer milliseconds keeps elapsed-time arithmetic exact and makes
//! two runs with identical delta sequences bit-identical.  Area process and
//! wait times are authored in minutes; [`MS_PER_MINUTE`] converts.

use std::fmt;

/// Milliseconds per simulated minute.
pub const MS_PER_MINUTE: f64 = 60_000.0;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute simulated instant, in milliseconds since the clock was reset.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    #[inline]
    pub fn from_minutes(minutes: f64) -> SimTime {
        SimTime((minutes * MS_PER_MINUTE).round().max(0.0) as u64)
    }

    #[inline]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn as_minutes(self) -> f64 {
        self.0 as f64 / MS_PER_MINUTE
    }

    /// Milliseconds elapsed from `earlier` to `self`; zero if `earlier` is later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        SimTime(self.0 + rhs)
    }
}

impl std::ops::AddAssign<u64> for SimTime {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.0 / 1_000;
        let hours = total_secs / 3_600;
        let minutes = (total_secs % 3_600) / 60;
        let secs = total_secs % 60;
        write!(f, "{hours:02}:{minutes:02}:{secs:02}.{:03}", self.0 % 1_000)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// The engine's simulated clock.
///
/// Holds no heap data; `reset` returns it to the state `new` produces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// The current simulated instant.
    pub now: SimTime,
    /// Number of `advance` calls since the last reset.
    pub ticks: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by `delta_ms` simulated milliseconds (one tick).
    #[inline]
    pub fn advance(&mut self, delta_ms: u64) {
        self.now += delta_ms;
        self.ticks += 1;
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{} ({})", self.ticks, self.now)
    }
}

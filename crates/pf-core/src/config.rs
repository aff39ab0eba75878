//! Top-level simulation configuration.
//!
//! Typically loaded from a JSON file by the application crate (field names
//! are camelCase, every field has a default) and handed to the engine
//! builder.  Only `speed`, `constraints.enforceCapacity`, `seed`,
//! `residualRouting`, `retention`, `thresholds` and `patientGeneration`
//! change engine behaviour; the rest is carried for the collaborator.

use std::time::Duration;

use crate::{CoreError, CoreResult, PatientTypeId};

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Constraints {
    pub max_patients_per_area: bool,
    /// When `false`, waiting patients are admitted to service regardless of
    /// how many are already in service.
    pub enforce_capacity: bool,
    pub allow_queueing: bool,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_patients_per_area: true,
            enforce_capacity:      true,
            allow_queueing:        true,
        }
    }
}

/// Variance knobs carried for the collaborator.  Routing draws are plain
/// uniform `[0, 1)` regardless of these values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Randomness {
    pub processing_time_variance: f64,
    pub arrival_time_variance:    f64,
    pub path_decision_randomness: f64,
}

impl Default for Randomness {
    fn default() -> Self {
        Self {
            processing_time_variance: 0.2,
            arrival_time_variance:    0.15,
            path_decision_randomness: 0.1,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ArrivalDistribution {
    /// Evenly spaced arrivals at exactly `rate` per hour.
    #[default]
    Constant,
    /// Exponential inter-arrival times with mean `1 / rate`.
    Poisson,
    /// Normally distributed inter-arrival times around `1 / rate`.
    Normal,
}

/// A window (in simulated minutes) during which a pattern's rate is scaled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TimeWindow {
    pub start:           f64,
    pub end:             f64,
    pub rate_multiplier: f64,
}

/// Automatic injection of one patient type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GenerationPattern {
    pub patient_type: PatientTypeId,
    /// Mean arrivals per simulated hour.
    pub rate:         f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub distribution: ArrivalDistribution,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time_windows: Vec<TimeWindow>,
}

impl GenerationPattern {
    /// Effective rate (per hour) at `minute`: the first matching window's
    /// multiplier applies.
    pub fn rate_at(&self, minute: f64) -> f64 {
        let multiplier = self
            .time_windows
            .iter()
            .find(|w| minute >= w.start && minute < w.end)
            .map_or(1.0, |w| w.rate_multiplier);
        (self.rate * multiplier).max(0.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PatientGeneration {
    pub enabled:  bool,
    pub patterns: Vec<GenerationPattern>,
}

impl Default for PatientGeneration {
    fn default() -> Self {
        Self { enabled: true, patterns: Vec::new() }
    }
}

/// What happens when an area's outgoing probabilities sum to less than one
/// and the draw lands in the uncovered mass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ResidualRouting {
    /// The patient is discharged from the area.
    #[default]
    Exit,
    /// The draw is scaled by the edge sum, so some edge always fires.
    Renormalize,
}

/// How many completed patients the roster keeps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Retention {
    /// Completed patients are never removed.
    #[default]
    Unbounded,
    /// Keep the most recent N completions; older ones are folded into the
    /// roster's archive summary.
    LastCompleted(usize),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct BottleneckThresholds {
    /// Utilization at or above which an area scores +2.
    pub utilization:     f64,
    /// Average-wait / expected-wait ratio at or above which an area scores +3.
    pub wait_time_ratio: f64,
    /// Queue length, as a multiple of capacity, at or above which an area scores +2.
    pub queue_factor:    f64,
}

impl Default for BottleneckThresholds {
    fn default() -> Self {
        Self { utilization: 0.85, wait_time_ratio: 1.5, queue_factor: 1.0 }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct SimConfig {
    /// Planned session length in simulated minutes.  Informational.
    pub duration: f64,

    /// Multiplier applied to real elapsed time before it reaches `update`.
    pub speed: f64,

    pub patient_generation: PatientGeneration,
    pub randomness:         Randomness,
    pub constraints:        Constraints,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    pub residual_routing: ResidualRouting,
    pub retention:        Retention,
    pub thresholds:       BottleneckThresholds,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            duration:           8.0 * 60.0,
            speed:              1.0,
            patient_generation: PatientGeneration::default(),
            randomness:         Randomness::default(),
            constraints:        Constraints::default(),
            seed:               42,
            residual_routing:   ResidualRouting::default(),
            retention:          Retention::default(),
            thresholds:         BottleneckThresholds::default(),
        }
    }
}

impl SimConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(CoreError::Config(format!(
                "speed must be a finite non-negative multiplier, got {}",
                self.speed
            )));
        }
        let t = &self.thresholds;
        for (name, value) in [
            ("thresholds.utilization", t.utilization),
            ("thresholds.waitTimeRatio", t.wait_time_ratio),
            ("thresholds.queueFactor", t.queue_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Config(format!("{name} must be finite and >= 0, got {value}")));
            }
        }
        for p in &self.patient_generation.patterns {
            if !p.rate.is_finite() || p.rate < 0.0 {
                return Err(CoreError::Config(format!(
                    "generation rate for {} must be finite and >= 0, got {}",
                    p.patient_type, p.rate
                )));
            }
        }
        if self.retention == Retention::LastCompleted(0) {
            return Err(CoreError::Config("retention.lastCompleted must be at least 1".into()));
        }
        Ok(())
    }

    /// Simulated milliseconds corresponding to `real` elapsed time at the
    /// configured `speed`.
    pub fn scaled_delta(&self, real: Duration) -> u64 {
        (real.as_secs_f64() * 1_000.0 * self.speed).round().max(0.0) as u64
    }

    /// Parse and validate a JSON configuration document.
    #[cfg(feature = "serde")]
    pub fn from_json_str(s: &str) -> CoreResult<Self> {
        let config: SimConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`from_json_str`](Self::from_json_str) but reads from any source.
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> CoreResult<Self> {
        let config: SimConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

//! Automatic patient arrivals from `patientGeneration.patterns`.
//!
//! Each pattern is an independent arrival stream.  The stream keeps the
//! absolute time of its next arrival and samples the gap after each one from
//! the pattern's distribution at the rate in effect at that moment:
//!
//! | Distribution | Gap between arrivals (mean `m = 60 min / rate`)       |
//! |--------------|-------------------------------------------------------|
//! | `constant`   | exactly `m`                                           |
//! | `poisson`    | exponential with mean `m`                             |
//! | `normal`     | normal around `m`, std `m × arrivalTimeVariance`      |
//!
//! A stream whose rate is zero stays idle and is re-checked on every call,
//! so time windows can switch it on later.

use rand_distr::{Distribution, Exp, Normal};

use pf_core::{ArrivalDistribution, GenerationPattern, PatientGeneration, PatientTypeId, SimRng, SimTime};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Upper bound on arrivals one stream may produce per call.
const MAX_ARRIVALS_PER_CALL: usize = 10_000;

/// Shortest normal-distribution gap, as a fraction of the mean.
const MIN_GAP_FRACTION: f64 = 0.01;

#[derive(Debug)]
struct Stream {
    pattern: GenerationPattern,
    next_at: Option<f64>,
}

#[derive(Debug)]
pub struct ArrivalGenerator {
    streams:  Vec<Stream>,
    variance: f64,
    rng:      SimRng,
}

impl ArrivalGenerator {
    /// `variance` is the coefficient of variation for `normal` gaps.
    pub fn new(generation: &PatientGeneration, variance: f64, rng: SimRng) -> Self {
        let streams = generation
            .patterns
            .iter()
            .map(|p| Stream { pattern: p.clone(), next_at: None })
            .collect();
        Self { streams, variance: variance.max(0.0), rng }
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Forget scheduled arrivals; streams restart from the next call's window.
    pub fn reset(&mut self) {
        for s in &mut self.streams {
            s.next_at = None;
        }
    }

    /// Patient types arriving in `(from, to]`, in arrival-time order.  Ties
    /// keep pattern order.
    pub fn arrivals(&mut self, from: SimTime, to: SimTime) -> Vec<PatientTypeId> {
        let start = from.as_millis() as f64;
        let end = to.as_millis() as f64;
        let rng = &mut self.rng;
        let variance = self.variance;

        let mut due: Vec<(f64, usize)> = Vec::new();
        for (i, stream) in self.streams.iter_mut().enumerate() {
            if stream.next_at.is_none() {
                stream.next_at = gap_ms(&stream.pattern, start, variance, rng).map(|g| start + g);
            }
            let mut budget = MAX_ARRIVALS_PER_CALL;
            while let Some(at) = stream.next_at {
                if at > end {
                    break;
                }
                if budget == 0 {
                    log::warn!(
                        "arrival stream for {} capped at {MAX_ARRIVALS_PER_CALL} arrivals in one call",
                        stream.pattern.patient_type
                    );
                    break;
                }
                budget -= 1;
                due.push((at, i));
                stream.next_at = gap_ms(&stream.pattern, at, variance, rng).map(|g| at + g);
            }
        }

        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter()
            .map(|(_, i)| self.streams[i].pattern.patient_type.clone())
            .collect()
    }
}

/// Gap to the next arrival of `pattern` after `at_ms`; `None` while the
/// effective rate is zero.
fn gap_ms(pattern: &GenerationPattern, at_ms: f64, variance: f64, rng: &mut SimRng) -> Option<f64> {
    let rate = pattern.rate_at(at_ms / pf_core::MS_PER_MINUTE);
    if rate <= 0.0 || !rate.is_finite() {
        return None;
    }
    let mean = MS_PER_HOUR / rate;
    let gap = match pattern.distribution {
        ArrivalDistribution::Constant => mean,
        ArrivalDistribution::Poisson => Exp::new(1.0 / mean).ok()?.sample(rng.inner()),
        ArrivalDistribution::Normal => {
            let sampled = Normal::new(mean, mean * variance).ok()?.sample(rng.inner());
            sampled.max(mean * MIN_GAP_FRACTION)
        }
    };
    // Sub-millisecond gaps would not advance the stream.
    Some(gap.max(1.0))
}

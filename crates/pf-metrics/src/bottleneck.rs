//! The bottleneck detector.
//!
//! Each area is scored from four indicators against the configured
//! thresholds; areas scoring zero are dropped.  Recommendations come from a
//! separate set of fixed magnitude checks, so an area can score without
//! getting advice and vice versa.
//!
//! | Indicator            | Score check                              | Points |
//! |----------------------|------------------------------------------|--------|
//! | `utilization`        | `>= thresholds.utilization`              | 2      |
//! | `wait_time_ratio`    | `>= thresholds.wait_time_ratio`          | 3      |
//! | `queue_length`       | `>= capacity × thresholds.queue_factor`  | 2      |
//! | `throughput_deficit` | `>= 0.5`                                 | 1      |

use std::collections::BTreeMap;

use pf_core::{AreaId, BottleneckThresholds, SimTime};
use pf_facility::Area;

use crate::{AreaMetrics, Bottleneck, Indicators, Severity};

const DEFICIT_SCORE_LEVEL: f64 = 0.5;

/// Inclusive: a utilization of exactly 0.9 already gets capacity advice.
const UTILIZATION_ADVICE_LEVEL: f64 = 0.9;
const WAIT_RATIO_ADVICE_LEVEL: f64 = 2.0;
const DEFICIT_ADVICE_LEVEL: f64 = 0.3;

/// Rank areas by pressure.
///
/// Areas are visited in `areas` order and those without an entry in
/// `by_area` are skipped.  The result is sorted by descending severity; the
/// sort is stable, so equal severities keep `areas` order.
pub fn detect_bottlenecks(
    areas:      &[Area],
    by_area:    &BTreeMap<AreaId, AreaMetrics>,
    thresholds: &BottleneckThresholds,
    timestamp:  SimTime,
) -> Vec<Bottleneck> {
    let mut found: Vec<Bottleneck> = areas
        .iter()
        .filter_map(|area| {
            let metrics = by_area.get(area.id.as_str())?;
            let indicators = indicators(area, metrics);
            let severity = severity_for_score(score(area, &indicators, thresholds))?;
            Some(Bottleneck {
                area_id: area.id.clone(),
                severity,
                indicators,
                recommendations: recommendations(area, &indicators),
                impacted_patient_types: Vec::new(),
                timestamp,
            })
        })
        .collect();

    found.sort_by(|a, b| b.severity.cmp(&a.severity));
    found
}

fn indicators(area: &Area, metrics: &AreaMetrics) -> Indicators {
    let capacity = area.capacity();
    let expected_wait = area.expected_wait_time();
    Indicators {
        utilization:        metrics.utilization_rate,
        wait_time_ratio:    if expected_wait == 0.0 { 0.0 } else { metrics.avg_wait_time / expected_wait },
        queue_length:       metrics.queue_length,
        throughput_deficit: if capacity == 0 {
            0.0
        } else {
            (1.0 - metrics.throughput as f64 / capacity as f64).max(0.0)
        },
    }
}

/// Integer pressure score.  All four checks are independent.
pub fn score(area: &Area, indicators: &Indicators, thresholds: &BottleneckThresholds) -> u32 {
    let mut score = 0;
    if indicators.utilization >= thresholds.utilization {
        score += 2;
    }
    if indicators.wait_time_ratio >= thresholds.wait_time_ratio {
        score += 3;
    }
    if indicators.queue_length as f64 >= area.capacity() as f64 * thresholds.queue_factor {
        score += 2;
    }
    if indicators.throughput_deficit >= DEFICIT_SCORE_LEVEL {
        score += 1;
    }
    score
}

/// `None` for a zero score: the area is not a bottleneck.
pub fn severity_for_score(score: u32) -> Option<Severity> {
    match score {
        0 => None,
        1..=2 => Some(Severity::Low),
        3..=4 => Some(Severity::Medium),
        5..=6 => Some(Severity::High),
        _ => Some(Severity::Critical),
    }
}

fn recommendations(area: &Area, indicators: &Indicators) -> Vec<String> {
    let mut out = Vec::new();
    if indicators.utilization >= UTILIZATION_ADVICE_LEVEL {
        let name = if area.name.is_empty() { area.id.as_str() } else { area.name.as_str() };
        out.push(format!("Review capacity of {name}"));
        out.push("Evaluate staff reinforcement".to_owned());
    }
    if indicators.wait_time_ratio > WAIT_RATIO_ADVICE_LEVEL {
        out.push("Optimize care protocols".to_owned());
        out.push("Analyze alternative flow routes".to_owned());
    }
    if indicators.queue_length > area.capacity() {
        out.push("Enable auxiliary waiting area".to_owned());
    }
    if indicators.throughput_deficit > DEFICIT_ADVICE_LEVEL {
        out.push("Reassess allocation of critical equipment and resources".to_owned());
    }
    out
}

//! `pf-metrics`: pure functions from roster and facility state to reports.
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`snapshot`]    | `SystemMetrics`, `AreaMetrics`, `PatientTypeMetrics`, `Bottleneck` |
//! | [`calculator`]  | `calculate_metrics`, `calculate_metrics_with_archive`       |
//! | [`bottleneck`]  | `detect_bottlenecks`, scoring and recommendations           |
//! | [`history`]     | `MetricsHistory`: bounded ring of timestamped snapshots    |
//!
//! Nothing here holds state between calls except `MetricsHistory`, which the
//! caller owns.  All times in reports are minutes unless a field says
//! otherwise; `timestamp` fields are simulated milliseconds.

pub mod bottleneck;
pub mod calculator;
pub mod history;
pub mod snapshot;

#[cfg(test)]
mod tests;

pub use bottleneck::{detect_bottlenecks, score, severity_for_score};
pub use calculator::{calculate_metrics, calculate_metrics_with_archive};
pub use history::{unix_millis, MetricsHistory, MetricsSnapshot, DEFAULT_HISTORY_LEN};
pub use snapshot::{
    AreaMetrics, AreaStatus, Bottleneck, GlobalMetrics, Indicators, PatientTypeMetrics, Severity,
    SystemMetrics,
};

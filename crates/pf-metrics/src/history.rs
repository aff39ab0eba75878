//! A bounded ring of recent metrics snapshots for trend display.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::SystemMetrics;

/// Snapshots kept by [`MetricsHistory::default`].
pub const DEFAULT_HISTORY_LEN: usize = 50;

/// A metrics snapshot tagged with the wall-clock time it was taken.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MetricsSnapshot {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics:      SystemMetrics,
    /// Unix epoch milliseconds.
    pub generated_at: u64,
}

impl MetricsSnapshot {
    pub fn now(metrics: SystemMetrics) -> Self {
        Self { metrics, generated_at: unix_millis() }
    }
}

/// Wall-clock milliseconds since the Unix epoch; zero if the clock is before it.
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Clone, Debug)]
pub struct MetricsHistory {
    capacity:  usize,
    snapshots: VecDeque<MetricsSnapshot>,
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LEN)
    }
}

impl MetricsHistory {
    /// A history holding at most `capacity` snapshots (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, snapshots: VecDeque::with_capacity(capacity) }
    }

    /// Stamp `metrics` with the current wall-clock time and record it.
    pub fn record(&mut self, metrics: SystemMetrics) -> &MetricsSnapshot {
        self.push(MetricsSnapshot::now(metrics))
    }

    /// Record a snapshot, dropping the oldest when full.
    pub fn push(&mut self, snapshot: MetricsSnapshot) -> &MetricsSnapshot {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn latest(&self) -> Option<&MetricsSnapshot> {
        self.snapshots.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MetricsSnapshot> {
        self.snapshots.iter()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

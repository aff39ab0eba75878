//! Straight-line walking between area positions.
//!
//! No pathfinding and no collisions: a walking patient moves along the
//! segment from its current position to the target area's position.

use pf_core::Point;

/// Base walking speed in metres per second.
pub const BASE_SPEED_MPS: f64 = 1.2;

/// Speed bonus per unit of patient-type priority.
pub const PRIORITY_SPEED_FACTOR: f64 = 0.15;

/// Walking speed for a patient of the given priority, in m/s.
#[inline]
pub fn walking_speed(priority: f64) -> f64 {
    BASE_SPEED_MPS * (1.0 + priority * PRIORITY_SPEED_FACTOR)
}

/// Outcome of one tick of walking.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Travel {
    /// The remaining distance fit within this tick's step.
    Arrived,
    /// Still walking; the new position.
    Moved(Point),
}

/// Advance `from` toward `target` by `speed_mps × delta_secs` metres.
pub fn advance_toward(from: Point, target: Point, speed_mps: f64, delta_secs: f64) -> Travel {
    let distance = from.distance_m(target);
    let step = speed_mps * delta_secs;
    if distance <= step {
        Travel::Arrived
    } else {
        Travel::Moved(from.lerp(target, step / distance))
    }
}

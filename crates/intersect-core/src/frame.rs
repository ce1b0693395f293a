//! Per-tick sensor input.
//!
//! Counts are signed on purpose: a misbehaving upstream counter must be
//! representable so the scheduler can reject it instead of the type silently
//! hiding the fault.

use serde::{Deserialize, Serialize};

/// What the sensors on one lane observed during a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LaneReading {
    /// Vehicles currently visible in the lane.
    pub vehicles: i64,
    /// Whether an emergency vehicle was detected above threshold.
    pub emergency: bool,
}

impl LaneReading {
    pub fn new(vehicles: i64, emergency: bool) -> Self {
        Self {
            vehicles,
            emergency,
        }
    }
}

/// One tick's worth of readings, ordered by lane index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SensorFrame {
    pub counts: Vec<i64>,
    pub emergency: Vec<bool>,
}

impl SensorFrame {
    pub fn new(counts: Vec<i64>, emergency: Vec<bool>) -> Self {
        Self { counts, emergency }
    }

    /// Split per-lane readings into the two parallel vectors the scheduler
    /// consumes.
    pub fn from_readings(readings: &[LaneReading]) -> Self {
        Self {
            counts: readings.iter().map(|r| r.vehicles).collect(),
            emergency: readings.iter().map(|r| r.emergency).collect(),
        }
    }
}

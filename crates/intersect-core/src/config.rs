//! Scheduler timing parameters.
//!
//! All durations are in ticks. The driver decides how long a tick is; the
//! stock controller runs roughly one tick per second of simulated time.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of approaches at a standard four-way intersection.
pub const DEFAULT_LANE_COUNT: usize = 4;

/// What the scheduler reports as the priority lane once an emergency ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyLanePolicy {
    /// The recovery tick resets the priority lane to `None`. A reported lane
    /// always means an emergency was granted on the most recent tick.
    #[default]
    ClearOnRecovery,
    /// The last granted lane keeps being reported until a new emergency
    /// overwrites it, even while the intersection cycles normally.
    RetainUntilOverwritten,
}

/// Immutable configuration for a [`crate::scheduler::Scheduler`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Number of lanes. Fixed for the lifetime of the scheduler.
    pub lane_count: usize,
    /// Green length used at startup and whenever no vehicles are observed.
    pub green_duration: u32,
    /// Length of every yellow clearing phase.
    pub yellow_duration: u32,
    /// Shortest adaptive green. Also the floor that prevents starvation.
    pub min_green: u32,
    /// Longest adaptive green, and the length of an emergency grant.
    pub max_green: u32,
    pub emergency_lane_policy: EmergencyLanePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lane_count: DEFAULT_LANE_COUNT,
            green_duration: 10,
            yellow_duration: 3,
            min_green: 5,
            max_green: 15,
            emergency_lane_policy: EmergencyLanePolicy::default(),
        }
    }
}

impl SchedulerConfig {
    /// Check that the parameters describe a cycle that can actually run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.min_green == 0 {
            return Err(ConfigError::ZeroMinGreen);
        }
        if self.min_green > self.max_green {
            return Err(ConfigError::MinAboveMax {
                min_green: self.min_green,
                max_green: self.max_green,
            });
        }
        if self.yellow_duration == 0 {
            return Err(ConfigError::ZeroYellow);
        }
        Ok(())
    }

    /// Builder-style override of the lane count.
    pub fn with_lane_count(mut self, lane_count: usize) -> Self {
        self.lane_count = lane_count;
        self
    }

    /// Builder-style override of the emergency-lane reporting policy.
    pub fn with_emergency_lane_policy(mut self, policy: EmergencyLanePolicy) -> Self {
        self.emergency_lane_policy = policy;
        self
    }
}

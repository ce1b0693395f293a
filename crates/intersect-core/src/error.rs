//! Error types for scheduler construction and per-tick input validation.

/// A sensor frame that violates the scheduler's input contract.
///
/// Returned from [`crate::scheduler::Scheduler::evaluate`] before any state
/// is touched, so a rejected frame never leaves the intersection half-updated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// The vehicle-count vector does not have one entry per lane.
    #[error("expected {expected} vehicle counts, got {got}")]
    LaneCountMismatch { expected: usize, got: usize },

    /// The emergency-flag vector does not have one entry per lane.
    #[error("expected {expected} emergency flags, got {got}")]
    EmergencyCountMismatch { expected: usize, got: usize },

    /// A sensor reported a negative number of vehicles.
    #[error("lane {lane} reported a negative vehicle count ({count})")]
    NegativeCount { lane: usize, count: i64 },
}

/// Timing parameters that cannot drive a well-formed cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("an intersection needs at least one lane")]
    NoLanes,

    #[error("min_green must be at least one tick")]
    ZeroMinGreen,

    #[error("min_green ({min_green}) exceeds max_green ({max_green})")]
    MinAboveMax { min_green: u32, max_green: u32 },

    #[error("yellow_duration must be at least one tick")]
    ZeroYellow,

    /// A restored state was captured from a scheduler with a different lane count.
    #[error("state has {state} lanes but the configuration has {config}")]
    LaneCountDiffers { state: usize, config: usize },

    /// A restored state points at a lane that does not exist.
    #[error("lane {lane} is out of range for {lane_count} lanes")]
    LaneOutOfRange { lane: usize, lane_count: usize },

    /// A restored state claims the active lane is red.
    #[error("the active lane must be green or yellow")]
    RedActiveLane,

    /// A restored state's emergency flag and priority lane disagree, or it
    /// keeps a stale priority lane the configured policy would have cleared.
    #[error(
        "inconsistent emergency state: mode {emergency_mode}, lane {emergency_lane:?}, active lane {active_lane}"
    )]
    InconsistentEmergency {
        emergency_mode: bool,
        emergency_lane: Option<usize>,
        active_lane: usize,
    },
}

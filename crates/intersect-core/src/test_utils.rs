//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::SchedulerConfig;
use crate::phase::Phase;
use crate::scheduler::Scheduler;
use crate::state::SchedulerState;

// ===========================================================================
// Flag vectors
// ===========================================================================

/// No emergency anywhere.
pub fn quiet(lanes: usize) -> Vec<bool> {
    vec![false; lanes]
}

/// Emergency reported on exactly one lane.
pub fn emergency_on(lanes: usize, lane: usize) -> Vec<bool> {
    let mut flags = quiet(lanes);
    flags[lane] = true;
    flags
}

// ===========================================================================
// Scheduler constructors
// ===========================================================================

/// Four lanes, stock timings.
pub fn default_scheduler() -> Scheduler {
    Scheduler::new(SchedulerConfig::default()).unwrap()
}

/// Stock four-lane scheduler positioned mid-cycle.
pub fn scheduler_at(active_lane: usize, phase: Phase, timer: i64) -> Scheduler {
    let config = SchedulerConfig::default();
    let state = SchedulerState::resume(config.lane_count, active_lane, phase, timer);
    Scheduler::from_state(config, state).unwrap()
}

// ===========================================================================
// Drivers
// ===========================================================================

/// Evaluate `ticks` emergency-free ticks with the same counts every tick.
pub fn run_quiet(scheduler: &mut Scheduler, counts: &[i64], ticks: usize) {
    let flags = quiet(scheduler.config().lane_count);
    for _ in 0..ticks {
        scheduler.evaluate(counts, &flags).unwrap();
    }
}

/// Count the non-red entries in the current light states.
pub fn non_red_lanes(scheduler: &Scheduler) -> usize {
    scheduler
        .light_states()
        .iter()
        .filter(|p| p.is_proceed())
        .count()
}

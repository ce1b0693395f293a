//! Scheduler state and state hashing.

use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// Ticks are the atomic unit of scheduler time.
pub type Ticks = u64;

// ---------------------------------------------------------------------------
// Scheduler state
// ---------------------------------------------------------------------------

/// The only mutable data the scheduler owns.
///
/// Fields are read through accessors; [`crate::scheduler::Scheduler`] is the
/// sole writer so the single-green invariant cannot be broken from outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerState {
    pub(crate) lane_count: usize,
    pub(crate) active_lane: usize,
    pub(crate) phase: Phase,
    /// Ticks left in the current phase. Signed because the countdown runs
    /// unconditionally and may dip below zero before the transition fires.
    pub(crate) timer: i64,
    pub(crate) emergency_mode: bool,
    pub(crate) emergency_lane: Option<usize>,
    /// Accepted evaluations so far.
    pub(crate) tick: Ticks,
}

impl SchedulerState {
    /// Startup state: lane 0 green for the base green duration.
    pub fn initial(lane_count: usize, green_duration: u32) -> Self {
        Self::resume(lane_count, 0, Phase::Green, i64::from(green_duration))
    }

    /// A non-emergency state positioned mid-cycle. Checked against the
    /// configuration by [`crate::scheduler::Scheduler::from_state`].
    pub fn resume(lane_count: usize, active_lane: usize, phase: Phase, timer: i64) -> Self {
        Self {
            lane_count,
            active_lane,
            phase,
            timer,
            emergency_mode: false,
            emergency_lane: None,
            tick: 0,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    /// The lane currently permitted to be non-red.
    pub fn active_lane(&self) -> usize {
        self.active_lane
    }

    /// Phase of the active lane.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ticks remaining in the current phase. Only meaningful while the
    /// active phase is Green or Yellow; it says nothing about red time.
    pub fn timer(&self) -> i64 {
        self.timer
    }

    /// True exactly while an emergency override is in effect.
    pub fn emergency_mode(&self) -> bool {
        self.emergency_mode
    }

    /// Lane holding the priority pass. See
    /// [`crate::config::EmergencyLanePolicy`] for what is reported once the
    /// emergency ends.
    pub fn emergency_lane(&self) -> Option<usize> {
        self.emergency_lane
    }

    pub fn tick(&self) -> Ticks {
        self.tick
    }

    /// Phase of every lane, in lane order. All red except the active lane.
    pub fn light_states(&self) -> Vec<Phase> {
        (0..self.lane_count)
            .map(|lane| {
                if lane == self.active_lane {
                    self.phase
                } else {
                    Phase::Red
                }
            })
            .collect()
    }

    /// Deterministic hash of everything an observer can see.
    pub fn hash(&self) -> u64 {
        let mut h = StateHash::new();
        h.write_u64(self.lane_count as u64);
        h.write_u64(self.active_lane as u64);
        h.write(&[self.phase.tag(), u8::from(self.emergency_mode)]);
        h.write_u64(self.timer as u64);
        match self.emergency_lane {
            Some(lane) => {
                h.write(&[1]);
                h.write_u64(lane as u64);
            }
            None => h.write(&[0]),
        }
        h.write_u64(self.tick);
        h.finish()
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A simple deterministic hash of scheduler state for replay verification.
///
/// Uses FNV-1a (64-bit). Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}

//! The phase scheduler: round-robin cycling with adaptive green and
//! emergency preemption.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{EmergencyLanePolicy, SchedulerConfig};
use crate::error::{ConfigError, InputError};
use crate::event::{EventLog, SignalEvent};
use crate::frame::SensorFrame;
use crate::phase::Phase;
use crate::state::{SchedulerState, Ticks};

// ---------------------------------------------------------------------------
// Adaptive green duration
// ---------------------------------------------------------------------------

/// Green length for `lane` given the counts observed this tick.
///
/// With no vehicles anywhere the base `green_duration` is returned unchanged.
/// Otherwise the lane gets `floor(share * green_duration * 2)` ticks, where
/// `share` is its fraction of all observed vehicles, clamped to
/// `[min_green, max_green]`. Computed in exact integer arithmetic.
pub fn adaptive_green_duration(config: &SchedulerConfig, counts: &[i64], lane: usize) -> u32 {
    let total: i128 = counts.iter().map(|&c| i128::from(c)).sum();
    if total <= 0 {
        return config.green_duration;
    }
    let lane_count = i128::from(counts.get(lane).copied().unwrap_or(0));
    let scaled = lane_count * i128::from(config.green_duration) * 2 / total;
    let clamped = scaled.clamp(i128::from(config.min_green), i128::from(config.max_green));
    // Clamped into a u32 band, so the conversion cannot fail.
    u32::try_from(clamped).unwrap_or(config.max_green)
}

// ---------------------------------------------------------------------------
// Tick report
// ---------------------------------------------------------------------------

/// Everything a renderer needs after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: Ticks,
    pub lights: Vec<Phase>,
    pub active_lane: usize,
    pub phase: Phase,
    /// Remaining ticks for the on-screen countdown, never below zero.
    pub countdown: u64,
    pub emergency_lane: Option<usize>,
}

impl TickReport {
    /// Priority lane in the `-1 = none` encoding older display code expects.
    pub fn emergency_lane_index(&self) -> i64 {
        self.emergency_lane.map_or(-1, |lane| lane as i64)
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Owns the intersection state and advances it one tick per `evaluate`.
///
/// There is no internal locking. `evaluate` takes `&mut self`, so a host that
/// shares a scheduler between threads has to serialize calls itself.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    state: SchedulerState,
    events: EventLog,
}

impl Scheduler {
    /// Create a scheduler in the startup state: lane 0 green for
    /// `green_duration` ticks.
    pub fn new(config: SchedulerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SchedulerState::initial(config.lane_count, config.green_duration);
        Ok(Self {
            config,
            state,
            events: EventLog::default(),
        })
    }

    /// Resume from a previously captured or hand-built state.
    ///
    /// The state must fit the configuration: same lane count, lanes in range,
    /// a non-red active lane, and emergency fields that the scheduler could
    /// itself have produced under the configured [`EmergencyLanePolicy`].
    pub fn from_state(config: SchedulerConfig, state: SchedulerState) -> Result<Self, ConfigError> {
        config.validate()?;
        if state.lane_count != config.lane_count {
            return Err(ConfigError::LaneCountDiffers {
                state: state.lane_count,
                config: config.lane_count,
            });
        }
        let lane_count = config.lane_count;
        for lane in std::iter::once(state.active_lane).chain(state.emergency_lane) {
            if lane >= lane_count {
                return Err(ConfigError::LaneOutOfRange { lane, lane_count });
            }
        }
        if state.phase == Phase::Red {
            return Err(ConfigError::RedActiveLane);
        }
        let consistent = if state.emergency_mode {
            state.emergency_lane == Some(state.active_lane) && state.phase == Phase::Green
        } else {
            state.emergency_lane.is_none()
                || config.emergency_lane_policy == EmergencyLanePolicy::RetainUntilOverwritten
        };
        if !consistent {
            return Err(ConfigError::InconsistentEmergency {
                emergency_mode: state.emergency_mode,
                emergency_lane: state.emergency_lane,
                active_lane: state.active_lane,
            });
        }
        Ok(Self {
            config,
            state,
            events: EventLog::default(),
        })
    }

    /// Advance one tick with this tick's per-lane counts and emergency flags.
    ///
    /// Malformed input is rejected before any state changes, so a failing
    /// sensor shows up as an error rather than as a quietly skewed cycle.
    ///
    /// `emergency_lane` after the first emergency-free tick depends on
    /// [`SchedulerConfig::emergency_lane_policy`]: cleared to `None` by
    /// default, or kept until the next grant with
    /// [`EmergencyLanePolicy::RetainUntilOverwritten`].
    pub fn evaluate(&mut self, counts: &[i64], emergency: &[bool]) -> Result<(), InputError> {
        if let Err(err) = self.check_input(counts, emergency) {
            warn!(tick = self.state.tick, error = %err, "rejected sensor frame");
            return Err(err);
        }

        self.state.tick += 1;
        let tick = self.state.tick;

        if let Some(lane) = emergency.iter().position(|&present| present) {
            self.grant_emergency(lane, tick);
            return Ok(());
        }

        if self.state.emergency_mode {
            self.recover(tick);
        } else {
            self.transition(counts, tick);
        }

        self.state.timer -= 1;
        Ok(())
    }

    /// [`Scheduler::evaluate`] for a bundled frame.
    pub fn evaluate_frame(&mut self, frame: &SensorFrame) -> Result<(), InputError> {
        self.evaluate(&frame.counts, &frame.emergency)
    }

    fn check_input(&self, counts: &[i64], emergency: &[bool]) -> Result<(), InputError> {
        let expected = self.config.lane_count;
        if counts.len() != expected {
            return Err(InputError::LaneCountMismatch {
                expected,
                got: counts.len(),
            });
        }
        if emergency.len() != expected {
            return Err(InputError::EmergencyCountMismatch {
                expected,
                got: emergency.len(),
            });
        }
        if let Some((lane, &count)) = counts.iter().enumerate().find(|(_, c)| **c < 0) {
            return Err(InputError::NegativeCount { lane, count });
        }
        Ok(())
    }

    fn grant_emergency(&mut self, lane: usize, tick: Ticks) {
        let previous = (self.state.active_lane, self.state.phase);
        let newly_granted = !self.state.emergency_mode || self.state.emergency_lane != Some(lane);

        self.state.active_lane = lane;
        self.state.phase = Phase::Green;
        self.state.timer = i64::from(self.config.max_green);
        self.state.emergency_mode = true;
        self.state.emergency_lane = Some(lane);

        if !newly_granted {
            debug!(tick, lane, "emergency pass renewed");
            return;
        }

        info!(
            tick,
            lane,
            previous_lane = previous.0,
            previous_phase = %previous.1,
            "emergency preemption"
        );
        let preempted = (previous.0 != lane).then_some(previous);
        self.events.push(SignalEvent::EmergencyGranted {
            lane,
            preempted,
            tick,
        });
    }

    fn recover(&mut self, tick: Ticks) {
        let lane = self.state.active_lane;
        let from = self.state.phase;

        self.state.emergency_mode = false;
        self.state.phase = Phase::Yellow;
        self.state.timer = i64::from(self.config.yellow_duration);
        if self.config.emergency_lane_policy == EmergencyLanePolicy::ClearOnRecovery {
            self.state.emergency_lane = None;
        }

        info!(tick, lane, "emergency cleared, lane clearing through yellow");
        self.events.push(SignalEvent::EmergencyCleared { lane, tick });
        if from != Phase::Yellow {
            self.events.push(SignalEvent::PhaseChanged {
                lane,
                from,
                to: Phase::Yellow,
                tick,
            });
        }
    }

    fn transition(&mut self, counts: &[i64], tick: Ticks) {
        if self.state.timer > 0 {
            return;
        }
        match self.state.phase {
            Phase::Green => {
                let lane = self.state.active_lane;
                self.state.phase = Phase::Yellow;
                self.state.timer = i64::from(self.config.yellow_duration);
                debug!(tick, lane, "green expired");
                self.events.push(SignalEvent::PhaseChanged {
                    lane,
                    from: Phase::Green,
                    to: Phase::Yellow,
                    tick,
                });
            }
            Phase::Yellow => {
                let from = self.state.active_lane;
                let to = (from + 1) % self.config.lane_count;
                let green = adaptive_green_duration(&self.config, counts, to);
                self.state.active_lane = to;
                self.state.phase = Phase::Green;
                self.state.timer = i64::from(green);
                debug!(tick, from, to, green, "lane advanced");
                self.events.push(SignalEvent::LaneAdvanced {
                    from,
                    to,
                    green_ticks: i64::from(green),
                    tick,
                });
            }
            Phase::Red => {}
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Phase of every lane, all red except the active lane.
    pub fn light_states(&self) -> Vec<Phase> {
        self.state.light_states()
    }

    pub fn active_lane(&self) -> usize {
        self.state.active_lane
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn timer(&self) -> i64 {
        self.state.timer
    }

    pub fn emergency_mode(&self) -> bool {
        self.state.emergency_mode
    }

    pub fn emergency_lane(&self) -> Option<usize> {
        self.state.emergency_lane
    }

    pub fn tick(&self) -> Ticks {
        self.state.tick
    }

    pub fn state_hash(&self) -> u64 {
        self.state.hash()
    }

    /// Snapshot of the current tick for a renderer.
    pub fn report(&self) -> TickReport {
        TickReport {
            tick: self.state.tick,
            lights: self.light_states(),
            active_lane: self.state.active_lane,
            phase: self.state.phase,
            countdown: self.state.timer.max(0) as u64,
            emergency_lane: self.state.emergency_lane,
        }
    }

    /// Remove and return events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SignalEvent> {
        self.events.drain()
    }

    /// Events lost because the host did not drain often enough.
    pub fn dropped_events(&self) -> u64 {
        self.events.dropped()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

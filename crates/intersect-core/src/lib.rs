//! Intersect Core -- the phase scheduler for a single signalized intersection.
//!
//! This crate owns the only piece of the controller with real decision
//! logic: which lane is allowed to move, in which phase, and for how long.
//! Vehicle counting and emergency-vehicle detection happen elsewhere; the
//! scheduler only consumes their per-lane outputs once per tick.
//!
//! # Tick Pipeline
//!
//! Each call to [`scheduler::Scheduler::evaluate`] advances the intersection
//! by one tick, in priority order:
//!
//! 1. **Validate** -- Reject malformed sensor frames before touching state.
//! 2. **Emergency check** -- Grant immediate green to the lowest-indexed lane
//!    reporting an emergency vehicle, then stop.
//! 3. **Recovery** -- The first tick without an emergency clears the granted
//!    lane through yellow.
//! 4. **Normal transition** -- Green expires into yellow, yellow expires into
//!    the next lane's adaptive green.
//! 5. **Countdown** -- Decrement the phase timer.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut scheduler = Scheduler::new(SchedulerConfig::default())?;
//! scheduler.evaluate(&[3, 1, 0, 2], &[false; 4])?;
//! let lights = scheduler.light_states();
//! ```
//!
//! # Key Types
//!
//! - [`scheduler::Scheduler`] -- Owns the state and runs the tick pipeline.
//! - [`state::SchedulerState`] -- Active lane, phase, timer, emergency flags.
//! - [`phase::Phase`] -- Closed Green/Yellow/Red enum.
//! - [`config::SchedulerConfig`] -- Timing parameters and the emergency-lane
//!   reporting policy.
//! - [`frame::SensorFrame`] -- One tick's worth of per-lane sensor readings.
//! - [`event::SignalEvent`] -- Transitions recorded for the host to drain.

pub mod config;
pub mod error;
pub mod event;
pub mod frame;
pub mod phase;
pub mod scheduler;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

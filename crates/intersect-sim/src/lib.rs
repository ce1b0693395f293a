//! Sensor-driven runner for a single intersection.
//!
//! Wires per-lane sensors to an [`intersect_core::scheduler::Scheduler`],
//! advances it once per tick, and hands renderers a
//! [`intersect_core::scheduler::TickReport`]. Also records and replays sensor
//! frames for debugging.
//!
//! # Usage
//!
//! ```rust,ignore
//! let scenario = intersect_data::load_scenario(Path::new("scenarios/rush_hour"))?;
//! let mut intersection = Intersection::from_scenario(&scenario)?;
//! let report = intersection.tick()?;
//! ```

pub mod error;
pub mod feed;
pub mod intersection;
pub mod replay;
pub mod sensor;

pub use error::SimError;
pub use feed::LoopingFeed;
pub use intersection::Intersection;
pub use replay::{ReplayLog, ReplayResult, replay_and_verify};
pub use sensor::{LaneSensor, ScriptedSensor};

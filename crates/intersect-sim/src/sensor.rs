//! Per-lane sensor seam.
//!
//! Vehicle counting and emergency detection are opaque to the controller: it
//! only sees one [`LaneReading`] per lane per tick. Anything that can produce
//! a reading (a detector pipeline, a scripted feed, a closure in a test) is a
//! [`LaneSensor`].

use intersect_core::frame::LaneReading;
use intersect_data::LaneScript;

use crate::error::SimError;
use crate::feed::LoopingFeed;

/// A source of per-tick readings for one lane.
pub trait LaneSensor {
    /// Observe the lane for the current tick.
    fn sample(&mut self) -> LaneReading;

    /// Rewind to the beginning of the input, if the source supports it.
    fn restart(&mut self) {}

    /// Human-readable label for logs and displays.
    fn label(&self) -> &str {
        "lane"
    }
}

impl<F> LaneSensor for F
where
    F: FnMut() -> LaneReading,
{
    fn sample(&mut self) -> LaneReading {
        self()
    }
}

/// Replays a fixed script of readings, looping back to the start.
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    name: String,
    feed: LoopingFeed<LaneReading>,
}

impl ScriptedSensor {
    pub fn new(name: impl Into<String>, readings: Vec<LaneReading>) -> Result<Self, SimError> {
        let name = name.into();
        match LoopingFeed::new(readings) {
            Some(feed) => Ok(Self { name, feed }),
            None => Err(SimError::EmptyFeed { name }),
        }
    }

    pub fn from_script(script: &LaneScript) -> Result<Self, SimError> {
        Self::new(script.name.clone(), script.readings.clone())
    }

    /// Completed passes over the script.
    pub fn laps(&self) -> u64 {
        self.feed.laps()
    }
}

impl LaneSensor for ScriptedSensor {
    fn sample(&mut self) -> LaneReading {
        *self.feed.advance()
    }

    fn restart(&mut self) {
        self.feed.restart();
    }

    fn label(&self) -> &str {
        &self.name
    }
}

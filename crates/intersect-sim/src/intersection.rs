use tracing::{debug, info};

use intersect_core::config::SchedulerConfig;
use intersect_core::event::SignalEvent;
use intersect_core::frame::{LaneReading, SensorFrame};
use intersect_core::scheduler::{Scheduler, TickReport};
use intersect_data::Scenario;

use crate::error::SimError;
use crate::replay::ReplayLog;
use crate::sensor::{LaneSensor, ScriptedSensor};

/// One intersection: a scheduler plus one sensor per lane.
///
/// Each [`Intersection::tick`] samples every sensor in lane order, feeds the
/// frame to the scheduler, and returns what the signal heads should show.
pub struct Intersection {
    scheduler: Scheduler,
    sensors: Vec<Box<dyn LaneSensor>>,
    recording: Option<ReplayLog>,
}

impl Intersection {
    /// Attach sensors to a scheduler. Sensor order is lane order.
    pub fn new(scheduler: Scheduler, sensors: Vec<Box<dyn LaneSensor>>) -> Result<Self, SimError> {
        let lanes = scheduler.config().lane_count;
        if sensors.len() != lanes {
            return Err(SimError::SensorCountMismatch {
                sensors: sensors.len(),
                lanes,
            });
        }
        Ok(Self {
            scheduler,
            sensors,
            recording: None,
        })
    }

    /// Build a fresh scheduler from `config` and attach `sensors`.
    pub fn with_config(
        config: SchedulerConfig,
        sensors: Vec<Box<dyn LaneSensor>>,
    ) -> Result<Self, SimError> {
        Self::new(Scheduler::new(config)?, sensors)
    }

    /// Wire up a loaded scenario with scripted sensors.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, SimError> {
        let sensors = scenario
            .lanes
            .iter()
            .map(|lane| ScriptedSensor::from_script(lane).map(|s| Box::new(s) as Box<dyn LaneSensor>))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            scenario = %scenario.name,
            lanes = sensors.len(),
            "intersection assembled"
        );
        Self::with_config(scenario.config.clone(), sensors)
    }

    /// Sample all sensors and advance the scheduler by one tick.
    ///
    /// A rejected frame leaves the scheduler untouched and is not recorded.
    /// The sensors have still advanced, so the next call sees the next frame.
    pub fn tick(&mut self) -> Result<TickReport, SimError> {
        let readings: Vec<LaneReading> = self.sensors.iter_mut().map(|s| s.sample()).collect();
        let frame = SensorFrame::from_readings(&readings);

        self.scheduler
            .evaluate_frame(&frame)
            .map_err(|source| SimError::Rejected {
                tick: self.scheduler.tick() + 1,
                source,
            })?;

        if let Some(log) = self.recording.as_mut() {
            log.record_with_hash(frame, self.scheduler.state_hash());
        }

        let report = self.scheduler.report();
        debug!(
            tick = report.tick,
            lane = report.active_lane,
            phase = %report.phase,
            countdown = report.countdown,
            "tick"
        );
        Ok(report)
    }

    /// Run `ticks` ticks, stopping at the first rejected frame.
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>, SimError> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// Rewind every sensor to the start of its input.
    pub fn restart_sensors(&mut self) {
        for sensor in &mut self.sensors {
            sensor.restart();
        }
    }

    /// Labels of the attached sensors, in lane order.
    pub fn lane_labels(&self) -> Vec<&str> {
        self.sensors.iter().map(|s| s.label()).collect()
    }

    // -----------------------------------------------------------------------
    // Recording
    // -----------------------------------------------------------------------

    /// Begin recording accepted frames from the current state. Replaces any
    /// recording already in progress.
    pub fn start_recording(&mut self) {
        self.recording = Some(ReplayLog::new(&self.scheduler));
    }

    /// Stop recording and hand back the log.
    pub fn take_recording(&mut self) -> Option<ReplayLog> {
        self.recording.take()
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn drain_events(&mut self) -> Vec<SignalEvent> {
        self.scheduler.drain_events()
    }
}

//! Replay recording and playback for debugging sensor-driven runs.
//!
//! Records the sensor frames fed to a scheduler, starting from a captured
//! state. The replay can be played back to reproduce the exact same signal
//! timeline, with hash verification at checkpoints.

use intersect_core::config::SchedulerConfig;
use intersect_core::frame::SensorFrame;
use intersect_core::scheduler::Scheduler;
use intersect_core::state::SchedulerState;

use crate::error::SimError;

// ---------------------------------------------------------------------------
// ReplayMismatch
// ---------------------------------------------------------------------------

/// Details about where replay verification failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayMismatch {
    /// The frame index where the mismatch was detected.
    pub frame_index: usize,
    /// Expected hash from the recording.
    pub expected_hash: u64,
    /// Actual hash from the replay.
    pub actual_hash: u64,
}

// ---------------------------------------------------------------------------
// ReplayLog
// ---------------------------------------------------------------------------

/// A recorded sequence of sensor frames starting from a known state.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReplayLog {
    pub config: SchedulerConfig,
    /// Scheduler state at the start of recording.
    pub initial_state: SchedulerState,
    /// Accepted frames in order.
    pub frames: Vec<SensorFrame>,
    /// Hash checkpoints: (frame_index, state_hash after that frame).
    pub hash_checkpoints: Vec<(usize, u64)>,
}

impl ReplayLog {
    /// Start a recording from the scheduler's current state.
    pub fn new(scheduler: &Scheduler) -> Self {
        Self {
            config: scheduler.config().clone(),
            initial_state: scheduler.state().clone(),
            frames: Vec::new(),
            hash_checkpoints: Vec::new(),
        }
    }

    /// Record a frame together with the state hash it produced. Every frame
    /// gets a checkpoint.
    pub fn record_with_hash(&mut self, frame: SensorFrame, hash: u64) {
        let index = self.frames.len();
        self.frames.push(frame);
        self.hash_checkpoints.push((index, hash));
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Serialize the replay log to bytes (using bitcode).
    pub fn serialize(&self) -> Result<Vec<u8>, SimError> {
        bitcode::serialize(self).map_err(|e| SimError::Encode(e.to_string()))
    }

    /// Deserialize a replay log from bytes.
    pub fn deserialize(data: &[u8]) -> Result<Self, SimError> {
        bitcode::deserialize(data).map_err(|e| SimError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ReplayResult
// ---------------------------------------------------------------------------

/// The result of replaying a log.
#[derive(Debug)]
pub struct ReplayResult {
    pub frames_evaluated: usize,
    /// Whether all hash checkpoints matched.
    pub is_verified: bool,
    /// First mismatch encountered (if any).
    pub first_mismatch: Option<ReplayMismatch>,
    /// State hash after the last frame.
    pub final_hash: u64,
}

/// Rebuild the scheduler from the log and feed it every recorded frame.
pub fn replay_and_verify(log: &ReplayLog) -> Result<ReplayResult, SimError> {
    let mut scheduler = Scheduler::from_state(log.config.clone(), log.initial_state.clone())?;

    let mut first_mismatch = None;
    let mut checkpoints = log.hash_checkpoints.iter().peekable();

    for (i, frame) in log.frames.iter().enumerate() {
        scheduler
            .evaluate_frame(frame)
            .map_err(|source| SimError::Rejected {
                tick: scheduler.tick() + 1,
                source,
            })?;

        while let Some(&&(index, expected_hash)) = checkpoints.peek() {
            if index != i {
                break;
            }
            checkpoints.next();
            let actual_hash = scheduler.state_hash();
            if actual_hash != expected_hash && first_mismatch.is_none() {
                first_mismatch = Some(ReplayMismatch {
                    frame_index: i,
                    expected_hash,
                    actual_hash,
                });
            }
        }
    }

    Ok(ReplayResult {
        frames_evaluated: log.frames.len(),
        is_verified: first_mismatch.is_none(),
        first_mismatch,
        final_hash: scheduler.state_hash(),
    })
}

// ===========================================================================
// Tests
// ===========================================================================

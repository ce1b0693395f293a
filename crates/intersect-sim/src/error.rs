use intersect_core::error::{ConfigError, InputError};

/// Errors raised while driving an intersection from its sensors.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The number of attached sensors differs from the lane count.
    #[error("{sensors} sensors attached but the controller has {lanes} lanes")]
    SensorCountMismatch { sensors: usize, lanes: usize },

    /// A looping feed was built from an empty sequence.
    #[error("feed '{name}' has no readings")]
    EmptyFeed { name: String },

    /// The scheduler rejected a sensor frame.
    #[error("sensor frame rejected at tick {tick}: {source}")]
    Rejected { tick: u64, source: InputError },

    /// The controller configuration or restored state is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Replay log encoding failed.
    #[error("replay encoding failed: {0}")]
    Encode(String),

    /// Replay log decoding failed.
    #[error("replay decoding failed: {0}")]
    Decode(String),
}

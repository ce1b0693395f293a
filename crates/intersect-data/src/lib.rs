//! Data-file loading for intersection scenarios.
//!
//! Controller timings and scripted lane feeds can be written in RON, TOML, or
//! JSON; the format is picked from the file extension.

pub mod loader;
pub mod scenario;
pub mod schema;

pub use loader::{DataFile, DataLoadError};
pub use scenario::{LaneScript, MAX_REPEAT, Scenario, load_scenario, load_scheduler_config};

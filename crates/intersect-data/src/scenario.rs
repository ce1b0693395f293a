//! Scenario loading: controller timings plus scripted per-lane readings.
//!
//! A scenario directory holds:
//!
//! - `lanes.{ron,toml,json}` (required) -- one script per lane, in lane order.
//! - `controller.{ron,toml,json}` (optional) -- a
//!   [`SchedulerConfig`]; missing fields take their defaults, and a missing
//!   file means stock four-lane timings.

use std::collections::HashSet;
use std::path::Path;

use intersect_core::config::SchedulerConfig;
use intersect_core::frame::LaneReading;

use crate::loader::{
    DataFile, DataLoadError, deserialize_file, deserialize_list, find_data_file,
    require_data_file,
};
use crate::schema::{LaneScriptData, ReadingData};

/// Longest run a single scripted reading may expand to. A day of one-second
/// ticks.
pub const MAX_REPEAT: u32 = 86_400;

// ===========================================================================
// Resolved types
// ===========================================================================

/// A lane's readings with shorthand and repeats expanded, one per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneScript {
    pub name: String,
    pub readings: Vec<LaneReading>,
}

/// A fully loaded scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Directory name the scenario was loaded from.
    pub name: String,
    pub config: SchedulerConfig,
    pub lanes: Vec<LaneScript>,
}

// ===========================================================================
// Loading
// ===========================================================================

/// Load and validate a controller configuration file.
pub fn load_scheduler_config(path: &Path) -> Result<SchedulerConfig, DataLoadError> {
    let config: SchedulerConfig = deserialize_file(path)?;
    config
        .validate()
        .map_err(|source| DataLoadError::InvalidConfig {
            file: path.to_path_buf(),
            source,
        })?;
    Ok(config)
}

/// Load a scenario directory.
pub fn load_scenario(dir: &Path) -> Result<Scenario, DataLoadError> {
    let config = match find_data_file(dir, DataFile::Controller)? {
        Some(path) => load_scheduler_config(&path)?,
        None => SchedulerConfig::default(),
    };

    let lanes_path = require_data_file(dir, DataFile::Lanes)?;
    let data: Vec<LaneScriptData> = deserialize_list(&lanes_path, DataFile::Lanes.stem())?;
    let lanes = resolve_lanes(&lanes_path, data)?;

    if lanes.len() != config.lane_count {
        return Err(DataLoadError::LaneCountMismatch {
            file: lanes_path,
            scripted: lanes.len(),
            configured: config.lane_count,
        });
    }

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Scenario {
        name,
        config,
        lanes,
    })
}

fn resolve_lanes(file: &Path, data: Vec<LaneScriptData>) -> Result<Vec<LaneScript>, DataLoadError> {
    let mut seen = HashSet::new();
    data.into_iter()
        .map(|lane| {
            if !seen.insert(lane.name.clone()) {
                return Err(DataLoadError::DuplicateName {
                    file: file.to_path_buf(),
                    name: lane.name,
                });
            }
            let mut readings = Vec::new();
            for reading in &lane.readings {
                let (reading, repeat) = expand(reading);
                if repeat == 0 || repeat > MAX_REPEAT {
                    return Err(DataLoadError::InvalidRepeat {
                        file: file.to_path_buf(),
                        lane: lane.name,
                        repeat,
                        max: MAX_REPEAT,
                    });
                }
                readings.extend(std::iter::repeat_n(reading, repeat as usize));
            }
            if readings.is_empty() {
                return Err(DataLoadError::EmptyLane {
                    file: file.to_path_buf(),
                    lane: lane.name,
                });
            }
            Ok(LaneScript {
                name: lane.name,
                readings,
            })
        })
        .collect()
}

/// A reading and how many consecutive ticks it covers. Negative counts are
/// kept as-is: rejecting them is the scheduler's job, and scripts use them to
/// simulate a faulty counter.
fn expand(reading: &ReadingData) -> (LaneReading, u32) {
    match *reading {
        ReadingData::Count(vehicles) => (LaneReading::new(vehicles, false), 1),
        ReadingData::Short(vehicles, emergency) => (LaneReading::new(vehicles, emergency), 1),
        ReadingData::Full {
            vehicles,
            emergency,
            repeat,
        } => (LaneReading::new(vehicles, emergency), repeat),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use intersect_core::config::EmergencyLanePolicy;
    use std::fs;
    use std::path::PathBuf;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "intersect_scenario_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const FOUR_LANES_RON: &str = r#"[
        (name: "north", readings: [3, (vehicles: 5, repeat: 2)]),
        (name: "east", readings: [1]),
        (name: "south", readings: [0, (0, true)]),
        (name: "west", readings: [2]),
    ]"#;

    #[test]
    fn loads_ron_scenario_with_default_controller() {
        let dir = make_test_dir("ron_default");
        fs::write(dir.join("lanes.ron"), FOUR_LANES_RON).unwrap();

        let scenario = load_scenario(&dir).unwrap();
        assert_eq!(scenario.config, SchedulerConfig::default());
        assert_eq!(scenario.lanes.len(), 4);
        assert_eq!(
            scenario.lanes[0].readings,
            vec![
                LaneReading::new(3, false),
                LaneReading::new(5, false),
                LaneReading::new(5, false)
            ]
        );
        assert_eq!(scenario.lanes[2].readings[1], LaneReading::new(0, true));
        cleanup(&dir);
    }

    #[test]
    fn loads_toml_lanes_and_controller() {
        let dir = make_test_dir("toml");
        fs::write(
            dir.join("controller.toml"),
            "lane_count = 2\nmax_green = 20\nemergency_lane_policy = \"retain_until_overwritten\"\n",
        )
        .unwrap();
        fs::write(
            dir.join("lanes.toml"),
            r#"
[[lanes]]
name = "main"
readings = [4, [1, true]]

[[lanes]]
name = "side"
readings = [{ vehicles = 2, repeat = 4 }]
"#,
        )
        .unwrap();

        let scenario = load_scenario(&dir).unwrap();
        assert_eq!(scenario.config.lane_count, 2);
        assert_eq!(scenario.config.max_green, 20);
        assert_eq!(
            scenario.config.emergency_lane_policy,
            EmergencyLanePolicy::RetainUntilOverwritten
        );
        assert_eq!(scenario.lanes[0].readings[1], LaneReading::new(1, true));
        assert_eq!(scenario.lanes[1].readings.len(), 4);
        cleanup(&dir);
    }

    #[test]
    fn lane_count_must_match_controller() {
        let dir = make_test_dir("mismatch");
        fs::write(
            dir.join("lanes.json"),
            r#"[{ "name": "only", "readings": [1] }]"#,
        )
        .unwrap();

        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::LaneCountMismatch {
                scripted: 1,
                configured: 4,
                ..
            })
        ));
        cleanup(&dir);
    }

    #[test]
    fn empty_lane_rejected() {
        let dir = make_test_dir("empty_lane");
        fs::write(
            dir.join("lanes.json"),
            r#"[{ "name": "a", "readings": [] }]"#,
        )
        .unwrap();

        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::EmptyLane { ref lane, .. }) if lane == "a"
        ));
        cleanup(&dir);
    }

    #[test]
    fn duplicate_lane_rejected() {
        let dir = make_test_dir("dup_lane");
        fs::write(
            dir.join("lanes.json"),
            r#"[{ "name": "a", "readings": [1] }, { "name": "a", "readings": [2] }]"#,
        )
        .unwrap();

        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::DuplicateName { ref name, .. }) if name == "a"
        ));
        cleanup(&dir);
    }

    #[test]
    fn zero_repeat_rejected() {
        let dir = make_test_dir("zero_repeat");
        fs::write(
            dir.join("lanes.json"),
            r#"[{ "name": "a", "readings": [{ "vehicles": 5, "repeat": 0 }, 3] }]"#,
        )
        .unwrap();

        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::InvalidRepeat { ref lane, repeat: 0, .. }) if lane == "a"
        ));
        cleanup(&dir);
    }

    #[test]
    fn oversized_repeat_rejected() {
        let dir = make_test_dir("huge_repeat");
        fs::write(
            dir.join("lanes.json"),
            format!(
                r#"[{{ "name": "a", "readings": [{{ "vehicles": 1, "repeat": {} }}] }}]"#,
                u32::MAX
            ),
        )
        .unwrap();

        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::InvalidRepeat {
                repeat: u32::MAX,
                max: MAX_REPEAT,
                ..
            })
        ));
        cleanup(&dir);
    }

    #[test]
    fn repeat_at_limit_is_accepted() {
        let dir = make_test_dir("limit_repeat");
        let lanes: Vec<String> = ["n", "e", "s", "w"]
            .iter()
            .map(|name| {
                format!(r#"{{ "name": "{name}", "readings": [{{ "vehicles": 1, "repeat": {MAX_REPEAT} }}] }}"#)
            })
            .collect();
        fs::write(dir.join("lanes.json"), format!("[{}]", lanes.join(","))).unwrap();

        let scenario = load_scenario(&dir).unwrap();
        assert_eq!(scenario.lanes[0].readings.len(), MAX_REPEAT as usize);
        cleanup(&dir);
    }

    #[test]
    fn invalid_controller_rejected() {
        let dir = make_test_dir("bad_controller");
        let path = dir.join("controller.ron");
        fs::write(&path, "(min_green: 9, max_green: 4)").unwrap();

        assert!(matches!(
            load_scheduler_config(&path),
            Err(DataLoadError::InvalidConfig { .. })
        ));
        cleanup(&dir);
    }

    #[test]
    fn missing_lanes_file_is_an_error() {
        let dir = make_test_dir("no_lanes");
        assert!(matches!(
            load_scenario(&dir),
            Err(DataLoadError::MissingRequired { .. })
        ));
        cleanup(&dir);
    }
}

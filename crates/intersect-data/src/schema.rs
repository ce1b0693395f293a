//! Serde data file structs for scripted lane feeds.
//!
//! These define the on-disk format of a scenario's `lanes` file. They are
//! deserialized from RON, JSON, or TOML and then expanded into
//! [`intersect_core::frame::LaneReading`]s by the scenario loader.

use serde::Deserialize;

/// One lane's scripted sensor output.
#[derive(Debug, Clone, Deserialize)]
pub struct LaneScriptData {
    pub name: String,
    pub readings: Vec<ReadingData>,
}

/// A scripted reading, supporting a bare count, a `(count, emergency)` pair,
/// and a full form that can repeat the same reading for several ticks.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReadingData {
    /// Bare vehicle count, no emergency.
    Count(i64),
    /// `(vehicles, emergency)`.
    Short(i64, bool),
    Full {
        vehicles: i64,
        #[serde(default)]
        emergency: bool,
        #[serde(default = "default_repeat")]
        repeat: u32,
    },
}

fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ron_accepts_all_reading_forms() {
        let input = r#"(
            name: "north",
            readings: [
                4,
                (2, true),
                (vehicles: 7, repeat: 3),
            ],
        )"#;
        let lane: LaneScriptData = ron::from_str(input).unwrap();
        assert_eq!(lane.name, "north");
        assert!(matches!(lane.readings[0], ReadingData::Count(4)));
        assert!(matches!(lane.readings[1], ReadingData::Short(2, true)));
        assert!(matches!(
            lane.readings[2],
            ReadingData::Full {
                vehicles: 7,
                emergency: false,
                repeat: 3
            }
        ));
    }

    #[test]
    fn json_accepts_pair_as_array() {
        let input = r#"{ "name": "east", "readings": [1, [0, true], { "vehicles": 3 }] }"#;
        let lane: LaneScriptData = serde_json::from_str(input).unwrap();
        assert!(matches!(lane.readings[1], ReadingData::Short(0, true)));
        assert!(matches!(
            lane.readings[2],
            ReadingData::Full {
                vehicles: 3,
                repeat: 1,
                ..
            }
        ));
    }
}

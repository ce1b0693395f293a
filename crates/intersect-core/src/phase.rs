//! Signal phases shown by a lane's signal head.

use serde::{Deserialize, Serialize};

/// Signal phase of a single lane.
///
/// Only the active lane is ever Green or Yellow; every other lane reads Red.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Green,
    Yellow,
    Red,
}

impl Phase {
    /// Whether traffic in a lane showing this phase may enter the junction.
    pub fn is_proceed(self) -> bool {
        !matches!(self, Phase::Red)
    }

    /// Stable tag used when hashing state.
    pub(crate) fn tag(self) -> u8 {
        match self {
            Phase::Green => 0,
            Phase::Yellow => 1,
            Phase::Red => 2,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Green => "green",
            Phase::Yellow => "yellow",
            Phase::Red => "red",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_red_stops_traffic() {
        assert!(Phase::Green.is_proceed());
        assert!(Phase::Yellow.is_proceed());
        assert!(!Phase::Red.is_proceed());
    }

    #[test]
    fn tags_are_distinct() {
        assert_ne!(Phase::Green.tag(), Phase::Yellow.tag());
        assert_ne!(Phase::Yellow.tag(), Phase::Red.tag());
        assert_ne!(Phase::Green.tag(), Phase::Red.tag());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Phase::Green.to_string(), "green");
        assert_eq!(Phase::Yellow.to_string(), "yellow");
        assert_eq!(Phase::Red.to_string(), "red");
    }
}

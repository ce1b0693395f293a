//! Property-based tests for looping feeds and recorded runs.

use intersect_core::config::SchedulerConfig;
use intersect_core::frame::LaneReading;
use intersect_sim::feed::LoopingFeed;
use intersect_sim::{Intersection, LaneSensor, ScriptedSensor, replay_and_verify};
use proptest::prelude::*;

fn arb_reading() -> impl Strategy<Value = LaneReading> {
    (0..30i64, prop::bool::weighted(0.1)).prop_map(|(vehicles, emergency)| {
        LaneReading::new(vehicles, emergency)
    })
}

fn arb_scripts() -> impl Strategy<Value = Vec<Vec<LaneReading>>> {
    proptest::collection::vec(proptest::collection::vec(arb_reading(), 1..20), 4)
}

fn scripted_intersection(scripts: &[Vec<LaneReading>]) -> Intersection {
    let sensors = scripts
        .iter()
        .enumerate()
        .map(|(lane, readings)| {
            Box::new(ScriptedSensor::new(format!("lane{lane}"), readings.clone()).unwrap())
                as Box<dyn LaneSensor>
        })
        .collect();
    Intersection::with_config(SchedulerConfig::default(), sensors).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The k-th advance yields element k mod len, and laps count full passes.
    #[test]
    fn feed_wraps_modulo_length(items in proptest::collection::vec(any::<u16>(), 1..16), steps in 0..100usize) {
        let mut feed = LoopingFeed::new(items.clone()).unwrap();
        for k in 0..steps {
            prop_assert_eq!(*feed.advance(), items[k % items.len()]);
        }
        prop_assert_eq!(feed.position(), steps % items.len());
        prop_assert_eq!(feed.laps(), (steps / items.len()) as u64);
    }

    /// Any scripted run, recorded from any point, replays to the same hash.
    #[test]
    fn scripted_runs_replay_exactly(scripts in arb_scripts(), warmup in 0..30u64, ticks in 1..120u64) {
        let mut intersection = scripted_intersection(&scripts);
        intersection.run(warmup).unwrap();
        intersection.start_recording();
        intersection.run(ticks).unwrap();

        let log = intersection.take_recording().unwrap();
        let restored = intersect_sim::ReplayLog::deserialize(&log.serialize().unwrap()).unwrap();
        let result = replay_and_verify(&restored).unwrap();

        prop_assert!(result.is_verified);
        prop_assert_eq!(result.frames_evaluated as u64, ticks);
        prop_assert_eq!(result.final_hash, intersection.scheduler().state_hash());
    }

    /// Exactly one lane shows green or yellow whatever the scripts say.
    #[test]
    fn scripted_runs_keep_one_lane_moving(scripts in arb_scripts()) {
        let mut intersection = scripted_intersection(&scripts);
        for report in intersection.run(150).unwrap() {
            prop_assert_eq!(report.lights.iter().filter(|p| p.is_proceed()).count(), 1);
        }
    }
}

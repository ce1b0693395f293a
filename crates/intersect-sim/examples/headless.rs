//! Headless runner: loads a scenario, runs it, prints one line per tick.
//!
//! Run with: `cargo run --package intersect-sim --example headless -- ambulance 60`
//!
//! Set `RUST_LOG=intersect_core=debug` to see every phase transition.

use std::path::Path;

use intersect_core::phase::Phase;
use intersect_data::load_scenario;
use intersect_sim::{Intersection, SimError};
use tracing_subscriber::EnvFilter;

const DEFAULT_SCENARIO: &str = "rush_hour";
const DEFAULT_TICKS: u64 = 60;

fn glyph(phase: Phase) -> char {
    match phase {
        Phase::Green => 'G',
        Phase::Yellow => 'Y',
        Phase::Red => '.',
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let scenario_name = args.next().unwrap_or_else(|| DEFAULT_SCENARIO.to_string());
    let ticks = args
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let scenarios_dir = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios"));
    let scenario = load_scenario(&scenarios_dir.join(&scenario_name)).unwrap_or_else(|e| {
        panic!("failed to load scenario '{scenario_name}': {e}");
    });

    let mut intersection =
        Intersection::from_scenario(&scenario).expect("failed to assemble intersection");
    println!("=== {} ===", scenario.name);
    println!("lanes: {}\n", intersection.lane_labels().join(", "));

    for _ in 0..ticks {
        match intersection.tick() {
            Ok(report) => {
                let lights: String = report.lights.iter().map(|&p| glyph(p)).collect();
                let priority = match report.emergency_lane {
                    Some(lane) => format!("  PRIORITY lane {lane}"),
                    None => String::new(),
                };
                println!(
                    "[{:>4}] {lights}  {:>2}s{priority}",
                    report.tick, report.countdown
                );
            }
            Err(SimError::Rejected { tick, source }) => {
                println!("[{tick:>4}] sensor fault: {source}");
            }
            Err(e) => {
                eprintln!("run aborted: {e}");
                std::process::exit(1);
            }
        }
    }

    let events = intersection.drain_events();
    println!("\n{} signal events over {ticks} ticks", events.len());
}

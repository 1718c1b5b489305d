//! Run a named scenario in simulated time and print JSON-lines telemetry.
//!
//! Usage:
//!   cargo run -p sailnav_sitl --bin sail_sim -- <SCENARIO> [OPTIONS]
//!
//! Scenarios: reach, upwind, waypoints, link-loss

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sailnav_core::{GeoPoint, StatusSnapshot};
use sailnav_sitl::{Scenario, SimBoat};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(version, about = "Run a sailnav scenario against a kinematic boat")]
struct Args {
    /// Scenario to run (reach, upwind, waypoints, link-loss)
    scenario: Scenario,

    /// Simulated duration in seconds (default: per scenario)
    #[arg(short, long)]
    duration_s: Option<u64>,

    /// RNG seed for sensor noise
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Telemetry period in simulated milliseconds
    #[arg(short, long, default_value_t = 1000)]
    report_ms: u64,
}

/// Ground truth from the simulator, next to what the autopilot believes
#[derive(Serialize)]
struct BoatTruth {
    heading: f32,
    position: GeoPoint,
    speed: f32,
    rudder: f32,
    sail: Option<f32>,
}

impl BoatTruth {
    fn of(boat: &SimBoat) -> Self {
        Self {
            heading: boat.heading(),
            position: boat.position(),
            speed: boat.speed(),
            rudder: boat.rudder().angle(),
            sail: boat.sail(),
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    scenario: &'a str,
    status: StatusSnapshot,
    boat: BoatTruth,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let duration_ms = args
        .duration_s
        .unwrap_or_else(|| args.scenario.default_duration_s())
        * 1000;
    let report_ms = args.report_ms.max(1);

    let mut sim = args
        .scenario
        .build(Some(args.seed))
        .with_context(|| format!("building scenario {}", args.scenario))?;
    info!(
        "Running {} for {} s (seed {})",
        args.scenario,
        duration_ms / 1000,
        args.seed
    );

    let mut next_report_ms = 0;
    while sim.now_ms() < duration_ms {
        sim.step();
        if sim.now_ms() >= next_report_ms {
            next_report_ms = sim.now_ms() + report_ms;
            let report = Report {
                scenario: args.scenario.name(),
                status: sim.status(),
                boat: BoatTruth::of(sim.boat()),
            };
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    let status = sim.status();
    info!(
        "Finished at {} ms: mode {}, nav {}, waypoint {}",
        sim.now_ms(),
        status.mode_label,
        status.nav_label,
        status.waypoint_index
    );
    Ok(())
}

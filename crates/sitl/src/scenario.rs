//! Named scenarios shared by the `sail_sim` binary and the integration tests.

use std::fmt;
use std::str::FromStr;

use sailnav_core::guidance::MissionMode;
use sailnav_core::navigation::geo::offset_position;
use sailnav_core::parameters::{ParamValue, ParameterStore};
use sailnav_core::{Autopilot, Command, GeoPoint};

use crate::boat::{BoatConfig, SimBoat};
use crate::error::SimulatorError;
use crate::ground::{MemoryRecoveryStore, SimLink};
use crate::sim::{Simulation, DEFAULT_STEP_MS};

/// Ground heartbeat period.
pub const HEARTBEAT_MS: u64 = 1000;

/// Built-in scenarios. The true wind always blows from the north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Beam reach to a single waypoint 200 m east.
    Reach,
    /// Single waypoint 300 m dead upwind, reached by tacking.
    Upwind,
    /// Closed loop of three waypoints.
    Waypoints,
    /// Heading mode, then a 55 s link outage forcing recovery.
    LinkLoss,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Reach,
        Scenario::Upwind,
        Scenario::Waypoints,
        Scenario::LinkLoss,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Reach => "reach",
            Scenario::Upwind => "upwind",
            Scenario::Waypoints => "waypoints",
            Scenario::LinkLoss => "link-loss",
        }
    }

    /// Simulated duration the scenario is meant to run for.
    pub fn default_duration_s(self) -> u64 {
        match self {
            Scenario::Reach => 180,
            Scenario::Upwind => 300,
            Scenario::Waypoints => 450,
            Scenario::LinkLoss => 90,
        }
    }

    /// Initial boat heading.
    fn initial_heading(self) -> f32 {
        match self {
            Scenario::Upwind => 45.0,
            _ => 90.0,
        }
    }

    /// Build the simulation and send the scenario's initial commands.
    pub fn build(self, seed: Option<u64>) -> Result<Simulation, SimulatorError> {
        let config = BoatConfig {
            initial_heading_deg: self.initial_heading(),
            seed,
            ..BoatConfig::default()
        };
        let origin = config.origin();

        let mut params = ParameterStore::new();
        sailnav_core::parameters::register_all_defaults(&mut params)
            .map_err(|e| SimulatorError::CommandRejected(e.into()))?;
        if self == Scenario::Waypoints {
            params
                .set("WP_RADIUS", ParamValue::Float(5.0))
                .map_err(|e| SimulatorError::CommandRejected(e.into()))?;
        }

        let autopilot = Autopilot::new(params, MemoryRecoveryStore::with_point(origin));
        let mut link = SimLink::new(HEARTBEAT_MS);
        if self == Scenario::LinkLoss {
            link.add_outage(5_000, 60_000);
        }
        let mut sim = Simulation::new(autopilot, SimBoat::new(config), link, DEFAULT_STEP_MS);

        match self {
            Scenario::Reach => {
                add_waypoint(&mut sim, 0, 0, point_from(origin, 200.0, 90.0))?;
                sim.send(Command::SetMode(MissionMode::Waypoints as u8))?;
            }
            Scenario::Upwind => {
                add_waypoint(&mut sim, 0, 0, point_from(origin, 300.0, 0.0))?;
                sim.send(Command::SetMode(MissionMode::Waypoints as u8))?;
            }
            Scenario::Waypoints => {
                let wp0 = point_from(origin, 80.0, 90.0);
                let wp1 = point_from(wp0, 80.0, 180.0);
                let wp2 = point_from(origin, 80.0, 180.0);
                add_waypoint(&mut sim, 0, 1, wp0)?;
                add_waypoint(&mut sim, 1, 2, wp1)?;
                add_waypoint(&mut sim, 2, 0, wp2)?;
                sim.send(Command::SetMode(MissionMode::Waypoints as u8))?;
            }
            Scenario::LinkLoss => {
                sim.send(Command::SetRecoveryPoint(point_from(origin, 150.0, 180.0)))?;
                sim.send(Command::SetHeading(90.0))?;
                sim.send(Command::SetMode(MissionMode::Heading as u8))?;
            }
        }
        Ok(sim)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| SimulatorError::UnknownScenario(s.to_string()))
    }
}

/// Point `distance_m` away from `from` along `bearing_deg`.
pub fn point_from(from: GeoPoint, distance_m: f32, bearing_deg: f32) -> GeoPoint {
    let (lat, lon) = offset_position(from.latitude, from.longitude, distance_m, bearing_deg);
    GeoPoint::new(lat, lon)
}

fn add_waypoint(
    sim: &mut Simulation,
    index: usize,
    successor: usize,
    point: GeoPoint,
) -> Result<(), SimulatorError> {
    sim.send(Command::AddWaypoint {
        index,
        successor,
        point,
    })
}

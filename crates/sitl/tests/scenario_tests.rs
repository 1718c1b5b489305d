//! End-to-end scenarios: the real autopilot sailing the kinematic boat.

use sailnav_core::guidance::MissionMode;
use sailnav_core::navigation::geo::angular_diff;
use sailnav_core::parameters::ParameterStore;
use sailnav_core::{Autopilot, Command};
use sailnav_sitl::{
    point_from, BoatConfig, MemoryRecoveryStore, Scenario, SimBoat, SimLink, Simulation,
    DEFAULT_STEP_MS,
};

const SEED: u64 = 11;

fn close_to(angle: f32, expected: f32, tolerance: f32) -> bool {
    angular_diff(angle, expected).abs() < tolerance
}

#[test]
fn reach_is_sailed_directly() {
    let mut sim = Scenario::Reach.build(Some(SEED)).unwrap();
    let target = sim.autopilot().guidance().waypoints().get(0).unwrap().point;

    let mut reached = false;
    while sim.now_ms() < 180_000 {
        sim.step();
        let status = sim.status();
        assert_ne!(status.nav_label, "INDIRECT", "at {} ms", sim.now_ms());
        if sim.boat().position().distance_to(&target) < 8.0 {
            reached = true;
            break;
        }
    }
    assert!(reached, "boat at {:?}", sim.boat());
    assert!(close_to(sim.boat().heading(), 90.0, 15.0));
}

#[test]
fn dead_upwind_target_is_reached_by_tacking() {
    let mut sim = Scenario::Upwind.build(Some(SEED)).unwrap();
    let target = sim.autopilot().guidance().waypoints().get(0).unwrap().point;
    let start_distance = sim.boat().position().distance_to(&target);

    let mut saw_port = false;
    let mut saw_starboard = false;
    let mut saw_turn = false;
    while sim.now_ms() < 300_000 {
        sim.step();
        let status = sim.status();
        saw_turn |= status.nav_label.starts_with("TURN");
        if status.nav_label == "INDIRECT" {
            if let Some(held) = status.heading_target {
                saw_port |= close_to(held, 45.0, 8.0);
                saw_starboard |= close_to(held, 315.0, 8.0);
            }
        }
    }

    assert!(saw_port, "never held the port close-hauled bearing");
    assert!(saw_starboard, "never held the starboard close-hauled bearing");
    assert!(saw_turn, "never tacked");
    let progress = start_distance - sim.boat().position().distance_to(&target);
    assert!(progress > 60.0, "only {progress} m made good");
}

#[test]
fn short_turn_away_from_wind_needs_no_maneuver() {
    // Heading 10, target bearing 350, wind from 180
    let config = BoatConfig {
        initial_heading_deg: 10.0,
        wind_bearing_deg: 180.0,
        seed: Some(SEED),
        ..BoatConfig::default()
    };
    let origin = config.origin();
    let mut params = ParameterStore::new();
    sailnav_core::parameters::register_all_defaults(&mut params).unwrap();
    // Start the wind estimate on the true wind
    params
        .set("WND_MANUAL", sailnav_core::parameters::ParamValue::Bool(true))
        .unwrap();
    params
        .set(
            "WND_MAN_VAL",
            sailnav_core::parameters::ParamValue::Float(180.0),
        )
        .unwrap();
    let autopilot = Autopilot::new(params, MemoryRecoveryStore::with_point(origin));
    let mut sim = Simulation::new(
        autopilot,
        SimBoat::new(config),
        SimLink::new(1000),
        DEFAULT_STEP_MS,
    );
    sim.send(Command::AddWaypoint {
        index: 0,
        successor: 0,
        point: point_from(origin, 300.0, 350.0),
    })
    .unwrap();
    sim.send(Command::SetMode(MissionMode::Waypoints as u8))
        .unwrap();

    while sim.now_ms() < 20_000 {
        sim.step();
        let status = sim.status();
        assert_eq!(status.nav_label, "DIRECT", "at {} ms", sim.now_ms());
    }
    assert!(close_to(sim.boat().heading(), 350.0, 5.0));
}

#[test]
fn link_loss_forces_sticky_recovery() {
    let mut sim = Scenario::LinkLoss.build(Some(SEED)).unwrap();
    let recovery = sim.autopilot().guidance().recovery_point();

    sim.run_for(20_000);
    assert_eq!(sim.status().mode, MissionMode::Heading);

    // Outage began at 5 s; 40 s of silence is well past the 30 s limit
    sim.run_for(25_000);
    let status = sim.status();
    assert_eq!(status.mode, MissionMode::Recovery);
    assert_eq!(status.mode_label, "RECOVERY");
    assert!(status.failsafe);
    assert_eq!(status.target, Some(recovery));

    // Link restored at 60 s: recovery holds until a mode command
    sim.run_for(25_000);
    assert!(sim.link().received() > 5);
    assert_eq!(sim.status().mode, MissionMode::Recovery);

    sim.send(Command::SetMode(MissionMode::Heading as u8))
        .unwrap();
    sim.run_for(2_000);
    let status = sim.status();
    assert_eq!(status.mode, MissionMode::Heading);
    assert!(!status.failsafe);
}

#[test]
fn recovery_stays_latched_through_non_mode_commands() {
    let mut sim = Scenario::LinkLoss.build(Some(SEED)).unwrap();
    let recovery = sim.autopilot().guidance().recovery_point();
    let origin = sim.boat().config().origin();
    sim.run_for(65_000);
    assert_eq!(sim.status().mode, MissionMode::Recovery);

    sim.send(Command::SetHeading(200.0)).unwrap();
    sim.send(Command::AddWaypoint {
        index: 0,
        successor: 0,
        point: point_from(origin, 100.0, 90.0),
    })
    .unwrap();
    sim.send(Command::SetTurnPolicy {
        jibe_allowed: false,
    })
    .unwrap();
    sim.run_for(5_000);

    let status = sim.status();
    assert_eq!(status.mode, MissionMode::Recovery);
    assert!(status.failsafe);
    assert_eq!(status.target, Some(recovery));
}

#[test]
fn waypoint_loop_is_followed() {
    let mut sim = Scenario::Waypoints.build(Some(SEED)).unwrap();

    let mut visited = vec![sim.status().waypoint_index];
    while sim.now_ms() < 450_000 && visited.len() < 4 {
        sim.step();
        let index = sim.status().waypoint_index;
        if visited.last() != Some(&index) {
            visited.push(index);
        }
    }
    assert_eq!(visited, [0, 1, 2, 0]);
}

#[test]
fn pitch_gust_spills_sail() {
    let mut sim = Scenario::Reach.build(Some(SEED)).unwrap();
    sim.run_for(10_000);
    let trimmed = sim.boat().sail().unwrap();
    assert!(trimmed < 90.0);

    sim.boat_mut().set_pitch(45.0);
    sim.run_for(200);
    assert_eq!(sim.boat().sail(), Some(90.0));
    assert!(sim.autopilot().sail().is_spilling());
}

#[test]
fn manual_mode_follows_overrides() {
    let mut sim = Scenario::Reach.build(Some(SEED)).unwrap();
    sim.run_for(2_000);
    sim.send(Command::SetMode(MissionMode::Manual as u8))
        .unwrap();
    sim.send(Command::RudderOverride(-20.0)).unwrap();
    sim.send(Command::SailOverride(50.0)).unwrap();
    sim.run_for(5_000);

    assert_eq!(sim.status().mode, MissionMode::Manual);
    assert!((sim.boat().rudder().target() + 20.0).abs() < 1e-3);
    assert_eq!(sim.boat().sail(), Some(50.0));
    assert!(sim.status().heading_target.is_none());
}

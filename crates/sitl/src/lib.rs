//! sailnav_sitl - Software-in-the-loop harness for the sailnav guidance core
//!
//! Runs the real `sailnav_core` autopilot against a kinematic boat in
//! simulated time:
//!
//! - [`boat`]: kinematic boat, rudder servo and synthesized sensors
//! - [`ground`]: simulated radio link and recovery point storage
//! - [`sim`]: lockstep simulation loop
//! - [`scenario`]: named scenarios used by `sail_sim` and the tests
//! - [`runner`]: the autopilot as a single tokio task fed by events

pub mod boat;
pub mod error;
pub mod ground;
pub mod runner;
pub mod scenario;
pub mod sim;

pub use boat::{BoatConfig, RudderConfig, RudderServo, SensorFrame, SimBoat};
pub use error::SimulatorError;
pub use ground::{MemoryRecoveryStore, Outage, SimLink};
pub use runner::{spawn_autopilot, AutopilotHandle, Event};
pub use scenario::{point_from, Scenario};
pub use sim::{Simulation, DEFAULT_STEP_MS};

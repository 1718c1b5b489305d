//! Lockstep simulation: one autopilot, one kinematic boat, one link.

use sailnav_core::traits::{MockTime, RecoveryStore, TimeSource};
use sailnav_core::{Autopilot, Command, StatusSnapshot};

use crate::boat::SimBoat;
use crate::error::SimulatorError;
use crate::ground::{MemoryRecoveryStore, SimLink};

/// Default simulation step, matching the estimator period.
pub const DEFAULT_STEP_MS: u64 = 100;

/// Autopilot driving a simulated boat in simulated time.
pub struct Simulation<R: RecoveryStore = MemoryRecoveryStore> {
    time: MockTime,
    step_ms: u64,
    boat: SimBoat,
    link: SimLink,
    autopilot: Autopilot<R>,
}

impl<R: RecoveryStore> Simulation<R> {
    /// Create a simulation at time 0.
    pub fn new(autopilot: Autopilot<R>, boat: SimBoat, link: SimLink, step_ms: u64) -> Self {
        Self {
            time: MockTime::new(),
            step_ms: step_ms.max(1),
            boat,
            link,
            autopilot,
        }
    }

    /// Run one autopilot tick at the current time, then advance the boat
    /// and the clock by one step.
    pub fn step(&mut self) {
        let now_ms = self.time.now_ms();
        self.link.service(now_ms);

        let sensors = self.boat.sensors();
        self.autopilot
            .tick(&self.time, &sensors, &mut self.boat, &self.link);

        self.boat.step(self.step_ms as f32 / 1000.0);
        self.time.advance_ms(self.step_ms);
    }

    /// Step until `duration_ms` of simulated time has passed.
    pub fn run_for(&mut self, duration_ms: u64) {
        let end_ms = self.time.now_ms() + duration_ms;
        while self.time.now_ms() < end_ms {
            self.step();
        }
    }

    /// Step until `predicate` holds or `timeout_ms` has passed.
    ///
    /// Returns true if the predicate was met.
    pub fn run_until<F>(&mut self, timeout_ms: u64, mut predicate: F) -> bool
    where
        F: FnMut(&Self) -> bool,
    {
        let end_ms = self.time.now_ms() + timeout_ms;
        while self.time.now_ms() < end_ms {
            self.step();
            if predicate(self) {
                return true;
            }
        }
        false
    }

    /// Send a ground command over the simulated link.
    ///
    /// Fails with [`SimulatorError::LinkDown`] during an outage.
    pub fn send(&mut self, command: Command) -> Result<(), SimulatorError> {
        let now_ms = self.time.now_ms();
        if !self.link.deliver(now_ms) {
            return Err(SimulatorError::LinkDown(now_ms));
        }
        self.autopilot.handle_command(command)?;
        Ok(())
    }

    /// Simulated time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn status(&self) -> StatusSnapshot {
        self.autopilot.status()
    }

    pub fn boat(&self) -> &SimBoat {
        &self.boat
    }

    pub fn boat_mut(&mut self) -> &mut SimBoat {
        &mut self.boat
    }

    pub fn link(&self) -> &SimLink {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut SimLink {
        &mut self.link
    }

    pub fn autopilot(&self) -> &Autopilot<R> {
        &self.autopilot
    }

    pub fn autopilot_mut(&mut self) -> &mut Autopilot<R> {
        &mut self.autopilot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boat::BoatConfig;
    use sailnav_core::guidance::MissionMode;
    use sailnav_core::parameters::ParameterStore;

    fn heading_sim(initial_heading: f32) -> Simulation {
        let boat = SimBoat::new(BoatConfig {
            initial_heading_deg: initial_heading,
            seed: Some(1),
            ..BoatConfig::default()
        });
        let autopilot = Autopilot::new(ParameterStore::new(), MemoryRecoveryStore::default());
        Simulation::new(autopilot, boat, SimLink::new(1000), DEFAULT_STEP_MS)
    }

    #[test]
    fn test_clock_advances_per_step() {
        let mut sim = heading_sim(0.0);
        sim.step();
        sim.step();
        assert_eq!(sim.now_ms(), 200);
        sim.run_for(1000);
        assert_eq!(sim.now_ms(), 1200);
    }

    #[test]
    fn test_heading_hold_converges() {
        let mut sim = heading_sim(0.0);
        sim.send(Command::SetMode(MissionMode::Heading as u8)).unwrap();
        sim.send(Command::SetHeading(120.0)).unwrap();
        sim.run_for(20_000);
        let error = sailnav_core::navigation::geo::angular_diff(sim.boat().heading(), 120.0);
        assert!(error.abs() < 5.0, "heading error {error}");
    }

    #[test]
    fn test_command_lost_during_outage() {
        let mut sim = heading_sim(0.0);
        sim.link_mut().add_outage(0, 5000);
        assert!(matches!(
            sim.send(Command::SetHeading(10.0)),
            Err(SimulatorError::LinkDown(0))
        ));
    }

    #[test]
    fn test_rejected_command_is_reported() {
        let mut sim = heading_sim(0.0);
        assert!(matches!(
            sim.send(Command::ForceTack),
            Err(SimulatorError::CommandRejected(
                sailnav_core::CommandError::NoPositionFix
            ))
        ));
    }

    #[test]
    fn test_run_until() {
        let mut sim = heading_sim(0.0);
        assert!(sim.run_until(5000, |s| s.now_ms() >= 1000));
        assert_eq!(sim.now_ms(), 1000);
        assert!(!sim.run_until(500, |_| false));
    }
}

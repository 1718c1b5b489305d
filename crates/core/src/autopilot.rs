//! Autopilot facade
//!
//! Owns the estimator, tack planner, sail trim and mission arbiter and runs
//! them from a single [`Autopilot::tick`]. Sensors, actuators, the link
//! monitor and the clock are passed in on every tick; only the recovery
//! point store is owned.
//!
//! ## Tick order
//!
//! 1. State estimation (own period), then the pitch safety spill
//! 2. Mission arbitration (own period), link-loss fail-safe first
//! 3. Tack planner (own period) while the mode routes through it
//! 4. Rudder: pending override, planner rudder, or heading hold
//! 5. Automatic sail trim (throttled), except in manual mode and during turns

use heapless::String;

use crate::estimator::StateEstimator;
use crate::guidance::{Guidance, MissionMode, ModeDirective};
use crate::navigation::{GeoPoint, NavState, SteeringCommand, TackPlanner, TurnPolicy};
use crate::parameters::{
    register_all_defaults, EstimatorParams, GuidanceParams, NavigationParams, ParamValue,
    ParameterError, ParameterStore, SailParams, PARAM_NAME_LEN,
};
use crate::sail::SailTrim;
use crate::traits::{ActuationSink, BoatSensors, LinkMonitor, RecoveryStore, StorageError, TimeSource};

/// Ground command
///
/// Typed form of the commands received over the link; the link parser lives
/// outside the core.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Select a mission mode (raw value, unknown values select recovery)
    SetMode(u8),
    /// Heading held in heading mode (degrees)
    SetHeading(f32),
    /// Turn direction policy; jibing keeps the bow out of the wind
    SetTurnPolicy { jibe_allowed: bool },
    /// Replace and persist the recovery point
    SetRecoveryPoint(GeoPoint),
    /// Use the current position fix as recovery point
    SetRecoveryHere,
    /// Store a waypoint
    AddWaypoint {
        index: usize,
        successor: usize,
        point: GeoPoint,
    },
    /// Change tack side now (indirect course only)
    ForceTack,
    /// Abandon the turn maneuver in progress
    StopManeuver,
    /// Drive the rudder directly (degrees)
    RudderOverride(f32),
    /// Drive the sail directly (degrees)
    SailOverride(f32),
    /// Change a tunable
    SetParam {
        name: String<PARAM_NAME_LEN>,
        value: ParamValue,
    },
    /// Re-initialize every component from the current parameters
    Reset,
}

/// Command rejected by the autopilot
///
/// The boat keeps running in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Parameter store rejected the change
    Parameter(ParameterError),
    /// Recovery point could not be persisted (the in-memory point was updated)
    Storage(StorageError),
    /// No position fix available yet
    NoPositionFix,
    /// Tack change requested outside an indirect course
    NotTacking,
    /// Non-finite angle or coordinate
    InvalidValue,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::Parameter(e) => write!(f, "parameter rejected: {}", e),
            CommandError::Storage(e) => write!(f, "{}", e),
            CommandError::NoPositionFix => write!(f, "no position fix"),
            CommandError::NotTacking => write!(f, "not on an indirect course"),
            CommandError::InvalidValue => write!(f, "invalid value"),
        }
    }
}

impl core::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            CommandError::Parameter(e) => Some(e),
            CommandError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParameterError> for CommandError {
    fn from(e: ParameterError) -> Self {
        CommandError::Parameter(e)
    }
}

impl From<StorageError> for CommandError {
    fn from(e: StorageError) -> Self {
        CommandError::Storage(e)
    }
}

/// Telemetry snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusSnapshot {
    /// Time of the last tick (ms)
    pub time_ms: u64,
    pub mode: MissionMode,
    pub mode_label: &'static str,
    /// Waypoint cursor
    pub waypoint_index: usize,
    pub nav_state: NavState,
    pub nav_label: &'static str,
    /// Planner target, only while the mode routes through the planner
    pub target: Option<GeoPoint>,
    /// Bearing from the position fix to the target (degrees)
    pub target_bearing: Option<f32>,
    /// Filtered heading (degrees)
    pub heading: f32,
    /// Filtered absolute wind bearing (degrees)
    pub wind_bearing: f32,
    /// Heading hold target while engaged
    pub heading_target: Option<f32>,
    pub position: Option<GeoPoint>,
    /// Last rudder command sent
    pub rudder: Option<f32>,
    /// Last sail command sent
    pub sail: Option<f32>,
    /// Link-loss fail-safe holding the boat in recovery
    pub failsafe: bool,
}

/// Guidance and navigation core of the boat
pub struct Autopilot<R: RecoveryStore> {
    params: ParameterStore,
    recovery_store: R,
    estimator: StateEstimator,
    planner: TackPlanner,
    sail: SailTrim,
    guidance: Guidance,
    pending_rudder: Option<f32>,
    pending_sail: Option<f32>,
    last_rudder: Option<f32>,
    last_sail: Option<f32>,
    now_ms: u64,
}

impl<R: RecoveryStore> Autopilot<R> {
    /// Build the autopilot from a parameter store
    ///
    /// Missing parameters are registered with their defaults. The recovery
    /// point is loaded from `recovery_store` (the origin if nothing is stored).
    pub fn new(mut params: ParameterStore, mut recovery_store: R) -> Self {
        if let Err(e) = register_all_defaults(&mut params) {
            log_error!("Parameter registration failed: {}", e.as_str());
        }
        let recovery_point = load_recovery_point(&mut recovery_store);

        Self {
            estimator: StateEstimator::new(EstimatorParams::from_store(&params)),
            planner: TackPlanner::new(NavigationParams::from_store(&params)),
            sail: SailTrim::new(SailParams::from_store(&params)),
            guidance: Guidance::new(GuidanceParams::from_store(&params), recovery_point),
            params,
            recovery_store,
            pending_rudder: None,
            pending_sail: None,
            last_rudder: None,
            last_sail: None,
            now_ms: 0,
        }
    }

    /// Run one control tick
    pub fn tick<T, S, A, L>(&mut self, clock: &T, sensors: &S, actuators: &mut A, link: &L)
    where
        T: TimeSource,
        S: BoatSensors,
        A: ActuationSink,
        L: LinkMonitor,
    {
        let now_ms = clock.now_ms();
        self.now_ms = now_ms;

        let estimated = self.estimator.update(now_ms, sensors);
        if estimated {
            if let Some(angle) = self.sail.check_safety(now_ms, self.estimator.pitch_deg()) {
                self.send_sail(actuators, angle);
            }
        }

        let mut steer_changed = false;
        if let Some(directive) =
            self.guidance
                .update(now_ms, self.estimator.position(), link.last_command_ms())
        {
            steer_changed |= self.apply_directive(directive);
        }

        let mut planner_rudder = None;
        if let (ModeDirective::Navigate(Some(target)), Some(position)) =
            (self.guidance.directive(), self.estimator.position())
        {
            if let Some(command) =
                self.planner
                    .update(now_ms, position, target, &self.estimator, &self.estimator)
            {
                planner_rudder = self.apply_steering(command);
                steer_changed = true;
            }
        }

        if let Some(rudder) = self.pending_rudder.take() {
            self.send_rudder(actuators, rudder);
        } else if let Some(rudder) = planner_rudder {
            self.send_rudder(actuators, rudder);
        } else if estimated || steer_changed {
            if let Some(rudder) = self.estimator.heading_hold_command() {
                self.send_rudder(actuators, rudder);
            }
        }

        if let Some(angle) = self.pending_sail.take() {
            self.send_sail(actuators, angle);
        } else if self.auto_sail_active() {
            let wind = self.estimator.wind_bearing();
            let heading = self.estimator.heading();
            if let Some(angle) = self.sail.auto_trim(now_ms, wind, heading) {
                self.send_sail(actuators, angle);
            }
        }
    }

    /// Dispatch a ground command
    pub fn handle_command(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::SetMode(raw) => {
                self.set_mission_mode(MissionMode::from_u8(raw));
                Ok(())
            }
            Command::SetHeading(heading) => self.set_fixed_heading_target(heading),
            Command::SetTurnPolicy { jibe_allowed } => {
                self.set_turn_policy(jibe_allowed);
                Ok(())
            }
            Command::SetRecoveryPoint(point) => self.set_recovery_point(point),
            Command::SetRecoveryHere => self.set_recovery_here(),
            Command::AddWaypoint {
                index,
                successor,
                point,
            } => {
                self.add_or_update_waypoint(index, successor, point)?;
                Ok(())
            }
            Command::ForceTack => self.force_tack_change(),
            Command::StopManeuver => {
                self.finish_maneuver();
                Ok(())
            }
            Command::RudderOverride(deg) => self.override_rudder(deg),
            Command::SailOverride(deg) => self.override_sail(deg),
            Command::SetParam { name, value } => self.set_parameter(&name, value),
            Command::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Select a mission mode; clears the link-loss fail-safe
    pub fn set_mission_mode(&mut self, mode: MissionMode) {
        self.guidance.set_mission_mode(mode);
        if !mode.uses_planner() {
            self.planner.finish_maneuver();
        }
    }

    /// Heading held in heading mode
    pub fn set_fixed_heading_target(&mut self, heading: f32) -> Result<(), CommandError> {
        if !heading.is_finite() {
            return Err(CommandError::InvalidValue);
        }
        self.guidance.set_heading_target(heading);
        if let ModeDirective::HoldHeading(target) = self.guidance.directive() {
            self.estimator.heading_hold_mut().engage(target);
        }
        Ok(())
    }

    /// Choose how turn directions are picked
    ///
    /// Jibing turns away from the wind; otherwise the shorter rotation is
    /// taken, even through the wind.
    pub fn set_turn_policy(&mut self, jibe_allowed: bool) {
        let policy = if jibe_allowed {
            TurnPolicy::AvoidWind
        } else {
            TurnPolicy::Shortest
        };
        self.planner.set_turn_policy(policy);
    }

    /// Replace the recovery point and persist it
    ///
    /// The in-memory point is updated even if persisting fails.
    pub fn set_recovery_point(&mut self, point: GeoPoint) -> Result<(), CommandError> {
        if !point.is_finite() {
            return Err(CommandError::InvalidValue);
        }
        self.guidance.set_recovery_point(point);
        log_info!("Recovery point {} {}", point.latitude, point.longitude);
        if let Err(e) = self.recovery_store.save(point) {
            log_error!("Recovery point not persisted: {}", e.as_str());
            return Err(CommandError::Storage(e));
        }
        Ok(())
    }

    /// Use the last position fix as recovery point
    pub fn set_recovery_here(&mut self) -> Result<(), CommandError> {
        let position = self.estimator.position().ok_or(CommandError::NoPositionFix)?;
        self.set_recovery_point(position)
    }

    /// Store a waypoint; returns the slot written
    pub fn add_or_update_waypoint(
        &mut self,
        index: usize,
        successor: usize,
        point: GeoPoint,
    ) -> Result<usize, CommandError> {
        if !point.is_finite() {
            return Err(CommandError::InvalidValue);
        }
        Ok(self.guidance.add_or_update_waypoint(index, successor, point))
    }

    /// Change tack side now
    ///
    /// Only available on an indirect course with a position fix.
    pub fn force_tack_change(&mut self) -> Result<(), CommandError> {
        let position = self.estimator.position().ok_or(CommandError::NoPositionFix)?;
        let command = self
            .planner
            .change_tack(self.now_ms, position, &self.estimator, &self.estimator)
            .ok_or(CommandError::NotTacking)?;
        if let Some(rudder) = self.apply_steering(command) {
            self.pending_rudder = Some(rudder);
        }
        Ok(())
    }

    /// Abandon the turn maneuver in progress
    pub fn finish_maneuver(&mut self) {
        self.planner.finish_maneuver();
    }

    /// Drive the rudder directly until the next steering decision
    pub fn override_rudder(&mut self, deflection_deg: f32) -> Result<(), CommandError> {
        if !deflection_deg.is_finite() {
            return Err(CommandError::InvalidValue);
        }
        self.estimator.heading_hold_mut().disengage();
        self.pending_rudder = Some(deflection_deg);
        Ok(())
    }

    /// Drive the sail directly, bypassing the throttle
    pub fn override_sail(&mut self, angle_deg: f32) -> Result<(), CommandError> {
        let angle = self
            .sail
            .set_direct(angle_deg)
            .ok_or(CommandError::InvalidValue)?;
        self.pending_sail = Some(angle);
        Ok(())
    }

    /// Change a tunable and reload every component's parameters
    ///
    /// A value leaving the planner or sail configuration inconsistent is
    /// rolled back and reported as [`ParameterError::InvalidConfig`].
    pub fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), CommandError> {
        let previous = self.params.get(name).copied();
        if let Err(e) = self.params.set(name, value) {
            log_warn!("Parameter {} rejected: {}", name, e.as_str());
            return Err(CommandError::Parameter(e));
        }
        let consistent = NavigationParams::from_store(&self.params).is_valid()
            && SailParams::from_store(&self.params).is_valid();
        if !consistent {
            if let Some(previous) = previous {
                self.params.set(name, previous)?;
            }
            log_warn!("Parameter {} = {} is inconsistent", name, value.as_f32());
            return Err(CommandError::Parameter(ParameterError::InvalidConfig));
        }
        log_info!("Parameter {} = {}", name, value.as_f32());
        self.reload_params();
        Ok(())
    }

    /// Re-initialize every component from the current parameters
    ///
    /// Waypoints are cleared, the mode returns to its configured default and
    /// the recovery point is reloaded from the store.
    pub fn reset(&mut self) {
        log_info!("Autopilot reset");
        let recovery_point = load_recovery_point(&mut self.recovery_store);
        self.estimator = StateEstimator::new(EstimatorParams::from_store(&self.params));
        self.planner = TackPlanner::new(NavigationParams::from_store(&self.params));
        self.sail = SailTrim::new(SailParams::from_store(&self.params));
        self.guidance = Guidance::new(GuidanceParams::from_store(&self.params), recovery_point);
        self.pending_rudder = None;
        self.pending_sail = None;
        self.last_rudder = None;
        self.last_sail = None;
    }

    /// Telemetry snapshot
    pub fn status(&self) -> StatusSnapshot {
        let mode = self.guidance.mode();
        let nav_state = self.planner.nav_state();
        let position = self.estimator.position();
        let target = self.guidance.directive().target();
        let target_bearing = match (position, target) {
            (Some(from), Some(to)) => Some(from.bearing_to(&to)),
            _ => None,
        };
        let hold = self.estimator.heading_hold();

        StatusSnapshot {
            time_ms: self.now_ms,
            mode,
            mode_label: mode.label(),
            waypoint_index: self.guidance.waypoints().current_index(),
            nav_state,
            nav_label: nav_state.label(),
            target,
            target_bearing,
            heading: self.estimator.heading(),
            wind_bearing: self.estimator.wind_bearing(),
            heading_target: hold.is_engaged().then(|| hold.target()),
            position,
            rudder: self.last_rudder,
            sail: self.last_sail,
            failsafe: self.guidance.is_failsafe_active(),
        }
    }

    /// Parameter store
    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    pub fn estimator(&self) -> &StateEstimator {
        &self.estimator
    }

    pub fn planner(&self) -> &TackPlanner {
        &self.planner
    }

    pub fn sail(&self) -> &SailTrim {
        &self.sail
    }

    pub fn guidance(&self) -> &Guidance {
        &self.guidance
    }

    /// Recovery point store
    pub fn recovery_store(&self) -> &R {
        &self.recovery_store
    }

    fn reload_params(&mut self) {
        self.estimator
            .set_params(EstimatorParams::from_store(&self.params));
        self.planner
            .set_params(NavigationParams::from_store(&self.params));
        self.sail.set_params(SailParams::from_store(&self.params));
        self.guidance
            .set_params(GuidanceParams::from_store(&self.params));
    }

    /// Returns true if heading hold was (re)targeted
    fn apply_directive(&mut self, directive: ModeDirective) -> bool {
        match directive {
            ModeDirective::Navigate(_) => false,
            ModeDirective::HoldHeading(heading) => {
                self.planner.finish_maneuver();
                self.estimator.heading_hold_mut().engage(heading);
                true
            }
            ModeDirective::Manual => {
                self.planner.finish_maneuver();
                self.estimator.heading_hold_mut().disengage();
                false
            }
        }
    }

    /// Route a planner command; returns the fixed rudder to send, if any
    fn apply_steering(&mut self, command: SteeringCommand) -> Option<f32> {
        let hold = self.estimator.heading_hold_mut();
        match command {
            SteeringCommand::HoldHeading(heading) => {
                hold.engage(heading);
                None
            }
            SteeringCommand::Rudder(rudder) => {
                hold.disengage();
                Some(rudder)
            }
        }
    }

    fn auto_sail_active(&self) -> bool {
        self.planner.params().auto_sail
            && self.guidance.mode() != MissionMode::Manual
            && !self.planner.is_turning()
    }

    fn send_rudder<A: ActuationSink>(&mut self, actuators: &mut A, deflection_deg: f32) {
        actuators.apply_rudder(deflection_deg);
        self.last_rudder = Some(deflection_deg);
    }

    fn send_sail<A: ActuationSink>(&mut self, actuators: &mut A, angle_deg: f32) {
        actuators.apply_sail(angle_deg);
        self.last_sail = Some(angle_deg);
    }
}

fn load_recovery_point<R: RecoveryStore>(store: &mut R) -> GeoPoint {
    match store.load().filter(GeoPoint::is_finite) {
        Some(point) => {
            log_info!("Recovery point loaded: {} {}", point.latitude, point.longitude);
            point
        }
        None => {
            log_warn!("No recovery point stored, using origin");
            GeoPoint::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Attitude, MockTime, NullRecoveryStore};
    use core::cell::Cell;
    use libm::{cosf, sinf};
    use nalgebra::Vector3;
    use std::vec::Vec;

    struct FakeSensors {
        heading: Cell<f32>,
        vane: Cell<Option<f32>>,
        pitch: Cell<f32>,
        position: Cell<Option<GeoPoint>>,
    }

    impl FakeSensors {
        fn new() -> Self {
            Self {
                heading: Cell::new(0.0),
                vane: Cell::new(None),
                pitch: Cell::new(0.0),
                position: Cell::new(None),
            }
        }
    }

    impl BoatSensors for FakeSensors {
        fn wind_vane_angle(&self) -> Option<f32> {
            self.vane.get()
        }

        fn attitude(&self) -> Option<Attitude> {
            Some(Attitude::new(0.0, self.pitch.get().to_radians()))
        }

        fn compass(&self) -> Option<Vector3<f32>> {
            // With a zero compass offset, heading H reads as field (sin(-H), cos(-H))
            let h = -self.heading.get().to_radians();
            Some(Vector3::new(sinf(h), cosf(h), 0.0))
        }

        fn position(&self) -> Option<GeoPoint> {
            self.position.get()
        }
    }

    #[derive(Default)]
    struct RecordingActuators {
        rudder: Vec<f32>,
        sail: Vec<f32>,
    }

    impl ActuationSink for RecordingActuators {
        fn apply_rudder(&mut self, deflection_deg: f32) {
            self.rudder.push(deflection_deg);
        }

        fn apply_sail(&mut self, angle_deg: f32) {
            self.sail.push(angle_deg);
        }
    }

    struct FakeLink(Cell<u64>);

    impl LinkMonitor for FakeLink {
        fn last_command_ms(&self) -> u64 {
            self.0.get()
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        point: Option<GeoPoint>,
        fail: bool,
    }

    impl RecoveryStore for MemoryStore {
        fn load(&mut self) -> Option<GeoPoint> {
            self.point
        }

        fn save(&mut self, point: GeoPoint) -> Result<(), StorageError> {
            if self.fail {
                return Err(StorageError::WriteFailed);
            }
            self.point = Some(point);
            Ok(())
        }
    }

    fn store_with(entries: &[(&str, ParamValue)]) -> ParameterStore {
        let mut store = ParameterStore::new();
        register_all_defaults(&mut store).unwrap();
        for (name, value) in entries {
            store.set(name, *value).unwrap();
        }
        store
    }

    /// Compass offset and vane offset zeroed: vane reading = heading - wind
    fn plain_store() -> ParameterStore {
        store_with(&[
            ("CMP_OFFSET", ParamValue::Float(0.0)),
            ("WND_VANE_OFS", ParamValue::Float(0.0)),
        ])
    }

    struct Rig {
        time: MockTime,
        sensors: FakeSensors,
        actuators: RecordingActuators,
        link: FakeLink,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                time: MockTime::new(),
                sensors: FakeSensors::new(),
                actuators: RecordingActuators::default(),
                link: FakeLink(Cell::new(0)),
            }
        }

        fn tick<R: RecoveryStore>(&mut self, pilot: &mut Autopilot<R>) {
            pilot.tick(&self.time, &self.sensors, &mut self.actuators, &self.link);
        }

        /// Tick every 100 ms for `ms`, keeping the link alive
        fn run<R: RecoveryStore>(&mut self, pilot: &mut Autopilot<R>, ms: u64) {
            for _ in 0..ms / 100 {
                self.link.0.set(self.time.now_ms());
                self.tick(pilot);
                self.time.advance_ms(100);
            }
        }
    }

    // ========== Construction ==========

    #[test]
    fn test_new_registers_defaults_and_loads_recovery_point() {
        let home = GeoPoint::new(43.1, 5.9);
        let pilot = Autopilot::new(
            ParameterStore::new(),
            MemoryStore {
                point: Some(home),
                fail: false,
            },
        );
        assert_eq!(pilot.parameters().len(), 30);
        assert_eq!(pilot.guidance().recovery_point(), home);
        assert_eq!(pilot.guidance().mode(), MissionMode::Heading);
    }

    #[test]
    fn test_missing_recovery_point_defaults_to_origin() {
        let pilot = Autopilot::new(ParameterStore::new(), NullRecoveryStore);
        assert_eq!(pilot.guidance().recovery_point(), GeoPoint::default());
    }

    // ========== Heading mode ==========

    #[test]
    fn test_heading_mode_steers_with_heading_hold() {
        let mut rig = Rig::new();
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        pilot.set_fixed_heading_target(30.0).unwrap();
        rig.sensors.heading.set(10.0);

        rig.tick(&mut pilot);
        let rudder = *rig.actuators.rudder.last().unwrap();
        // kp 2.5 * 20° of error
        assert!((rudder - 50.0).abs() < 0.1);

        let status = pilot.status();
        assert_eq!(status.mode_label, "HEADING");
        assert!(status.target.is_none());
        assert!((status.heading_target.unwrap() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_auto_sail_trims_for_relative_wind() {
        let mut rig = Rig::new();
        let mut pilot = Autopilot::new(
            store_with(&[
                ("CMP_OFFSET", ParamValue::Float(0.0)),
                ("WND_VANE_OFS", ParamValue::Float(0.0)),
                ("WND_MANUAL", ParamValue::Bool(true)),
                ("WND_MAN_VAL", ParamValue::Float(180.0)),
            ]),
            NullRecoveryStore,
        );
        rig.tick(&mut pilot);
        // Heading 0, wind from 180: dead downwind, sail fully eased
        assert_eq!(rig.actuators.sail.last().copied(), Some(90.0));
    }

    #[test]
    fn test_pitch_spills_sail() {
        let mut rig = Rig::new();
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        rig.run(&mut pilot, 500);
        rig.sensors.pitch.set(50.0);
        rig.tick(&mut pilot);
        assert_eq!(rig.actuators.sail.last().copied(), Some(90.0));
        assert!(pilot.sail().is_spilling());
    }

    // ========== Navigation ==========

    #[test]
    fn test_recovery_mode_navigates_to_recovery_point() {
        let mut rig = Rig::new();
        let home = GeoPoint::new(43.001, 5.0);
        let mut pilot = Autopilot::new(
            store_with(&[
                ("CMP_OFFSET", ParamValue::Float(0.0)),
                ("WND_VANE_OFS", ParamValue::Float(0.0)),
                ("WND_MANUAL", ParamValue::Bool(true)),
                ("WND_MAN_VAL", ParamValue::Float(90.0)),
            ]),
            MemoryStore {
                point: Some(home),
                fail: false,
            },
        );
        rig.sensors.position.set(Some(GeoPoint::new(43.0, 5.0)));
        pilot.set_mission_mode(MissionMode::Recovery);
        rig.run(&mut pilot, 300);

        let status = pilot.status();
        assert_eq!(status.mode, MissionMode::Recovery);
        assert_eq!(status.target, Some(home));
        assert_eq!(status.nav_label, "DIRECT");
        // Home is due north, wind on the beam
        assert!(status.target_bearing.unwrap().abs() < 0.5);
        assert!(status.heading_target.unwrap() < 0.5 || status.heading_target.unwrap() > 359.5);
    }

    #[test]
    fn test_link_loss_forces_recovery() {
        let mut rig = Rig::new();
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        rig.tick(&mut pilot);
        rig.time.set_ms(40_000);
        rig.tick(&mut pilot);
        let status = pilot.status();
        assert_eq!(status.mode, MissionMode::Recovery);
        assert!(status.failsafe);

        // Link back: still recovering until a mode command
        rig.link.0.set(40_000);
        rig.time.advance_ms(1000);
        rig.tick(&mut pilot);
        assert_eq!(pilot.status().mode, MissionMode::Recovery);

        pilot.handle_command(Command::SetMode(1)).unwrap();
        rig.time.advance_ms(100);
        rig.tick(&mut pilot);
        assert_eq!(pilot.status().mode, MissionMode::Heading);
        assert!(!pilot.status().failsafe);
    }

    #[test]
    fn test_force_tack_requires_indirect_course() {
        let mut rig = Rig::new();
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        assert_eq!(pilot.force_tack_change(), Err(CommandError::NoPositionFix));
        rig.sensors.position.set(Some(GeoPoint::new(43.0, 5.0)));
        rig.tick(&mut pilot);
        assert_eq!(pilot.force_tack_change(), Err(CommandError::NotTacking));
    }

    // ========== Commands ==========

    #[test]
    fn test_unknown_mode_value_selects_recovery() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        pilot.handle_command(Command::SetMode(9)).unwrap();
        assert_eq!(pilot.guidance().mode(), MissionMode::Recovery);
    }

    #[test]
    fn test_manual_mode_uses_overrides_only() {
        let mut rig = Rig::new();
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        pilot.set_mission_mode(MissionMode::Manual);
        rig.tick(&mut pilot);
        assert!(rig.actuators.rudder.is_empty());
        assert!(rig.actuators.sail.is_empty());

        pilot.handle_command(Command::RudderOverride(-12.0)).unwrap();
        pilot.handle_command(Command::SailOverride(200.0)).unwrap();
        rig.time.advance_ms(100);
        rig.tick(&mut pilot);
        assert_eq!(rig.actuators.rudder, [-12.0]);
        assert_eq!(rig.actuators.sail, [90.0]);

        // Nothing more without new overrides
        rig.time.advance_ms(100);
        rig.tick(&mut pilot);
        assert_eq!(rig.actuators.rudder.len(), 1);
        assert_eq!(pilot.status().rudder, Some(-12.0));
    }

    #[test]
    fn test_override_rejects_nan() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        assert_eq!(
            pilot.handle_command(Command::RudderOverride(f32::NAN)),
            Err(CommandError::InvalidValue)
        );
        assert_eq!(
            pilot.handle_command(Command::SailOverride(f32::INFINITY)),
            Err(CommandError::InvalidValue)
        );
    }

    #[test]
    fn test_set_parameter_reloads_components() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        let mut name = String::new();
        name.push_str("NAV_CLOSE_ANG").unwrap();
        pilot
            .handle_command(Command::SetParam {
                name,
                value: ParamValue::Float(50.0),
            })
            .unwrap();
        assert!((pilot.planner().params().close_hauled_angle - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_unknown_parameter_is_reported() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        assert_eq!(
            pilot.set_parameter("NOPE", ParamValue::Int(1)),
            Err(CommandError::Parameter(ParameterError::UnknownParameter))
        );
    }

    #[test]
    fn test_inconsistent_parameter_is_rolled_back() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        assert_eq!(
            pilot.set_parameter("NAV_TACK_MIN", ParamValue::Float(80.0)),
            Err(CommandError::Parameter(ParameterError::InvalidConfig))
        );
        assert_eq!(
            pilot.parameters().get("NAV_TACK_MIN"),
            Some(&ParamValue::Float(4.0))
        );
        assert!((pilot.planner().params().min_tack_distance - 4.0).abs() < 1e-3);

        assert!(pilot.set_parameter("SAIL_MIN", ParamValue::Float(95.0)).is_err());
        assert!((pilot.sail().params().min_angle - 35.0).abs() < 1e-3);
    }

    #[test]
    fn test_loop_period_cannot_change_at_runtime() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        assert_eq!(
            pilot.set_parameter("NAV_PERIOD", ParamValue::Int(500)),
            Err(CommandError::Parameter(ParameterError::ReadOnly))
        );
        assert_eq!(pilot.planner().params().period_ms, 100);
    }

    #[test]
    fn test_turn_policy_command() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        pilot
            .handle_command(Command::SetTurnPolicy {
                jibe_allowed: false,
            })
            .unwrap();
        assert_eq!(pilot.planner().turn_policy(), TurnPolicy::Shortest);
        pilot.set_turn_policy(true);
        assert_eq!(pilot.planner().turn_policy(), TurnPolicy::AvoidWind);
    }

    #[test]
    fn test_turn_policy_survives_parameter_change() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        pilot.set_turn_policy(false);
        pilot
            .set_parameter("WP_RADIUS", ParamValue::Float(6.0))
            .unwrap();
        assert_eq!(pilot.planner().turn_policy(), TurnPolicy::Shortest);

        pilot
            .set_parameter("NAV_TURN_POL", ParamValue::Int(1))
            .unwrap();
        pilot
            .set_parameter("NAV_TURN_POL", ParamValue::Int(0))
            .unwrap();
        assert_eq!(pilot.planner().turn_policy(), TurnPolicy::AvoidWind);
    }

    #[test]
    fn test_recovery_here_persists_position() {
        let mut rig = Rig::new();
        let mut pilot = Autopilot::new(plain_store(), MemoryStore::default());
        assert_eq!(pilot.set_recovery_here(), Err(CommandError::NoPositionFix));

        let here = GeoPoint::new(48.4, -4.5);
        rig.sensors.position.set(Some(here));
        rig.tick(&mut pilot);
        pilot.handle_command(Command::SetRecoveryHere).unwrap();
        assert_eq!(pilot.guidance().recovery_point(), here);
        assert_eq!(pilot.recovery_store().point, Some(here));
    }

    #[test]
    fn test_storage_failure_keeps_point_in_memory() {
        let mut pilot = Autopilot::new(
            plain_store(),
            MemoryStore {
                point: None,
                fail: true,
            },
        );
        let point = GeoPoint::new(43.2, 5.3);
        assert_eq!(
            pilot.set_recovery_point(point),
            Err(CommandError::Storage(StorageError::WriteFailed))
        );
        assert_eq!(pilot.guidance().recovery_point(), point);
    }

    #[test]
    fn test_waypoint_index_clamped() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        let slot = pilot
            .add_or_update_waypoint(12, 0, GeoPoint::new(43.0, 5.0))
            .unwrap();
        assert_eq!(slot, 4);
    }

    #[test]
    fn test_reset_clears_waypoints_and_mode() {
        let mut pilot = Autopilot::new(plain_store(), NullRecoveryStore);
        pilot
            .add_or_update_waypoint(0, 0, GeoPoint::new(43.0, 5.0))
            .unwrap();
        pilot.set_mission_mode(MissionMode::Waypoints);
        pilot.handle_command(Command::Reset).unwrap();
        assert!(pilot.guidance().waypoints().is_empty());
        assert_eq!(pilot.guidance().mode(), MissionMode::Heading);
    }
}

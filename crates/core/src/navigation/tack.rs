//! Tack/turn planner
//!
//! Decides every planner tick how to steer towards a target point:
//!
//! - **Direct course**: hold the bearing to the target.
//! - **Indirect course**: the target lies too close to the wind; hold the
//!   close-hauled bearing of the current tack side and change side after
//!   `max_tack_distance` meters.
//! - **Turn maneuver**: a change of course whose short rotation passes through
//!   the wind is executed with a fixed rudder deflection instead of heading
//!   hold, with stall detection and direction reversal.
//!
//! The planner never touches actuators itself. It returns a
//! [`SteeringCommand`] for the caller to route to heading hold or the rudder.

use super::geo::{angular_diff, is_between, is_left_of, wrap_360};
use super::heading::{HeadingSource, WindSource};
use super::types::{GeoPoint, NavState, SteeringCommand, TurnDirection, TurnPolicy};
use crate::parameters::NavigationParams;
use crate::scheduler::PeriodicGate;

/// Which threshold of the hysteresis band a feasibility test uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteMargin {
    /// `upwind - hysteresis`, used while on a direct course
    Lenient,
    /// `upwind + hysteresis`, used to leave an indirect course
    Strict,
}

/// Mutable planner state
#[derive(Clone, Copy, Debug)]
pub struct TackState {
    /// Wind over the port side: close-hauled bearing is `wind + angle`
    pub on_port: bool,
    /// Turn maneuver in progress
    pub turning: bool,
    /// Direction of the current (or last) turn
    pub turn_direction: TurnDirection,
    /// Heading the current turn aims for (degrees)
    pub turn_target: f32,
    /// Indirect (tacking) course active
    pub indirect_active: bool,
    /// Position where the current tack started
    pub tack_start: GeoPoint,
    /// Time the current turn attempt started (ms)
    pub turn_started_ms: u64,
}

impl Default for TackState {
    fn default() -> Self {
        Self {
            on_port: true,
            turning: false,
            turn_direction: TurnDirection::Left,
            turn_target: 0.0,
            indirect_active: false,
            tack_start: GeoPoint::default(),
            turn_started_ms: 0,
        }
    }
}

/// True if the wind comes over the port side for this heading
///
/// That is, the heading lies within 180° clockwise of the wind bearing.
pub fn is_on_port(heading: f32, wind: f32) -> bool {
    is_between(heading, wind, wind + 180.0)
}

/// True if turning from `heading` to `target` the short way crosses the wind
pub fn is_turn_needed(heading: f32, target: f32, wind: f32) -> bool {
    if is_left_of(heading, target) {
        is_between(wind, heading, target)
    } else {
        is_between(wind, target, heading)
    }
}

/// Tack/turn planner
pub struct TackPlanner {
    params: NavigationParams,
    policy: TurnPolicy,
    state: TackState,
    gate: PeriodicGate,
}

impl TackPlanner {
    /// Create a planner on a direct course
    pub fn new(params: NavigationParams) -> Self {
        Self {
            policy: params.turn_policy,
            gate: PeriodicGate::new(params.period_ms),
            state: TackState::default(),
            params,
        }
    }

    /// Return to the initial direct-course state
    pub fn reset(&mut self) {
        self.state = TackState::default();
        self.policy = self.params.turn_policy;
        self.gate.reset();
    }

    /// Replace the parameters, keeping the current state
    ///
    /// The active turn policy only follows the parameters when the configured
    /// policy itself changes.
    pub fn set_params(&mut self, params: NavigationParams) {
        self.gate.set_period_ms(params.period_ms);
        if params.turn_policy != self.params.turn_policy {
            self.policy = params.turn_policy;
        }
        self.params = params;
    }

    /// Current parameters
    pub fn params(&self) -> &NavigationParams {
        &self.params
    }

    /// Select how turn directions are chosen
    pub fn set_turn_policy(&mut self, policy: TurnPolicy) {
        if policy != self.policy {
            log_info!("Turn policy: {}", policy as u8);
        }
        self.policy = policy;
    }

    /// Current turn policy
    pub fn turn_policy(&self) -> TurnPolicy {
        self.policy
    }

    /// Current planner state
    pub fn state(&self) -> &TackState {
        &self.state
    }

    /// Navigation sub-state for telemetry
    pub fn nav_state(&self) -> NavState {
        if self.state.turning {
            match self.state.turn_direction {
                TurnDirection::Left => NavState::TurnLeft,
                TurnDirection::Right => NavState::TurnRight,
            }
        } else if self.state.indirect_active {
            NavState::Indirect
        } else {
            NavState::Direct
        }
    }

    /// True while a turn maneuver is in progress
    pub fn is_turning(&self) -> bool {
        self.state.turning
    }

    /// Distance sailed since the current tack started (meters)
    pub fn distance_on_tack(&self, position: &GeoPoint) -> f32 {
        self.state.tack_start.distance_to(position)
    }

    /// Close-hauled bearing for a tack side
    pub fn close_hauled_bearing(&self, wind: f32, on_port: bool) -> f32 {
        if on_port {
            wrap_360(wind + self.params.close_hauled_angle)
        } else {
            wrap_360(wind - self.params.close_hauled_angle)
        }
    }

    /// True if `bearing` is far enough off the wind to be sailed directly
    pub fn direct_route_possible(&self, margin: RouteMargin, wind: f32, bearing: f32) -> bool {
        let off_wind = angular_diff(wind, bearing).abs();
        match margin {
            RouteMargin::Lenient => off_wind > self.params.upwind_threshold - self.params.hysteresis,
            RouteMargin::Strict => off_wind > self.params.upwind_threshold + self.params.hysteresis,
        }
    }

    /// Run one planner step if the planner period has elapsed
    ///
    /// Returns `None` when not due; the previous command stays in effect.
    pub fn update<H: HeadingSource, W: WindSource>(
        &mut self,
        now_ms: u64,
        position: GeoPoint,
        target: GeoPoint,
        heading: &H,
        wind: &W,
    ) -> Option<SteeringCommand> {
        if !self.gate.is_due(now_ms) {
            return None;
        }
        Some(self.step(
            now_ms,
            position,
            target,
            heading.heading(),
            wind.wind_bearing(),
        ))
    }

    /// Manually change tack side
    ///
    /// Only available on an indirect course; returns `None` otherwise.
    pub fn change_tack<H: HeadingSource, W: WindSource>(
        &mut self,
        now_ms: u64,
        position: GeoPoint,
        heading: &H,
        wind: &W,
    ) -> Option<SteeringCommand> {
        if !self.state.indirect_active {
            log_warn!("Tack change ignored: not on an indirect course");
            return None;
        }
        let wind = wind.wind_bearing();
        self.flip_side(position);
        let bearing = self.close_hauled_bearing(wind, self.state.on_port);
        Some(self.begin_turn(now_ms, bearing, heading.heading(), wind))
    }

    /// Abandon a turn maneuver in progress
    pub fn finish_maneuver(&mut self) {
        if self.state.turning {
            log_info!("Turn finished, heading target {}", self.state.turn_target);
        }
        self.state.turning = false;
    }

    fn step(
        &mut self,
        now_ms: u64,
        position: GeoPoint,
        target: GeoPoint,
        heading: f32,
        wind: f32,
    ) -> SteeringCommand {
        if self.state.turning {
            if let Some(command) = self.update_turn(now_ms, heading) {
                return command;
            }
        }
        self.update_trajectory(now_ms, position, target, heading, wind)
    }

    /// Advance a turn; `None` once the turn has completed
    fn update_turn(&mut self, now_ms: u64, heading: f32) -> Option<SteeringCommand> {
        if angular_diff(heading, self.state.turn_target).abs() < self.params.turn_end_threshold {
            self.finish_maneuver();
            return None;
        }

        let elapsed_ms = now_ms.saturating_sub(self.state.turn_started_ms);
        if elapsed_ms > self.params.turn_retry_s as u64 * 1000 {
            self.state.turn_direction = self.state.turn_direction.reversed();
            self.state.turn_started_ms = now_ms;
            log_warn!(
                "Turn stalled at heading {}, reversing direction",
                heading
            );
        }

        Some(self.turn_rudder())
    }

    fn update_trajectory(
        &mut self,
        now_ms: u64,
        position: GeoPoint,
        target: GeoPoint,
        heading: f32,
        wind: f32,
    ) -> SteeringCommand {
        let target_bearing = position.bearing_to(&target);

        if self.state.indirect_active {
            let command = self.update_indirect(now_ms, position, heading, wind);
            if self.state.turning {
                return command;
            }
            let leave = self.direct_route_possible(RouteMargin::Strict, wind, target_bearing)
                && self.distance_on_tack(&position) > self.params.min_tack_distance;
            if !leave {
                return command;
            }
            self.state.indirect_active = false;
            log_info!("Direct course to bearing {}", target_bearing);
        }

        if !self.direct_route_possible(RouteMargin::Lenient, wind, target_bearing) {
            self.state.indirect_active = true;
            self.state.on_port = is_on_port(heading, wind);
            self.state.tack_start = position;
            let bearing = self.close_hauled_bearing(wind, self.state.on_port);
            log_info!(
                "Indirect course: target bearing {} too close to wind {}",
                target_bearing,
                wind
            );
            return SteeringCommand::HoldHeading(bearing);
        }

        if is_turn_needed(heading, target_bearing, wind) {
            return self.begin_turn(now_ms, target_bearing, heading, wind);
        }

        SteeringCommand::HoldHeading(target_bearing)
    }

    fn update_indirect(
        &mut self,
        now_ms: u64,
        position: GeoPoint,
        heading: f32,
        wind: f32,
    ) -> SteeringCommand {
        let bearing = self.close_hauled_bearing(wind, self.state.on_port);

        // Pushed across the wind: take the other side as is, no maneuver
        if is_turn_needed(heading, bearing, wind) {
            self.flip_side(position);
            log_info!("Drifted across the wind at heading {}", heading);
            return SteeringCommand::HoldHeading(
                self.close_hauled_bearing(wind, self.state.on_port),
            );
        }

        if self.distance_on_tack(&position) > self.params.max_tack_distance {
            self.flip_side(position);
            let bearing = self.close_hauled_bearing(wind, self.state.on_port);
            return self.begin_turn(now_ms, bearing, heading, wind);
        }

        SteeringCommand::HoldHeading(bearing)
    }

    fn flip_side(&mut self, position: GeoPoint) {
        self.state.on_port = !self.state.on_port;
        self.state.tack_start = position;
        if self.state.on_port {
            log_info!("Tack change: port");
        } else {
            log_info!("Tack change: starboard");
        }
    }

    fn begin_turn(&mut self, now_ms: u64, target: f32, heading: f32, wind: f32) -> SteeringCommand {
        let target = wrap_360(target);
        let direction = match self.policy {
            TurnPolicy::AvoidWind => {
                if is_left_of(wind, heading) {
                    TurnDirection::Right
                } else {
                    TurnDirection::Left
                }
            }
            TurnPolicy::Shortest => {
                if is_left_of(heading, target) {
                    TurnDirection::Right
                } else {
                    TurnDirection::Left
                }
            }
        };

        self.state.turning = true;
        self.state.turn_target = target;
        self.state.turn_direction = direction;
        self.state.turn_started_ms = now_ms;
        log_info!(
            "Turn from {} to {}, rudder {}",
            heading,
            target,
            direction.sign() * self.params.turn_rudder
        );

        self.turn_rudder()
    }

    fn turn_rudder(&self) -> SteeringCommand {
        SteeringCommand::Rudder(self.state.turn_direction.sign() * self.params.turn_rudder)
    }
}

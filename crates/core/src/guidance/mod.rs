//! Mission mode arbiter
//!
//! Selects, once per guidance period, what the boat steers towards:
//!
//! - `Waypoints`: the current node of the waypoint graph, through the tack planner
//! - `Heading`: a fixed heading fed straight into heading hold
//! - `Manual`: nothing, rudder and sail follow override commands
//! - `Recovery`: the stored recovery point, through the tack planner
//!
//! The link-loss fail-safe is evaluated before the mode dispatch, so the
//! recovery target is selected on the same tick the timeout is detected.

mod mode;
mod recovery;
mod waypoints;

pub use mode::MissionMode;
pub use recovery::LinkLossFailsafe;
pub use waypoints::{WaypointGraph, WaypointNode, WAYPOINT_CAPACITY};

use crate::navigation::geo::wrap_360;
use crate::navigation::GeoPoint;
use crate::parameters::GuidanceParams;
use crate::scheduler::PeriodicGate;

/// Output of the arbiter
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ModeDirective {
    /// Run the tack planner towards the target, if one is known
    Navigate(Option<GeoPoint>),
    /// Hold a fixed heading (degrees)
    HoldHeading(f32),
    /// Leave rudder and sail to override commands
    Manual,
}

impl ModeDirective {
    /// Planner target, if the directive routes through the planner
    pub fn target(&self) -> Option<GeoPoint> {
        match self {
            ModeDirective::Navigate(target) => *target,
            _ => None,
        }
    }
}

/// Mission mode arbiter
pub struct Guidance {
    params: GuidanceParams,
    mode: MissionMode,
    heading_target: f32,
    recovery_point: GeoPoint,
    waypoints: WaypointGraph,
    failsafe: LinkLossFailsafe,
    gate: PeriodicGate,
    directive: ModeDirective,
}

impl Guidance {
    /// Create an arbiter in the configured default mode
    pub fn new(params: GuidanceParams, recovery_point: GeoPoint) -> Self {
        let mut guidance = Self {
            mode: params.default_mode,
            heading_target: wrap_360(params.fixed_heading),
            recovery_point,
            waypoints: WaypointGraph::new(),
            failsafe: LinkLossFailsafe::new(params.recovery_timeout_ms()),
            gate: PeriodicGate::new(params.period_ms),
            directive: ModeDirective::Manual,
            params,
        };
        guidance.directive = guidance.dispatch(None);
        guidance
    }

    /// Back to the configured default mode with an empty waypoint graph
    ///
    /// The recovery point is kept.
    pub fn reset(&mut self) {
        self.mode = self.params.default_mode;
        self.heading_target = wrap_360(self.params.fixed_heading);
        self.waypoints.clear();
        self.failsafe.reset();
        self.gate.reset();
        self.directive = self.dispatch(None);
    }

    /// Replace the parameters, keeping the current mode and targets
    pub fn set_params(&mut self, params: GuidanceParams) {
        self.gate.set_period_ms(params.period_ms);
        self.failsafe.set_timeout_ms(params.recovery_timeout_ms());
        self.params = params;
    }

    /// Current parameters
    pub fn params(&self) -> &GuidanceParams {
        &self.params
    }

    /// Run the arbiter if the guidance period has elapsed
    ///
    /// Returns the new directive when the arbiter ran, `None` otherwise; the
    /// previous directive stays in effect.
    pub fn update(
        &mut self,
        now_ms: u64,
        position: Option<GeoPoint>,
        last_command_ms: u64,
    ) -> Option<ModeDirective> {
        if !self.gate.is_due(now_ms) {
            return None;
        }

        if self.failsafe.check(now_ms, last_command_ms) {
            log_warn!(
                "No command for {} ms, recovery engaged",
                now_ms.saturating_sub(last_command_ms)
            );
        }
        if self.failsafe.is_triggered() && self.mode != MissionMode::Recovery {
            self.switch_mode(MissionMode::Recovery);
        }

        self.directive = self.dispatch(position);
        Some(self.directive)
    }

    /// Select a mission mode on ground request
    ///
    /// Clears a triggered link-loss fail-safe. Takes effect on the next
    /// guidance tick.
    pub fn set_mission_mode(&mut self, mode: MissionMode) {
        if self.failsafe.is_triggered() {
            log_info!("Recovery fail-safe cleared by mode command");
        }
        self.failsafe.reset();
        self.switch_mode(mode);
        self.gate.reset();
    }

    /// Active mission mode
    pub fn mode(&self) -> MissionMode {
        self.mode
    }

    /// Last directive produced
    pub fn directive(&self) -> ModeDirective {
        self.directive
    }

    /// True while the link-loss fail-safe holds the boat in recovery
    pub fn is_failsafe_active(&self) -> bool {
        self.failsafe.is_triggered()
    }

    /// Set the heading held in `Heading` mode
    pub fn set_heading_target(&mut self, heading: f32) {
        if !heading.is_finite() {
            log_warn!("Ignoring non-finite heading target");
            return;
        }
        self.heading_target = wrap_360(heading);
        if self.mode == MissionMode::Heading {
            self.directive = ModeDirective::HoldHeading(self.heading_target);
        }
    }

    /// Heading held in `Heading` mode
    pub fn heading_target(&self) -> f32 {
        self.heading_target
    }

    /// Replace the recovery point
    pub fn set_recovery_point(&mut self, point: GeoPoint) {
        self.recovery_point = point;
        if self.mode == MissionMode::Recovery {
            self.directive = ModeDirective::Navigate(Some(point));
        }
    }

    /// Target of last resort
    pub fn recovery_point(&self) -> GeoPoint {
        self.recovery_point
    }

    /// Store a waypoint; see [`WaypointGraph::add_or_update`]
    pub fn add_or_update_waypoint(
        &mut self,
        index: usize,
        successor: usize,
        point: GeoPoint,
    ) -> usize {
        self.waypoints.add_or_update(index, successor, point)
    }

    /// Waypoint graph
    pub fn waypoints(&self) -> &WaypointGraph {
        &self.waypoints
    }

    fn switch_mode(&mut self, mode: MissionMode) {
        if mode != self.mode {
            log_info!("Mode {} -> {}", self.mode.label(), mode.label());
        }
        self.mode = mode;
    }

    fn dispatch(&mut self, position: Option<GeoPoint>) -> ModeDirective {
        match self.mode {
            MissionMode::Waypoints => {
                if let Some(position) = position {
                    self.waypoints
                        .advance_if_reached(&position, self.params.waypoint_radius);
                }
                ModeDirective::Navigate(self.waypoints.current().map(|node| node.point))
            }
            MissionMode::Heading => ModeDirective::HoldHeading(self.heading_target),
            MissionMode::Manual => ModeDirective::Manual,
            MissionMode::Recovery => ModeDirective::Navigate(Some(self.recovery_point)),
        }
    }
}

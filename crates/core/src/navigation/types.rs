//! Navigation type definitions
//!
//! This module contains core types used by the navigation subsystem:
//! - `GeoPoint`: GPS position in degrees
//! - `SteeringCommand`: Output of the tack/turn planner
//! - `NavState`: Reported navigation sub-state
//! - `TurnDirection` / `TurnPolicy`: Turn maneuver direction and how it is chosen

use super::geo::{calculate_bearing, calculate_distance};

/// Geographic position (WGS84 degrees)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GeoPoint {
    /// Latitude in degrees (-90 to +90)
    pub latitude: f64,
    /// Longitude in degrees (-180 to +180)
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle initial bearing towards `other`, degrees [0, 360)
    pub fn bearing_to(&self, other: &GeoPoint) -> f32 {
        calculate_bearing(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Distance to `other` in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f32 {
        calculate_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// True if both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Steering output of the tack/turn planner
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SteeringCommand {
    /// Engage heading hold on this bearing (degrees)
    HoldHeading(f32),
    /// Disengage heading hold and hold a fixed rudder deflection (degrees)
    Rudder(f32),
}

/// Navigation sub-state as reported in telemetry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NavState {
    /// Sailing straight at the target
    Direct,
    /// Tacking towards a target too close to the wind
    Indirect,
    /// Turn maneuver, rudder held to port
    TurnLeft,
    /// Turn maneuver, rudder held to starboard
    TurnRight,
}

impl NavState {
    /// Telemetry label
    pub fn label(&self) -> &'static str {
        match self {
            NavState::Direct => "DIRECT",
            NavState::Indirect => "INDIRECT",
            NavState::TurnLeft => "TURN LEFT",
            NavState::TurnRight => "TURN RIGHT",
        }
    }
}

/// Direction of a turn maneuver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TurnDirection {
    /// Counter-clockwise
    Left,
    /// Clockwise
    Right,
}

impl TurnDirection {
    /// Rudder sign: -1.0 for left, +1.0 for right
    pub fn sign(&self) -> f32 {
        match self {
            TurnDirection::Left => -1.0,
            TurnDirection::Right => 1.0,
        }
    }

    /// The opposite direction
    pub fn reversed(&self) -> Self {
        match self {
            TurnDirection::Left => TurnDirection::Right,
            TurnDirection::Right => TurnDirection::Left,
        }
    }
}

/// How the direction of a turn maneuver is chosen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TurnPolicy {
    /// Turn away from the side the wind is on; the bow never crosses the wind
    #[default]
    AvoidWind = 0,
    /// Take the shorter rotation, even through the wind
    Shortest = 1,
}

impl TurnPolicy {
    /// Map a raw parameter value; anything but 1 selects [`TurnPolicy::AvoidWind`]
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => TurnPolicy::Shortest,
            _ => TurnPolicy::AvoidWind,
        }
    }
}

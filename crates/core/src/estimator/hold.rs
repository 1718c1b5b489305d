//! Heading hold controller
//!
//! Proportional controller from heading error to a target rudder deflection.
//! The actuation layer is responsible for slew limiting and range clamping.

use crate::navigation::geo::{angular_diff, wrap_360};

/// Proportional heading hold
#[derive(Debug, Clone, Copy)]
pub struct HeadingHold {
    kp: f32,
    target: f32,
    engaged: bool,
}

impl HeadingHold {
    /// Create a disengaged controller
    pub const fn new(kp: f32) -> Self {
        Self {
            kp,
            target: 0.0,
            engaged: false,
        }
    }

    /// Update the proportional gain
    pub fn set_gain(&mut self, kp: f32) {
        self.kp = kp;
    }

    /// Engage on a target heading (degrees)
    pub fn engage(&mut self, target: f32) {
        if target.is_finite() {
            self.target = wrap_360(target);
        }
        self.engaged = true;
    }

    /// Stop producing rudder commands
    pub fn disengage(&mut self) {
        self.engaged = false;
    }

    /// True while engaged
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Current target heading (degrees)
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Rudder command for the given heading, `None` while disengaged
    ///
    /// Positive turns right. Never returns NaN.
    pub fn command(&self, heading: f32) -> Option<f32> {
        if !self.engaged {
            return None;
        }
        Some(sanitize(self.kp * angular_diff(heading, self.target)))
    }
}

/// Replace NaN/infinity by a neutral command
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

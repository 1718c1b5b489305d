//! Raw sensor access
//!
//! The estimator reads the boat's raw instruments through [`BoatSensors`].
//! Every accessor returns `None` when the reading is stale or the device is
//! unavailable; the estimator then holds its last good value.

use nalgebra::Vector3;

use crate::navigation::GeoPoint;

/// Hull attitude from the accelerometer, in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attitude {
    /// Roll angle in radians (positive = heel to starboard)
    pub roll: f32,
    /// Pitch angle in radians (positive = bow up)
    pub pitch: f32,
}

impl Attitude {
    /// Create a new attitude from roll and pitch in radians
    pub const fn new(roll: f32, pitch: f32) -> Self {
        Self { roll, pitch }
    }

    /// Level attitude (no roll, no pitch)
    pub const fn level() -> Self {
        Self::new(0.0, 0.0)
    }

    /// True when both angles are finite numbers
    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite()
    }
}

/// Raw instruments of the boat
pub trait BoatSensors {
    /// Wind vane angle relative to the hull, degrees (0-360)
    fn wind_vane_angle(&self) -> Option<f32>;

    /// Hull attitude (roll, pitch)
    fn attitude(&self) -> Option<Attitude>;

    /// Calibrated magnetometer axes in the body frame (arbitrary units)
    fn compass(&self) -> Option<Vector3<f32>>;

    /// Latest GPS position fix
    fn position(&self) -> Option<GeoPoint>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_attitude_is_zero() {
        let att = Attitude::level();
        assert_eq!(att, Attitude::new(0.0, 0.0));
        assert!(att.is_finite());
    }

    #[test]
    fn nan_attitude_is_not_finite() {
        assert!(!Attitude::new(f32::NAN, 0.0).is_finite());
        assert!(!Attitude::new(0.0, f32::INFINITY).is_finite());
    }
}

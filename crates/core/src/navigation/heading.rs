//! Heading and wind source abstractions for navigation
//!
//! The planner and the sail trim policy read the boat's state through these
//! traits. The [`crate::estimator::StateEstimator`] implements both; tests
//! substitute fixed values.

/// Provides the current vessel heading
pub trait HeadingSource {
    /// Current heading in degrees [0, 360), 0 = North
    fn heading(&self) -> f32;
}

/// Provides the current absolute wind bearing
pub trait WindSource {
    /// Direction the wind blows from, degrees [0, 360)
    fn wind_bearing(&self) -> f32;
}

/// Heading source returning a constant
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedHeading(pub f32);

impl HeadingSource for FixedHeading {
    fn heading(&self) -> f32 {
        self.0
    }
}

/// Wind source returning a constant
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedWind(pub f32);

impl WindSource for FixedWind {
    fn wind_bearing(&self) -> f32 {
        self.0
    }
}

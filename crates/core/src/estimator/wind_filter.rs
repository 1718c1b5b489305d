//! Circular low-pass filter for the absolute wind bearing
//!
//! Angles are filtered as unit vectors (cosine, sine) and recombined with
//! `atan2`, so the estimate moves smoothly through the 0°/360° boundary
//! instead of swinging through 180° like a scalar filter would.

use libm::{atan2f, cosf, sinf};

use crate::navigation::geo::wrap_360;

/// Exponential filter on the cosine/sine components of a bearing
#[derive(Debug, Clone, Copy)]
pub struct WindFilter {
    cos: f32,
    sin: f32,
    bearing: f32,
}

impl WindFilter {
    /// Create a filter pointing at 0°
    pub const fn new() -> Self {
        Self {
            cos: 1.0,
            sin: 0.0,
            bearing: 0.0,
        }
    }

    /// Blend an instantaneous bearing into the estimate
    ///
    /// `alpha = time_constant / dt` weighs the previous estimate; 0 passes the
    /// input straight through. Non-finite input leaves the estimate unchanged.
    pub fn update(&mut self, instant_deg: f32, alpha: f32) -> f32 {
        if !instant_deg.is_finite() || !alpha.is_finite() || alpha < 0.0 {
            return self.bearing;
        }

        let rad = instant_deg.to_radians();
        self.cos = (cosf(rad) + alpha * self.cos) / (1.0 + alpha);
        self.sin = (sinf(rad) + alpha * self.sin) / (1.0 + alpha);
        // Exactly opposite samples can cancel out; keep the last bearing then
        if self.cos != 0.0 || self.sin != 0.0 {
            self.bearing = wrap_360(atan2f(self.sin, self.cos).to_degrees());
        }
        self.bearing
    }

    /// Current filtered bearing, degrees [0, 360)
    pub fn bearing(&self) -> f32 {
        self.bearing
    }

    /// Force the estimate to a bearing
    pub fn set(&mut self, bearing_deg: f32) {
        let bearing = wrap_360(bearing_deg);
        let rad = bearing.to_radians();
        self.cos = cosf(rad);
        self.sin = sinf(rad);
        self.bearing = bearing;
    }
}

impl Default for WindFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter weight for a time constant and update interval
pub fn filter_alpha(time_constant_s: f32, dt_s: f32) -> f32 {
    if dt_s <= 0.0 || time_constant_s <= 0.0 {
        0.0
    } else {
        time_constant_s / dt_s
    }
}

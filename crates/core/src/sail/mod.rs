//! Sail trim policy
//!
//! Maps the wind angle relative to the bow onto a sheet servo angle and
//! throttles how often the servo is moved. A pitch safety check can spill the
//! sail at any time, bypassing the throttle.

use crate::navigation::geo::wrap_180;
use crate::parameters::SailParams;
use crate::scheduler::PeriodicGate;

/// Sail servo angle for a wind bearing and heading
///
/// The relative wind magnitude is clamped to `[min_deflection, 180]` and
/// mapped linearly onto `[min_angle, max_angle]`.
pub fn sail_position(params: &SailParams, wind: f32, heading: f32) -> f32 {
    let relative = wrap_180(wind - heading).abs();
    let span = 180.0 - params.min_deflection;
    if span <= 0.0 {
        return params.min_angle;
    }
    let relative = relative.clamp(params.min_deflection, 180.0);
    let ratio = (relative - params.min_deflection) / span;
    params.min_angle + ratio * (params.max_angle - params.min_angle)
}

/// Throttled sail actuation with pitch safety spill
pub struct SailTrim {
    params: SailParams,
    window: PeriodicGate,
    applied: Option<f32>,
    spilling: bool,
}

impl SailTrim {
    /// Create a trim policy; the first request is applied immediately
    pub fn new(params: SailParams) -> Self {
        Self {
            window: PeriodicGate::new(params.update_period_ms),
            params,
            applied: None,
            spilling: false,
        }
    }

    /// Forget the applied angle and restart the throttle window
    pub fn reset(&mut self) {
        self.window.reset();
        self.applied = None;
        self.spilling = false;
    }

    /// Replace the parameters
    pub fn set_params(&mut self, params: SailParams) {
        self.window.set_period_ms(params.update_period_ms);
        self.params = params;
    }

    /// Current parameters
    pub fn params(&self) -> &SailParams {
        &self.params
    }

    /// Request the trim for the current wind and heading
    ///
    /// Returns the angle to send to the servo, if any.
    pub fn auto_trim(&mut self, now_ms: u64, wind: f32, heading: f32) -> Option<f32> {
        let angle = sail_position(&self.params, wind, heading);
        self.request(now_ms, angle)
    }

    /// Throttled request
    ///
    /// Applied only when the throttle window has elapsed and the angle moves by
    /// more than the deadband. A due window restarts even if the deadband
    /// rejects the request.
    pub fn request(&mut self, now_ms: u64, angle: f32) -> Option<f32> {
        if !angle.is_finite() {
            return None;
        }
        if !self.window.is_due(now_ms) {
            return None;
        }

        let angle = self.clamp(angle);
        if let Some(applied) = self.applied {
            if (angle - applied).abs() <= self.params.deadband {
                return None;
            }
        }
        self.applied = Some(angle);
        Some(angle)
    }

    /// Spill the sail if the hull pitches beyond the safety threshold
    ///
    /// Blocks throttled requests for one update period after the last
    /// excessive reading.
    pub fn check_safety(&mut self, now_ms: u64, pitch_deg: f32) -> Option<f32> {
        let excessive = self.params.safety_enabled && pitch_deg.abs() > self.params.safety_pitch;
        if !excessive {
            self.spilling = false;
            return None;
        }
        if !self.spilling {
            log_warn!("Pitch {} exceeds safety limit, spilling sail", pitch_deg);
        }
        self.spilling = true;
        self.window.hold_off(now_ms);
        let angle = self.clamp(self.params.max_angle);
        self.applied = Some(angle);
        Some(angle)
    }

    /// Manual override, bypasses the throttle
    pub fn set_direct(&mut self, angle: f32) -> Option<f32> {
        if !angle.is_finite() {
            return None;
        }
        let angle = self.clamp(angle);
        self.applied = Some(angle);
        Some(angle)
    }

    /// Last angle sent to the servo
    pub fn applied(&self) -> Option<f32> {
        self.applied
    }

    /// True while the pitch safety spill is active
    pub fn is_spilling(&self) -> bool {
        self.spilling
    }

    fn clamp(&self, angle: f32) -> f32 {
        let (low, high) = self.params.servo_range();
        angle.clamp(low, high)
    }
}

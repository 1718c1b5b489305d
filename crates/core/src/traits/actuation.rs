//! Actuator abstraction for rudder and sail
//!
//! Commands are fire-and-forget: the core never waits for, nor reads back,
//! a status from the servos.
//!
//! ## Conventions
//!
//! - Rudder: degrees of deflection, 0 = neutral, negative turns left,
//!   positive turns right. Range clamping and slew limiting are the
//!   implementation's job.
//! - Sail: sheet servo angle in degrees, already clamped by the core to the
//!   configured sail range.

/// Rudder and sail command sink
pub trait ActuationSink {
    /// Request a target rudder deflection (degrees)
    fn apply_rudder(&mut self, deflection_deg: f32);

    /// Request a sail angle (degrees)
    fn apply_sail(&mut self, angle_deg: f32);
}

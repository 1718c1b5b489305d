//! State estimation: heading, absolute wind and heading hold
//!
//! The [`StateEstimator`] owns every estimate the planner and sail trim read:
//!
//! - filtered absolute wind bearing ([`WindFilter`])
//! - tilt-compensated compass heading ([`compass`])
//! - last known pitch and position fix
//! - the heading hold controller ([`HeadingHold`])
//!
//! Unavailable or non-finite sensor readings leave the previous estimate in
//! place, so nothing downstream ever sees NaN.

pub mod compass;
pub mod hold;
pub mod wind_filter;

pub use compass::tilt_compensated_heading;
pub use hold::HeadingHold;
pub use wind_filter::{filter_alpha, WindFilter};

use crate::navigation::geo::wrap_360;
use crate::navigation::{GeoPoint, HeadingSource, WindSource};
use crate::parameters::EstimatorParams;
use crate::scheduler::PeriodicGate;
use crate::traits::{Attitude, BoatSensors};
use nalgebra::Vector3;

/// Wind, heading and attitude estimator with heading hold
pub struct StateEstimator {
    params: EstimatorParams,
    wind: WindFilter,
    heading: f32,
    pitch_deg: f32,
    position: Option<GeoPoint>,
    hold: HeadingHold,
    gate: PeriodicGate,
}

impl StateEstimator {
    /// Create an estimator with heading and wind at 0°
    pub fn new(params: EstimatorParams) -> Self {
        let mut estimator = Self {
            wind: WindFilter::new(),
            heading: 0.0,
            pitch_deg: 0.0,
            position: None,
            hold: HeadingHold::new(params.heading_p),
            gate: PeriodicGate::new(params.period_ms),
            params,
        };
        estimator.apply_manual_wind();
        estimator
    }

    /// Discard every estimate and disengage heading hold
    pub fn reset(&mut self) {
        *self = Self::new(self.params.clone());
    }

    /// Replace the parameters, keeping the estimates
    pub fn set_params(&mut self, params: EstimatorParams) {
        self.hold.set_gain(params.heading_p);
        self.gate.set_period_ms(params.period_ms);
        self.params = params;
        self.apply_manual_wind();
    }

    /// Current parameters
    pub fn params(&self) -> &EstimatorParams {
        &self.params
    }

    /// Read the sensors and refresh every estimate if the period has elapsed
    ///
    /// Returns true if an update ran.
    pub fn update<S: BoatSensors>(&mut self, now_ms: u64, sensors: &S) -> bool {
        if !self.gate.is_due(now_ms) {
            return false;
        }

        let attitude = sensors.attitude();
        self.update_heading(attitude, sensors.compass());
        if let Some(att) = attitude.filter(Attitude::is_finite) {
            self.pitch_deg = att.pitch.to_degrees();
        }
        self.update_wind_filter(self.params.period_s(), sensors.wind_vane_angle());
        if let Some(fix) = sensors.position().filter(GeoPoint::is_finite) {
            self.position = Some(fix);
        }
        true
    }

    /// Refresh the heading from attitude and magnetometer
    pub fn update_heading(&mut self, attitude: Option<Attitude>, field: Option<Vector3<f32>>) {
        let (Some(attitude), Some(field)) = (attitude, field) else {
            return;
        };
        match tilt_compensated_heading(&attitude, &field, self.params.compass_offset_deg) {
            Some(heading) => self.heading = heading,
            None => log_debug!("Compass reading rejected, heading held at {}", self.heading),
        }
    }

    /// Blend a wind vane reading into the wind estimate
    ///
    /// Uses the current heading: call after [`Self::update_heading`].
    pub fn update_wind_filter(&mut self, dt_s: f32, vane_deg: Option<f32>) {
        if self.params.manual_wind {
            self.apply_manual_wind();
            return;
        }
        let Some(vane) = vane_deg.filter(|v| v.is_finite()) else {
            return;
        };
        let instant = wrap_360(self.params.vane_offset_deg - vane + self.heading);
        let alpha = filter_alpha(self.params.wind_filter_time_s, dt_s);
        self.wind.update(instant, alpha);
    }

    /// Current heading, degrees [0, 360)
    pub fn heading(&self) -> f32 {
        self.heading
    }

    /// Filtered absolute wind bearing, degrees [0, 360)
    pub fn wind_bearing(&self) -> f32 {
        self.wind.bearing()
    }

    /// Last finite pitch reading in degrees
    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Last good position fix
    pub fn position(&self) -> Option<GeoPoint> {
        self.position
    }

    /// Heading hold controller
    pub fn heading_hold(&self) -> &HeadingHold {
        &self.hold
    }

    /// Heading hold controller, mutable
    pub fn heading_hold_mut(&mut self) -> &mut HeadingHold {
        &mut self.hold
    }

    /// Rudder command from heading hold for the current heading
    pub fn heading_hold_command(&self) -> Option<f32> {
        self.hold.command(self.heading)
    }

    fn apply_manual_wind(&mut self) {
        if self.params.manual_wind {
            self.wind.set(self.params.manual_wind_bearing);
        }
    }
}

impl HeadingSource for StateEstimator {
    fn heading(&self) -> f32 {
        self.heading
    }
}

impl WindSource for StateEstimator {
    fn wind_bearing(&self) -> f32 {
        self.wind.bearing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::geo::angular_diff;
    use core::cell::Cell;

    /// Sensors with settable readings
    struct FakeSensors {
        vane: Cell<Option<f32>>,
        attitude: Cell<Option<Attitude>>,
        field: Cell<Option<Vector3<f32>>>,
        position: Cell<Option<GeoPoint>>,
    }

    impl FakeSensors {
        /// Level boat, magnetometer reading for `heading` with a zero compass offset
        fn heading(heading: f32) -> Self {
            let rad = (-heading).to_radians();
            Self {
                vane: Cell::new(None),
                attitude: Cell::new(Some(Attitude::level())),
                field: Cell::new(Some(Vector3::new(libm::sinf(rad), libm::cosf(rad), 0.0))),
                position: Cell::new(None),
            }
        }
    }

    impl BoatSensors for FakeSensors {
        fn wind_vane_angle(&self) -> Option<f32> {
            self.vane.get()
        }
        fn attitude(&self) -> Option<Attitude> {
            self.attitude.get()
        }
        fn compass(&self) -> Option<Vector3<f32>> {
            self.field.get()
        }
        fn position(&self) -> Option<GeoPoint> {
            self.position.get()
        }
    }

    fn params() -> EstimatorParams {
        EstimatorParams {
            compass_offset_deg: 0.0,
            vane_offset_deg: 0.0,
            ..EstimatorParams::default()
        }
    }

    #[test]
    fn test_initial_estimates() {
        let est = StateEstimator::new(EstimatorParams::default());
        assert_eq!(est.heading(), 0.0);
        assert_eq!(est.wind_bearing(), 0.0);
        assert!(est.position().is_none());
        assert!(!est.heading_hold().is_engaged());
    }

    #[test]
    fn test_update_reads_heading_and_position() {
        let mut est = StateEstimator::new(params());
        let sensors = FakeSensors::heading(123.0);
        sensors.position.set(Some(GeoPoint::new(43.0, 5.0)));

        assert!(est.update(0, &sensors));
        assert!(angular_diff(est.heading(), 123.0).abs() < 0.01);
        assert_eq!(est.position(), Some(GeoPoint::new(43.0, 5.0)));
    }

    #[test]
    fn test_update_is_gated() {
        let mut est = StateEstimator::new(params());
        let sensors = FakeSensors::heading(10.0);
        assert!(est.update(0, &sensors));
        assert!(!est.update(50, &sensors));
        assert!(est.update(100, &sensors));
    }

    #[test]
    fn test_wind_from_vane_and_heading() {
        let mut est = StateEstimator::new(EstimatorParams {
            wind_filter_time_s: 0.0,
            vane_offset_deg: 32.0,
            ..params()
        });
        est.update_heading(
            Some(Attitude::level()),
            Some(Vector3::new(-1.0, 0.0, 0.0)),
        );
        assert!(angular_diff(est.heading(), 90.0).abs() < 0.01);

        // Vane reading equal to its offset: wind from dead ahead
        est.update_wind_filter(0.1, Some(32.0));
        assert!(angular_diff(est.wind_bearing(), 90.0).abs() < 0.01);

        // Vane turned 90 degrees: wind from the port beam
        est.update_wind_filter(0.1, Some(122.0));
        assert!(angular_diff(est.wind_bearing(), 0.0).abs() < 0.01);
    }

    #[test]
    fn test_wind_filter_smooths() {
        let mut est = StateEstimator::new(params());
        est.update_wind_filter(0.1, Some(270.0));
        // alpha = 70: one step moves only slightly away from 0
        let w = est.wind_bearing();
        assert!(angular_diff(w, 0.0).abs() < 2.0, "{}", w);
    }

    #[test]
    fn test_stale_vane_holds_wind() {
        let mut est = StateEstimator::new(EstimatorParams {
            wind_filter_time_s: 0.0,
            ..params()
        });
        est.update_wind_filter(0.1, Some(200.0));
        let before = est.wind_bearing();
        est.update_wind_filter(0.1, None);
        est.update_wind_filter(0.1, Some(f32::NAN));
        assert_eq!(est.wind_bearing(), before);
        assert!(est.wind_bearing().is_finite());
    }

    #[test]
    fn test_stale_compass_holds_heading() {
        let mut est = StateEstimator::new(params());
        let sensors = FakeSensors::heading(45.0);
        est.update(0, &sensors);
        let before = est.heading();

        sensors.field.set(None);
        est.update(100, &sensors);
        assert_eq!(est.heading(), before);

        sensors.field.set(Some(Vector3::new(f32::NAN, 0.0, 0.0)));
        est.update(200, &sensors);
        assert_eq!(est.heading(), before);

        sensors.attitude.set(None);
        sensors.field.set(Some(Vector3::new(0.0, 1.0, 0.0)));
        est.update(300, &sensors);
        assert_eq!(est.heading(), before);
    }

    #[test]
    fn test_invalid_position_keeps_last_fix() {
        let mut est = StateEstimator::new(params());
        let sensors = FakeSensors::heading(0.0);
        sensors.position.set(Some(GeoPoint::new(43.0, 5.0)));
        est.update(0, &sensors);
        sensors.position.set(Some(GeoPoint::new(f64::NAN, 5.0)));
        est.update(100, &sensors);
        sensors.position.set(None);
        est.update(200, &sensors);
        assert_eq!(est.position(), Some(GeoPoint::new(43.0, 5.0)));
    }

    #[test]
    fn test_pitch_tracking() {
        let mut est = StateEstimator::new(params());
        let sensors = FakeSensors::heading(0.0);
        sensors
            .attitude
            .set(Some(Attitude::new(0.0, 45.0_f32.to_radians())));
        est.update(0, &sensors);
        assert!((est.pitch_deg() - 45.0).abs() < 0.01);
    }

    #[test]
    fn test_manual_wind_override() {
        let mut est = StateEstimator::new(EstimatorParams {
            manual_wind: true,
            manual_wind_bearing: 270.0,
            ..params()
        });
        assert!((est.wind_bearing() - 270.0).abs() < 0.01);
        est.update_wind_filter(0.1, Some(10.0));
        assert!((est.wind_bearing() - 270.0).abs() < 0.01);

        est.set_params(params());
        est.update_wind_filter(0.1, Some(10.0));
        assert!(est.wind_bearing() != 270.0);
    }

    #[test]
    fn test_heading_hold_uses_current_heading() {
        let mut est = StateEstimator::new(params());
        est.update(0, &FakeSensors::heading(10.0));
        assert!(est.heading_hold_command().is_none());
        est.heading_hold_mut().engage(30.0);
        let rudder = est.heading_hold_command().unwrap();
        assert!((rudder - 50.0).abs() < 0.05);
    }

    #[test]
    fn test_reset_clears_state_but_keeps_params() {
        let mut est = StateEstimator::new(params());
        est.update(0, &FakeSensors::heading(90.0));
        est.heading_hold_mut().engage(10.0);
        est.reset();
        assert_eq!(est.heading(), 0.0);
        assert!(!est.heading_hold().is_engaged());
        assert_eq!(est.params().compass_offset_deg, 0.0);
    }
}

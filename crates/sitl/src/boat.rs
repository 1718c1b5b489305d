//! Kinematic sailboat model.
//!
//! Constant boat speed (reduced when pointing into the wind), turn rate
//! proportional to the rudder angle, fixed true wind. Sensor readings are
//! synthesized so that the core's estimator recovers the true heading and
//! wind with the configured offsets. This is a test stand-in, not a dynamics
//! model.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sailnav_core::navigation::geo::{wrap_180, wrap_360};
use sailnav_core::traits::{ActuationSink, Attitude, BoatSensors};
use sailnav_core::GeoPoint;

/// Configuration for the kinematic boat.
#[derive(Debug, Clone)]
pub struct BoatConfig {
    /// Boat speed with the wind free of the bow, in m/s.
    pub speed_ms: f32,
    /// Speed multiplier while in irons.
    pub irons_speed_factor: f32,
    /// Relative wind angle below which the boat is in irons (degrees).
    pub irons_angle_deg: f32,
    /// Turn rate per degree of rudder, in deg/s.
    pub turn_rate_per_rudder_deg: f32,
    /// True wind bearing (degrees, direction the wind comes from).
    pub wind_bearing_deg: f32,
    /// Initial heading (degrees).
    pub initial_heading_deg: f32,
    /// Compass mounting offset, must match `CMP_OFFSET`.
    pub compass_offset_deg: f32,
    /// Wind vane mounting offset, must match `WND_VANE_OFS`.
    pub vane_offset_deg: f32,
    /// Wind vane noise standard deviation in degrees.
    pub vane_noise_deg: f32,
    /// Compass noise standard deviation in degrees.
    pub compass_noise_deg: f32,
    /// GPS position noise standard deviation in meters.
    pub gps_noise_m: f32,
    /// Rudder servo configuration.
    pub rudder: RudderConfig,
    /// RNG seed for deterministic runs. None = random.
    pub seed: Option<u64>,
    /// Start position latitude (degrees).
    pub origin_lat_deg: f64,
    /// Start position longitude (degrees).
    pub origin_lon_deg: f64,
}

impl Default for BoatConfig {
    fn default() -> Self {
        Self {
            speed_ms: 1.5,
            irons_speed_factor: 0.2,
            irons_angle_deg: 30.0,
            turn_rate_per_rudder_deg: 0.8,
            wind_bearing_deg: 0.0,
            initial_heading_deg: 0.0,
            compass_offset_deg: 79.0,
            vane_offset_deg: 32.0,
            vane_noise_deg: 2.0,
            compass_noise_deg: 0.5,
            gps_noise_m: 0.3,
            rudder: RudderConfig::default(),
            seed: None,
            origin_lat_deg: 43.0,
            origin_lon_deg: 5.0,
        }
    }
}

impl BoatConfig {
    /// Noise-free configuration with zero sensor offsets.
    pub fn calm() -> Self {
        Self {
            compass_offset_deg: 0.0,
            vane_offset_deg: 0.0,
            vane_noise_deg: 0.0,
            compass_noise_deg: 0.0,
            gps_noise_m: 0.0,
            seed: Some(0),
            ..Self::default()
        }
    }

    /// Start position.
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.origin_lat_deg, self.origin_lon_deg)
    }
}

/// Rudder servo limits.
#[derive(Debug, Clone)]
pub struct RudderConfig {
    /// Maximum deflection in degrees (either side).
    pub limit_deg: f32,
    /// Maximum slew rate in deg/s.
    pub slew_dps: f32,
}

impl Default for RudderConfig {
    fn default() -> Self {
        Self {
            limit_deg: 30.0,
            slew_dps: 60.0,
        }
    }
}

/// Rudder servo with range clamp and slew limit.
#[derive(Debug, Clone)]
pub struct RudderServo {
    config: RudderConfig,
    target: f32,
    angle: f32,
}

impl RudderServo {
    pub fn new(config: RudderConfig) -> Self {
        Self {
            config,
            target: 0.0,
            angle: 0.0,
        }
    }

    /// Set the target deflection, clamped to the servo range.
    pub fn command(&mut self, deflection_deg: f32) {
        if deflection_deg.is_finite() {
            self.target = deflection_deg.clamp(-self.config.limit_deg, self.config.limit_deg);
        }
    }

    /// Move towards the target for `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        let max_step = self.config.slew_dps * dt;
        let error = self.target - self.angle;
        self.angle += error.clamp(-max_step, max_step);
    }

    /// Current deflection in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Commanded deflection in degrees.
    pub fn target(&self) -> f32 {
        self.target
    }
}

/// Sensor readings sampled at the end of the last step.
///
/// A copy is handed to the autopilot so the boat itself can receive the
/// actuator commands of the same tick.
#[derive(Debug, Clone, Copy)]
pub struct SensorFrame {
    vane_deg: f32,
    compass: Vector3<f32>,
    attitude: Attitude,
    position: Option<GeoPoint>,
}

impl BoatSensors for SensorFrame {
    fn wind_vane_angle(&self) -> Option<f32> {
        Some(self.vane_deg)
    }

    fn attitude(&self) -> Option<Attitude> {
        Some(self.attitude)
    }

    fn compass(&self) -> Option<Vector3<f32>> {
        Some(self.compass)
    }

    fn position(&self) -> Option<GeoPoint> {
        self.position
    }
}

/// Kinematic sailboat.
pub struct SimBoat {
    config: BoatConfig,
    /// Meters east of the origin.
    x: f64,
    /// Meters north of the origin.
    y: f64,
    heading_deg: f32,
    pitch_deg: f32,
    rudder: RudderServo,
    sail_deg: Option<f32>,
    rng: StdRng,
    readings: SensorFrame,
    fix_available: bool,
}

impl SimBoat {
    /// Create a boat at the configured origin.
    pub fn new(config: BoatConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut boat = Self {
            x: 0.0,
            y: 0.0,
            heading_deg: wrap_360(config.initial_heading_deg),
            pitch_deg: 0.0,
            rudder: RudderServo::new(config.rudder.clone()),
            sail_deg: None,
            rng,
            readings: SensorFrame {
                vane_deg: 0.0,
                compass: Vector3::new(0.0, 1.0, 0.0),
                attitude: Attitude::level(),
                position: Some(config.origin()),
            },
            fix_available: true,
            config,
        };
        boat.sample_sensors();
        boat
    }

    /// Integrate the kinematics for `dt` seconds and resample the sensors.
    pub fn step(&mut self, dt: f32) {
        self.rudder.step(dt);

        let turn_rate = self.rudder.angle() * self.config.turn_rate_per_rudder_deg;
        self.heading_deg = wrap_360(self.heading_deg + turn_rate * dt);

        let speed = self.speed();
        let heading_rad = (self.heading_deg as f64).to_radians();
        self.x += (speed * dt) as f64 * heading_rad.sin();
        self.y += (speed * dt) as f64 * heading_rad.cos();

        self.sample_sensors();
    }

    /// Current speed in m/s.
    pub fn speed(&self) -> f32 {
        if self.relative_wind_deg().abs() < self.config.irons_angle_deg {
            self.config.speed_ms * self.config.irons_speed_factor
        } else {
            self.config.speed_ms
        }
    }

    /// Wind angle off the bow, (-180, 180].
    pub fn relative_wind_deg(&self) -> f32 {
        wrap_180(self.config.wind_bearing_deg - self.heading_deg)
    }

    /// True heading in degrees.
    pub fn heading(&self) -> f32 {
        self.heading_deg
    }

    /// True position.
    pub fn position(&self) -> GeoPoint {
        let meters_per_deg_lat = 111_320.0_f64;
        let meters_per_deg_lon = 111_320.0_f64 * self.config.origin_lat_deg.to_radians().cos();
        GeoPoint::new(
            self.config.origin_lat_deg + self.y / meters_per_deg_lat,
            self.config.origin_lon_deg + self.x / meters_per_deg_lon,
        )
    }

    /// True wind bearing in degrees.
    pub fn wind_bearing(&self) -> f32 {
        self.config.wind_bearing_deg
    }

    /// Change the true wind.
    pub fn set_wind_bearing(&mut self, bearing_deg: f32) {
        self.config.wind_bearing_deg = wrap_360(bearing_deg);
    }

    /// Impose a hull pitch, e.g. a gust heeling the boat forward.
    pub fn set_pitch(&mut self, pitch_deg: f32) {
        self.pitch_deg = pitch_deg;
        self.sample_sensors();
    }

    /// Simulate losing (or regaining) the GPS fix.
    pub fn set_fix_available(&mut self, available: bool) {
        self.fix_available = available;
        self.sample_sensors();
    }

    /// Readings sampled at the end of the last step.
    pub fn sensors(&self) -> SensorFrame {
        self.readings
    }

    pub fn rudder(&self) -> &RudderServo {
        &self.rudder
    }

    /// Last sail angle received.
    pub fn sail(&self) -> Option<f32> {
        self.sail_deg
    }

    pub fn config(&self) -> &BoatConfig {
        &self.config
    }

    fn sample_sensors(&mut self) {
        let vane_noise = self.gaussian_noise(self.config.vane_noise_deg);
        let compass_noise = self.gaussian_noise(self.config.compass_noise_deg);
        let gps_noise_x = self.gaussian_noise(self.config.gps_noise_m) as f64;
        let gps_noise_y = self.gaussian_noise(self.config.gps_noise_m) as f64;

        // Vane reads the wind relative to the bow, mirrored and offset by its mounting
        let vane = wrap_360(
            self.config.vane_offset_deg + self.heading_deg - self.config.wind_bearing_deg,
        );

        // Magnetometer axes turn against the compass rose and carry the mounting offset
        let field_angle =
            (self.config.compass_offset_deg - self.heading_deg - compass_noise).to_radians();

        let truth = self.position();
        let meters_per_deg_lat = 111_320.0_f64;
        let meters_per_deg_lon = 111_320.0_f64 * self.config.origin_lat_deg.to_radians().cos();

        self.readings = SensorFrame {
            vane_deg: wrap_360(vane + vane_noise),
            compass: Vector3::new(field_angle.sin(), field_angle.cos(), 0.0),
            attitude: Attitude::new(0.0, self.pitch_deg.to_radians()),
            position: self.fix_available.then(|| {
                GeoPoint::new(
                    truth.latitude + gps_noise_y / meters_per_deg_lat,
                    truth.longitude + gps_noise_x / meters_per_deg_lon,
                )
            }),
        };
    }

    /// Generate Gaussian noise using Box-Muller transform.
    fn gaussian_noise(&mut self, stddev: f32) -> f32 {
        if stddev == 0.0 {
            return 0.0;
        }
        let u1: f32 = self.rng.gen::<f32>().max(f32::EPSILON);
        let u2: f32 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
        z * stddev
    }
}

impl std::fmt::Debug for SimBoat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimBoat")
            .field("heading_deg", &self.heading_deg)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("rudder", &self.rudder.angle())
            .field("sail_deg", &self.sail_deg)
            .finish()
    }
}

impl BoatSensors for SimBoat {
    fn wind_vane_angle(&self) -> Option<f32> {
        self.readings.wind_vane_angle()
    }

    fn attitude(&self) -> Option<Attitude> {
        self.readings.attitude()
    }

    fn compass(&self) -> Option<Vector3<f32>> {
        self.readings.compass()
    }

    fn position(&self) -> Option<GeoPoint> {
        self.readings.position()
    }
}

impl ActuationSink for SimBoat {
    fn apply_rudder(&mut self, deflection_deg: f32) {
        self.rudder.command(deflection_deg);
    }

    fn apply_sail(&mut self, angle_deg: f32) {
        self.sail_deg = Some(angle_deg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sailnav_core::estimator::tilt_compensated_heading;
    use sailnav_core::navigation::geo::angular_diff;

    fn calm_boat(heading: f32) -> SimBoat {
        SimBoat::new(BoatConfig {
            initial_heading_deg: heading,
            ..BoatConfig::calm()
        })
    }

    #[test]
    fn test_straight_line_motion() {
        let mut boat = calm_boat(90.0);
        for _ in 0..100 {
            boat.step(0.1);
        }
        // 10 s at 1.5 m/s due east
        let origin = boat.config().origin();
        let distance = origin.distance_to(&boat.position());
        assert!((distance - 15.0).abs() < 0.2, "distance {distance}");
        assert!((origin.bearing_to(&boat.position()) - 90.0).abs() < 0.5);
    }

    #[test]
    fn test_in_irons_slows_down() {
        let boat = calm_boat(10.0);
        assert!((boat.speed() - 0.3).abs() < 1e-3);
        let boat = calm_boat(90.0);
        assert!((boat.speed() - 1.5).abs() < 1e-3);
    }

    #[test]
    fn test_rudder_turns_boat() {
        let mut boat = calm_boat(90.0);
        boat.apply_rudder(20.0);
        for _ in 0..10 {
            boat.step(0.1);
        }
        assert!(boat.heading() > 90.0);

        boat.apply_rudder(-20.0);
        for _ in 0..40 {
            boat.step(0.1);
        }
        assert!(boat.heading() < 90.0);
    }

    #[test]
    fn test_rudder_servo_clamp_and_slew() {
        let mut servo = RudderServo::new(RudderConfig::default());
        servo.command(45.0);
        assert!((servo.target() - 30.0).abs() < 1e-3);
        servo.step(0.1);
        assert!((servo.angle() - 6.0).abs() < 1e-3);
        for _ in 0..10 {
            servo.step(0.1);
        }
        assert!((servo.angle() - 30.0).abs() < 1e-3);
        servo.command(f32::NAN);
        assert!((servo.target() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_compass_reading_matches_estimator_convention() {
        for (heading, offset) in [(0.0, 0.0), (37.0, 0.0), (250.0, 79.0), (355.0, 79.0)] {
            let boat = SimBoat::new(BoatConfig {
                initial_heading_deg: heading,
                compass_offset_deg: offset,
                ..BoatConfig::calm()
            });
            let field = boat.compass().unwrap();
            let attitude = boat.attitude().unwrap();
            let estimated = tilt_compensated_heading(&attitude, &field, offset).unwrap();
            assert!(angular_diff(estimated, heading).abs() < 0.01);
        }
    }

    #[test]
    fn test_vane_reading_matches_estimator_convention() {
        let mut boat = SimBoat::new(BoatConfig {
            initial_heading_deg: 100.0,
            wind_bearing_deg: 20.0,
            vane_offset_deg: 32.0,
            ..BoatConfig::calm()
        });
        boat.step(0.0);
        let vane = boat.wind_vane_angle().unwrap();
        // Estimator: wind = offset - vane + heading
        let wind = wrap_360(32.0 - vane + boat.heading());
        assert!(angular_diff(wind, 20.0).abs() < 0.01);
    }

    #[test]
    fn test_deterministic_noise() {
        let run = |seed| {
            let mut boat = SimBoat::new(BoatConfig {
                seed: Some(seed),
                ..BoatConfig::default()
            });
            boat.step(0.1);
            boat.wind_vane_angle().unwrap()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_fix_loss() {
        let mut boat = calm_boat(0.0);
        boat.set_fix_available(false);
        assert!(BoatSensors::position(&boat).is_none());
    }
}

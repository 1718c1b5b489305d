//! Sail Trim Parameter Definitions
//!
//! # Parameters
//!
//! - `SAIL_MIN` - Sail servo angle when close-hauled (degrees)
//! - `SAIL_MAX` - Sail servo angle when running, also the spill angle (degrees)
//! - `SAIL_MIN_DEFL` - Relative wind angle mapped onto `SAIL_MIN` (degrees)
//! - `SAIL_PERIOD` - Minimum interval between throttled sail updates (milliseconds)
//! - `SAIL_DEADBAND` - Change below which a throttled request is ignored (degrees)
//! - `SAIL_SAFE` - Spill the sail on excessive pitch (0/1)
//! - `SAIL_SAFE_PITCH` - Pitch magnitude that triggers the spill (degrees)

use super::error::ParameterError;
use super::storage::{load_bool, load_float, load_u32, ParamFlags, ParamValue, ParameterStore};

// --- Defaults ---

const DEFAULT_MIN_ANGLE: f32 = 35.0;
const DEFAULT_MAX_ANGLE: f32 = 90.0;
const DEFAULT_MIN_DEFLECTION: f32 = 30.0;
const DEFAULT_UPDATE_PERIOD_MS: u32 = 4000;
const DEFAULT_DEADBAND: f32 = 5.0;
const DEFAULT_SAFETY_PITCH: f32 = 40.0;

// --- Ranges ---

const MIN_SERVO_ANGLE: f32 = 0.0;
const MAX_SERVO_ANGLE: f32 = 180.0;

const MIN_DEFLECTION: f32 = 0.0;
const MAX_DEFLECTION: f32 = 179.0;

const MAX_UPDATE_PERIOD_MS: u32 = 60_000;

const MAX_DEADBAND: f32 = 90.0;

const MAX_PITCH: f32 = 90.0;

/// Sail trim parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct SailParams {
    /// Servo angle for a close-hauled sail (degrees)
    pub min_angle: f32,
    /// Servo angle for a fully eased sail (degrees)
    pub max_angle: f32,
    /// Relative wind angle at or below which the sail is fully trimmed (degrees)
    pub min_deflection: f32,
    /// Throttle interval in milliseconds
    pub update_period_ms: u32,
    /// Deadband for throttled requests (degrees)
    pub deadband: f32,
    /// Pitch safety spill enabled
    pub safety_enabled: bool,
    /// Pitch threshold for the safety spill (degrees)
    pub safety_pitch: f32,
}

impl Default for SailParams {
    fn default() -> Self {
        Self {
            min_angle: DEFAULT_MIN_ANGLE,
            max_angle: DEFAULT_MAX_ANGLE,
            min_deflection: DEFAULT_MIN_DEFLECTION,
            update_period_ms: DEFAULT_UPDATE_PERIOD_MS,
            deadband: DEFAULT_DEADBAND,
            safety_enabled: true,
            safety_pitch: DEFAULT_SAFETY_PITCH,
        }
    }
}

impl SailParams {
    /// Register sail parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "SAIL_MIN",
            ParamValue::Float(DEFAULT_MIN_ANGLE),
            ParamFlags::empty(),
        )?;
        store.register(
            "SAIL_MAX",
            ParamValue::Float(DEFAULT_MAX_ANGLE),
            ParamFlags::empty(),
        )?;
        store.register(
            "SAIL_MIN_DEFL",
            ParamValue::Float(DEFAULT_MIN_DEFLECTION),
            ParamFlags::empty(),
        )?;
        store.register(
            "SAIL_PERIOD",
            ParamValue::Int(DEFAULT_UPDATE_PERIOD_MS as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "SAIL_DEADBAND",
            ParamValue::Float(DEFAULT_DEADBAND),
            ParamFlags::empty(),
        )?;
        store.register("SAIL_SAFE", ParamValue::Bool(true), ParamFlags::empty())?;
        store.register(
            "SAIL_SAFE_PITCH",
            ParamValue::Float(DEFAULT_SAFETY_PITCH),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load sail parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            min_angle: load_float(
                store,
                "SAIL_MIN",
                DEFAULT_MIN_ANGLE,
                MIN_SERVO_ANGLE,
                MAX_SERVO_ANGLE,
            ),
            max_angle: load_float(
                store,
                "SAIL_MAX",
                DEFAULT_MAX_ANGLE,
                MIN_SERVO_ANGLE,
                MAX_SERVO_ANGLE,
            ),
            min_deflection: load_float(
                store,
                "SAIL_MIN_DEFL",
                DEFAULT_MIN_DEFLECTION,
                MIN_DEFLECTION,
                MAX_DEFLECTION,
            ),
            update_period_ms: load_u32(
                store,
                "SAIL_PERIOD",
                DEFAULT_UPDATE_PERIOD_MS,
                0,
                MAX_UPDATE_PERIOD_MS,
            ),
            deadband: load_float(store, "SAIL_DEADBAND", DEFAULT_DEADBAND, 0.0, MAX_DEADBAND),
            safety_enabled: load_bool(store, "SAIL_SAFE", true),
            safety_pitch: load_float(
                store,
                "SAIL_SAFE_PITCH",
                DEFAULT_SAFETY_PITCH,
                0.0,
                MAX_PITCH,
            ),
        }
    }

    /// Servo range as `(low, high)`, ordered even if `SAIL_MIN > SAIL_MAX`
    pub fn servo_range(&self) -> (f32, f32) {
        if self.min_angle <= self.max_angle {
            (self.min_angle, self.max_angle)
        } else {
            (self.max_angle, self.min_angle)
        }
    }

    /// Validate sail parameters
    pub fn is_valid(&self) -> bool {
        self.min_angle <= self.max_angle
    }
}

//! Tack/Turn Planner Parameter Definitions
//!
//! # Parameters
//!
//! - `NAV_CLOSE_ANG` - Close-hauled angle off the wind (degrees)
//! - `NAV_TACK_MAX` - Distance sailed on one tack before a deliberate tack change (meters)
//! - `NAV_TACK_MIN` - Distance required on a tack before leaving the indirect course (meters)
//! - `NAV_TURN_END` - Heading error below which a turn maneuver is complete (degrees)
//! - `NAV_TURN_RUD` - Fixed rudder deflection during a turn maneuver (degrees)
//! - `NAV_UPWIND` - No-go half angle around the wind (degrees)
//! - `NAV_HYST` - Hysteresis band around `NAV_UPWIND` (degrees)
//! - `NAV_PERIOD` - Planner update period (milliseconds, read-only)
//! - `NAV_TURN_POL` - Turn direction policy (0 = avoid wind, 1 = shortest)
//! - `NAV_RETRY` - Turn stall timeout before reversing direction (seconds)
//! - `NAV_AUTO_SAIL` - Automatic sail trim (0/1)

use super::error::ParameterError;
use super::storage::{load_bool, load_float, load_u32, ParamFlags, ParamValue, ParameterStore};
use crate::navigation::TurnPolicy;

// --- Defaults ---

const DEFAULT_CLOSE_HAULED_ANGLE: f32 = 45.0;
const DEFAULT_MAX_TACK_DISTANCE: f32 = 30.0;
const DEFAULT_MIN_TACK_DISTANCE: f32 = 4.0;
const DEFAULT_TURN_END_THRESHOLD: f32 = 35.0;
const DEFAULT_TURN_RUDDER: f32 = 25.0;
const DEFAULT_UPWIND_THRESHOLD: f32 = 35.0;
const DEFAULT_HYSTERESIS: f32 = 10.0;
const DEFAULT_PERIOD_MS: u32 = 100;
const DEFAULT_TURN_RETRY_S: u32 = 16;

// --- Ranges ---

const MIN_ANGLE: f32 = 0.0;
const MAX_ANGLE: f32 = 180.0;

const MIN_DISTANCE: f32 = 0.0;
const MAX_DISTANCE: f32 = 10_000.0;

const MIN_RUDDER: f32 = 0.0;
const MAX_RUDDER: f32 = 90.0;

const MIN_PERIOD_MS: u32 = 10;
const MAX_PERIOD_MS: u32 = 10_000;

const MIN_RETRY_S: u32 = 1;
const MAX_RETRY_S: u32 = 600;

/// Tack/turn planner parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct NavigationParams {
    /// Close-hauled angle off the wind (degrees)
    pub close_hauled_angle: f32,
    /// Deliberate tack change distance (meters)
    pub max_tack_distance: f32,
    /// Minimum distance on a tack before returning to a direct course (meters)
    pub min_tack_distance: f32,
    /// Turn completion threshold (degrees)
    pub turn_end_threshold: f32,
    /// Rudder deflection held during a turn (degrees, magnitude)
    pub turn_rudder: f32,
    /// No-go half angle around the wind (degrees)
    pub upwind_threshold: f32,
    /// Hysteresis around `upwind_threshold` (degrees)
    pub hysteresis: f32,
    /// Planner update period in milliseconds
    pub period_ms: u32,
    /// Turn direction policy
    pub turn_policy: TurnPolicy,
    /// Turn stall timeout (seconds)
    pub turn_retry_s: u32,
    /// Automatic sail trim enabled
    pub auto_sail: bool,
}

impl Default for NavigationParams {
    fn default() -> Self {
        Self {
            close_hauled_angle: DEFAULT_CLOSE_HAULED_ANGLE,
            max_tack_distance: DEFAULT_MAX_TACK_DISTANCE,
            min_tack_distance: DEFAULT_MIN_TACK_DISTANCE,
            turn_end_threshold: DEFAULT_TURN_END_THRESHOLD,
            turn_rudder: DEFAULT_TURN_RUDDER,
            upwind_threshold: DEFAULT_UPWIND_THRESHOLD,
            hysteresis: DEFAULT_HYSTERESIS,
            period_ms: DEFAULT_PERIOD_MS,
            turn_policy: TurnPolicy::AvoidWind,
            turn_retry_s: DEFAULT_TURN_RETRY_S,
            auto_sail: true,
        }
    }
}

impl NavigationParams {
    /// Register planner parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "NAV_CLOSE_ANG",
            ParamValue::Float(DEFAULT_CLOSE_HAULED_ANGLE),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_TACK_MAX",
            ParamValue::Float(DEFAULT_MAX_TACK_DISTANCE),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_TACK_MIN",
            ParamValue::Float(DEFAULT_MIN_TACK_DISTANCE),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_TURN_END",
            ParamValue::Float(DEFAULT_TURN_END_THRESHOLD),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_TURN_RUD",
            ParamValue::Float(DEFAULT_TURN_RUDDER),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_UPWIND",
            ParamValue::Float(DEFAULT_UPWIND_THRESHOLD),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_HYST",
            ParamValue::Float(DEFAULT_HYSTERESIS),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_PERIOD",
            ParamValue::Int(DEFAULT_PERIOD_MS as i32),
            ParamFlags::READ_ONLY,
        )?;
        store.register(
            "NAV_TURN_POL",
            ParamValue::Int(TurnPolicy::AvoidWind as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "NAV_RETRY",
            ParamValue::Int(DEFAULT_TURN_RETRY_S as i32),
            ParamFlags::empty(),
        )?;
        store.register("NAV_AUTO_SAIL", ParamValue::Bool(true), ParamFlags::empty())?;

        Ok(())
    }

    /// Load planner parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let turn_policy = match store.get("NAV_TURN_POL") {
            Some(ParamValue::Int(v)) => TurnPolicy::from_i32(*v),
            Some(ParamValue::Float(v)) => TurnPolicy::from_i32(*v as i32),
            Some(ParamValue::Bool(v)) => TurnPolicy::from_i32(*v as i32),
            None => TurnPolicy::AvoidWind,
        };

        Self {
            close_hauled_angle: load_float(
                store,
                "NAV_CLOSE_ANG",
                DEFAULT_CLOSE_HAULED_ANGLE,
                MIN_ANGLE,
                MAX_ANGLE,
            ),
            max_tack_distance: load_float(
                store,
                "NAV_TACK_MAX",
                DEFAULT_MAX_TACK_DISTANCE,
                MIN_DISTANCE,
                MAX_DISTANCE,
            ),
            min_tack_distance: load_float(
                store,
                "NAV_TACK_MIN",
                DEFAULT_MIN_TACK_DISTANCE,
                MIN_DISTANCE,
                MAX_DISTANCE,
            ),
            turn_end_threshold: load_float(
                store,
                "NAV_TURN_END",
                DEFAULT_TURN_END_THRESHOLD,
                MIN_ANGLE,
                MAX_ANGLE,
            ),
            turn_rudder: load_float(
                store,
                "NAV_TURN_RUD",
                DEFAULT_TURN_RUDDER,
                MIN_RUDDER,
                MAX_RUDDER,
            ),
            upwind_threshold: load_float(
                store,
                "NAV_UPWIND",
                DEFAULT_UPWIND_THRESHOLD,
                MIN_ANGLE,
                MAX_ANGLE,
            ),
            hysteresis: load_float(
                store,
                "NAV_HYST",
                DEFAULT_HYSTERESIS,
                MIN_ANGLE,
                MAX_ANGLE,
            ),
            period_ms: load_u32(
                store,
                "NAV_PERIOD",
                DEFAULT_PERIOD_MS,
                MIN_PERIOD_MS,
                MAX_PERIOD_MS,
            ),
            turn_policy,
            turn_retry_s: load_u32(
                store,
                "NAV_RETRY",
                DEFAULT_TURN_RETRY_S,
                MIN_RETRY_S,
                MAX_RETRY_S,
            ),
            auto_sail: load_bool(store, "NAV_AUTO_SAIL", true),
        }
    }

    /// Validate planner parameters
    pub fn is_valid(&self) -> bool {
        // Leaving the indirect course must stay reachable
        if self.min_tack_distance > self.max_tack_distance {
            return false;
        }
        // The no-go zone must lie inside the close-hauled bearing
        if self.close_hauled_angle < self.upwind_threshold - self.hysteresis {
            return false;
        }
        true
    }
}

//! Mission Mode Arbiter Parameter Definitions
//!
//! # Parameters
//!
//! - `WP_RADIUS` - Waypoint acceptance radius (meters)
//! - `GDN_MODE` - Mission mode at start-up (0 = waypoints, 1 = heading, 2 = recovery, 3 = manual)
//! - `GDN_HDG` - Fixed heading target at start-up (degrees)
//! - `GDN_PERIOD` - Arbiter update period (milliseconds, read-only)
//! - `FS_RECOV_TIME` - Link silence before the recovery fail-safe engages (seconds)

use super::error::ParameterError;
use super::storage::{load_float, load_u32, ParamFlags, ParamValue, ParameterStore};
use crate::guidance::MissionMode;

// --- Defaults ---

const DEFAULT_WP_RADIUS: f32 = 3.0;
const DEFAULT_MODE: MissionMode = MissionMode::Heading;
const DEFAULT_HEADING: f32 = 0.0;
const DEFAULT_PERIOD_MS: u32 = 1000;
const DEFAULT_RECOVERY_TIMEOUT_S: f32 = 30.0;

// --- Ranges ---

const MIN_WP_RADIUS: f32 = 0.5;
const MAX_WP_RADIUS: f32 = 1000.0;

const MIN_PERIOD_MS: u32 = 10;
const MAX_PERIOD_MS: u32 = 60_000;

const MIN_RECOVERY_TIMEOUT_S: f32 = 1.0;
const MAX_RECOVERY_TIMEOUT_S: f32 = 86_400.0;

/// Mission mode arbiter parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct GuidanceParams {
    /// Waypoint acceptance radius in meters
    pub waypoint_radius: f32,
    /// Mode selected at start-up and after a reset
    pub default_mode: MissionMode,
    /// Fixed heading target at start-up (degrees)
    pub fixed_heading: f32,
    /// Arbiter update period in milliseconds
    pub period_ms: u32,
    /// Link silence before recovery engages (seconds)
    pub recovery_timeout_s: f32,
}

impl Default for GuidanceParams {
    fn default() -> Self {
        Self {
            waypoint_radius: DEFAULT_WP_RADIUS,
            default_mode: DEFAULT_MODE,
            fixed_heading: DEFAULT_HEADING,
            period_ms: DEFAULT_PERIOD_MS,
            recovery_timeout_s: DEFAULT_RECOVERY_TIMEOUT_S,
        }
    }
}

impl GuidanceParams {
    /// Register guidance parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "WP_RADIUS",
            ParamValue::Float(DEFAULT_WP_RADIUS),
            ParamFlags::empty(),
        )?;
        store.register(
            "GDN_MODE",
            ParamValue::Int(DEFAULT_MODE as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "GDN_HDG",
            ParamValue::Float(DEFAULT_HEADING),
            ParamFlags::empty(),
        )?;
        store.register(
            "GDN_PERIOD",
            ParamValue::Int(DEFAULT_PERIOD_MS as i32),
            ParamFlags::READ_ONLY,
        )?;
        store.register(
            "FS_RECOV_TIME",
            ParamValue::Float(DEFAULT_RECOVERY_TIMEOUT_S),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load guidance parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let default_mode = match store.get("GDN_MODE") {
            Some(ParamValue::Int(v)) => u8::try_from(*v)
                .map(MissionMode::from_u8)
                .unwrap_or(MissionMode::Recovery),
            Some(ParamValue::Float(v)) => MissionMode::from_u8(*v as u8),
            _ => DEFAULT_MODE,
        };

        Self {
            waypoint_radius: load_float(
                store,
                "WP_RADIUS",
                DEFAULT_WP_RADIUS,
                MIN_WP_RADIUS,
                MAX_WP_RADIUS,
            ),
            default_mode,
            fixed_heading: load_float(store, "GDN_HDG", DEFAULT_HEADING, -360.0, 360.0),
            period_ms: load_u32(
                store,
                "GDN_PERIOD",
                DEFAULT_PERIOD_MS,
                MIN_PERIOD_MS,
                MAX_PERIOD_MS,
            ),
            recovery_timeout_s: load_float(
                store,
                "FS_RECOV_TIME",
                DEFAULT_RECOVERY_TIMEOUT_S,
                MIN_RECOVERY_TIMEOUT_S,
                MAX_RECOVERY_TIMEOUT_S,
            ),
        }
    }

    /// Recovery timeout in milliseconds
    pub fn recovery_timeout_ms(&self) -> u64 {
        (self.recovery_timeout_s * 1000.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guidance_params_defaults() {
        let params = GuidanceParams::default();
        assert!((params.waypoint_radius - 3.0).abs() < 0.001);
        assert_eq!(params.default_mode, MissionMode::Heading);
        assert_eq!(params.period_ms, 1000);
        assert_eq!(params.recovery_timeout_ms(), 30_000);
    }

    #[test]
    fn test_from_store_defaults() {
        let mut store = ParameterStore::new();
        GuidanceParams::register_defaults(&mut store).unwrap();
        let params = GuidanceParams::from_store(&store);
        assert_eq!(params.default_mode, MissionMode::Heading);
        assert!((params.recovery_timeout_s - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_unknown_mode_value_maps_to_recovery() {
        let mut store = ParameterStore::new();
        GuidanceParams::register_defaults(&mut store).unwrap();
        store.set("GDN_MODE", ParamValue::Int(42)).unwrap();
        assert_eq!(
            GuidanceParams::from_store(&store).default_mode,
            MissionMode::Recovery
        );

        store.set("GDN_MODE", ParamValue::Int(-1)).unwrap();
        assert_eq!(
            GuidanceParams::from_store(&store).default_mode,
            MissionMode::Recovery
        );
    }

    #[test]
    fn test_radius_clamped() {
        let mut store = ParameterStore::new();
        GuidanceParams::register_defaults(&mut store).unwrap();
        store.set("WP_RADIUS", ParamValue::Float(0.0)).unwrap();
        let params = GuidanceParams::from_store(&store);
        assert!((params.waypoint_radius - MIN_WP_RADIUS).abs() < 0.001);
    }
}

//! State Estimator Parameter Definitions
//!
//! # Parameters
//!
//! - `HDG_P` - Heading hold proportional gain (rudder degrees per degree of error)
//! - `WND_FILT_T` - Wind filter time constant (seconds)
//! - `EST_PERIOD` - Estimator update period (milliseconds, read-only)
//! - `CMP_OFFSET` - Compass north/mounting offset (degrees)
//! - `WND_VANE_OFS` - Wind vane mounting offset (degrees)
//! - `WND_MANUAL` - Use a fixed wind bearing instead of the vane (0/1)
//! - `WND_MAN_VAL` - Fixed wind bearing when `WND_MANUAL` is set (degrees)

use super::error::ParameterError;
use super::storage::{load_bool, load_float, load_u32, ParamFlags, ParamValue, ParameterStore};

// --- Defaults ---

const DEFAULT_HEADING_P: f32 = 2.5;
const DEFAULT_WIND_FILTER_TIME: f32 = 7.0;
const DEFAULT_PERIOD_MS: u32 = 100;
const DEFAULT_COMPASS_OFFSET: f32 = 79.0;
const DEFAULT_VANE_OFFSET: f32 = 32.0;
const DEFAULT_MANUAL_WIND_BEARING: f32 = 0.0;

// --- Ranges ---

const MIN_HEADING_P: f32 = 0.0;
const MAX_HEADING_P: f32 = 20.0;

const MIN_FILTER_TIME: f32 = 0.0;
const MAX_FILTER_TIME: f32 = 120.0;

const MIN_PERIOD_MS: u32 = 10;
const MAX_PERIOD_MS: u32 = 10_000;

const MIN_OFFSET: f32 = -360.0;
const MAX_OFFSET: f32 = 360.0;

/// State estimator parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct EstimatorParams {
    /// Heading hold proportional gain
    pub heading_p: f32,
    /// Wind filter time constant in seconds (0 = unfiltered)
    pub wind_filter_time_s: f32,
    /// Update period in milliseconds
    pub period_ms: u32,
    /// Offset added to the raw compass heading (degrees)
    pub compass_offset_deg: f32,
    /// Wind vane mounting offset (degrees)
    pub vane_offset_deg: f32,
    /// Replace the vane-derived wind with `manual_wind_bearing`
    pub manual_wind: bool,
    /// Fixed wind bearing in manual wind mode (degrees)
    pub manual_wind_bearing: f32,
}

impl Default for EstimatorParams {
    fn default() -> Self {
        Self {
            heading_p: DEFAULT_HEADING_P,
            wind_filter_time_s: DEFAULT_WIND_FILTER_TIME,
            period_ms: DEFAULT_PERIOD_MS,
            compass_offset_deg: DEFAULT_COMPASS_OFFSET,
            vane_offset_deg: DEFAULT_VANE_OFFSET,
            manual_wind: false,
            manual_wind_bearing: DEFAULT_MANUAL_WIND_BEARING,
        }
    }
}

impl EstimatorParams {
    /// Register estimator parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "HDG_P",
            ParamValue::Float(DEFAULT_HEADING_P),
            ParamFlags::empty(),
        )?;
        store.register(
            "WND_FILT_T",
            ParamValue::Float(DEFAULT_WIND_FILTER_TIME),
            ParamFlags::empty(),
        )?;
        store.register(
            "EST_PERIOD",
            ParamValue::Int(DEFAULT_PERIOD_MS as i32),
            ParamFlags::READ_ONLY,
        )?;
        store.register(
            "CMP_OFFSET",
            ParamValue::Float(DEFAULT_COMPASS_OFFSET),
            ParamFlags::empty(),
        )?;
        store.register(
            "WND_VANE_OFS",
            ParamValue::Float(DEFAULT_VANE_OFFSET),
            ParamFlags::empty(),
        )?;
        store.register("WND_MANUAL", ParamValue::Bool(false), ParamFlags::empty())?;
        store.register(
            "WND_MAN_VAL",
            ParamValue::Float(DEFAULT_MANUAL_WIND_BEARING),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load estimator parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        Self {
            heading_p: load_float(
                store,
                "HDG_P",
                DEFAULT_HEADING_P,
                MIN_HEADING_P,
                MAX_HEADING_P,
            ),
            wind_filter_time_s: load_float(
                store,
                "WND_FILT_T",
                DEFAULT_WIND_FILTER_TIME,
                MIN_FILTER_TIME,
                MAX_FILTER_TIME,
            ),
            period_ms: load_u32(
                store,
                "EST_PERIOD",
                DEFAULT_PERIOD_MS,
                MIN_PERIOD_MS,
                MAX_PERIOD_MS,
            ),
            compass_offset_deg: load_float(
                store,
                "CMP_OFFSET",
                DEFAULT_COMPASS_OFFSET,
                MIN_OFFSET,
                MAX_OFFSET,
            ),
            vane_offset_deg: load_float(
                store,
                "WND_VANE_OFS",
                DEFAULT_VANE_OFFSET,
                MIN_OFFSET,
                MAX_OFFSET,
            ),
            manual_wind: load_bool(store, "WND_MANUAL", false),
            manual_wind_bearing: load_float(
                store,
                "WND_MAN_VAL",
                DEFAULT_MANUAL_WIND_BEARING,
                MIN_OFFSET,
                MAX_OFFSET,
            ),
        }
    }

    /// Update period in seconds, used as the wind filter `dt`
    pub fn period_s(&self) -> f32 {
        self.period_ms as f32 / 1000.0
    }
}

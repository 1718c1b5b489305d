//! Parameter Storage Types
//!
//! Provides core parameter types and the `ParameterStore` for live-tunable
//! configuration. Components never read the store on their hot path: each one
//! builds a typed parameter struct with `from_store` and is rebuilt when a
//! value changes.

use super::error::ParameterError;
use bitflags::bitflags;
use heapless::index_map::FnvIndexMap;
use heapless::String;

/// Maximum parameter name length
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters
pub const MAX_PARAMS: usize = 64;

bitflags! {
    /// Parameter flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Fixed at registration; `set` rejects it
        const READ_ONLY = 0b00000001;
    }
}

/// Parameter value types
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// 32-bit signed integer
    Int(i32),
    /// 32-bit floating point
    Float(f32),
}

impl ParamValue {
    /// Numeric view of the value (`true` = 1.0)
    pub fn as_f32(&self) -> f32 {
        match self {
            ParamValue::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            ParamValue::Int(v) => *v as f32,
            ParamValue::Float(v) => *v,
        }
    }
}

/// Parameter store for configuration management
///
/// Stores parameters as key-value pairs with their flags. Boot-time
/// configuration of a read-only parameter is done by registering it with the
/// wanted value before the component defaults.
pub struct ParameterStore {
    /// Parameter values
    parameters: FnvIndexMap<String<PARAM_NAME_LEN>, ParamValue, MAX_PARAMS>,
    /// Parameter flags
    flags: FnvIndexMap<String<PARAM_NAME_LEN>, ParamFlags, MAX_PARAMS>,
}

impl ParameterStore {
    /// Create a new empty parameter store
    pub fn new() -> Self {
        Self {
            parameters: FnvIndexMap::new(),
            flags: FnvIndexMap::new(),
        }
    }

    /// Get parameter value
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        let mut key = String::<PARAM_NAME_LEN>::new();
        key.push_str(name).ok()?;
        self.parameters.get(&key)
    }

    /// Set parameter value
    ///
    /// Rejects unknown and read-only names.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), ParameterError> {
        let mut key = String::<PARAM_NAME_LEN>::new();
        key.push_str(name)
            .map_err(|_| ParameterError::UnknownParameter)?;

        if !self.parameters.contains_key(&key) {
            return Err(ParameterError::UnknownParameter);
        }

        if self.is_read_only(name) {
            return Err(ParameterError::ReadOnly);
        }

        self.parameters.insert(key, value).ok();
        Ok(())
    }

    /// Register a new parameter with default value and flags
    ///
    /// If the parameter already exists, this is a no-op (idempotent).
    pub fn register(
        &mut self,
        name: &str,
        default_value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), ParameterError> {
        let mut key = String::<PARAM_NAME_LEN>::new();
        key.push_str(name)
            .map_err(|_| ParameterError::InvalidConfig)?;

        if self.parameters.contains_key(&key) {
            return Ok(());
        }

        self.parameters
            .insert(key.clone(), default_value)
            .map_err(|_| ParameterError::StoreFull)?;
        self.flags
            .insert(key, flags)
            .map_err(|_| ParameterError::StoreFull)?;
        Ok(())
    }

    /// True if the parameter exists and is read-only
    pub fn is_read_only(&self, name: &str) -> bool {
        let mut key = String::<PARAM_NAME_LEN>::new();
        if key.push_str(name).is_err() {
            return false;
        }
        self.flags
            .get(&key)
            .is_some_and(|flags| flags.contains(ParamFlags::READ_ONLY))
    }

    /// Number of registered parameters
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a float parameter from store with clamping
pub(crate) fn load_float(
    store: &ParameterStore,
    name: &str,
    default: f32,
    min: f32,
    max: f32,
) -> f32 {
    match store.get(name) {
        Some(ParamValue::Float(v)) if v.is_finite() => v.clamp(min, max),
        Some(ParamValue::Int(v)) => (*v as f32).clamp(min, max),
        _ => default,
    }
}

/// Load an unsigned integer parameter from store with clamping
pub(crate) fn load_u32(store: &ParameterStore, name: &str, default: u32, min: u32, max: u32) -> u32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => (*v).clamp(min as i32, max as i32) as u32,
        Some(ParamValue::Float(v)) if v.is_finite() => (*v as i32).clamp(min as i32, max as i32) as u32,
        _ => default,
    }
}

/// Load a boolean parameter; any non-zero number counts as `true`
pub(crate) fn load_bool(store: &ParameterStore, name: &str, default: bool) -> bool {
    match store.get(name) {
        Some(ParamValue::Bool(v)) => *v,
        Some(ParamValue::Int(v)) => *v != 0,
        Some(ParamValue::Float(v)) => *v != 0.0,
        None => default,
    }
}

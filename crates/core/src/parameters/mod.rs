//! Parameter management types and utilities
//!
//! Tunables live in a name-addressed [`ParameterStore`] so they can be changed
//! over the link. Each component reads a strongly-typed parameter struct from
//! the store with `from_store`; names exist only at this boundary.

pub mod error;
pub mod estimator;
pub mod guidance;
pub mod navigation;
pub mod sail;
pub mod storage;

pub use error::ParameterError;
pub use estimator::EstimatorParams;
pub use guidance::GuidanceParams;
pub use navigation::NavigationParams;
pub use sail::SailParams;
pub use storage::{ParamFlags, ParamValue, ParameterStore};
pub use storage::{MAX_PARAMS, PARAM_NAME_LEN};

/// Register the defaults of every component
pub fn register_all_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
    EstimatorParams::register_defaults(store)?;
    NavigationParams::register_defaults(store)?;
    SailParams::register_defaults(store)?;
    GuidanceParams::register_defaults(store)?;
    Ok(())
}

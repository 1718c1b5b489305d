//! Navigation types, angle/geodesy utilities and the tack/turn planner
//!
//! - [`geo`]: compass angle math and great-circle bearing/distance
//! - [`tack`]: decides between a direct and an indirect (tacking) course and
//!   executes turn maneuvers
//! - [`HeadingSource`] / [`WindSource`]: how the planner reads boat state

pub mod geo;
pub mod heading;
pub mod tack;
mod types;

pub use heading::{FixedHeading, FixedWind, HeadingSource, WindSource};
pub use tack::{RouteMargin, TackPlanner, TackState};
pub use types::{GeoPoint, NavState, SteeringCommand, TurnDirection, TurnPolicy};

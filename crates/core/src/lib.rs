//! sailnav_core - Pure no_std guidance and navigation logic for an autonomous sailboat
//!
//! This crate contains the platform-agnostic decision engine of the boat:
//! everything that turns filtered sensor state into rudder and sail commands.
//! It can be tested on host without any embedded dependencies.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Trait abstractions**: Sensors, actuators, link and storage injected via traits
//! - **Injected time**: Every periodic component is gated on a [`traits::TimeSource`]
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource, sensors, actuators)
//! - [`navigation`]: Angle/geodesy utilities and the tack/turn planner
//! - [`estimator`]: Wind filter, compass heading and heading hold
//! - [`sail`]: Sail trim policy with throttled actuation
//! - [`guidance`]: Mission mode arbiter, waypoint graph and recovery fail-safe
//! - [`parameters`]: Name-addressed parameter store and per-component parameters
//! - [`scheduler`]: Next-due gates for cooperative periodic work
//! - [`autopilot`]: Facade wiring all components to a single tick

#![no_std]

#[cfg(test)]
extern crate std;

#[macro_use]
mod logging;

pub mod autopilot;
pub mod estimator;
pub mod guidance;
pub mod navigation;
pub mod parameters;
pub mod sail;
pub mod scheduler;
pub mod traits;

pub use autopilot::{Autopilot, Command, CommandError, StatusSnapshot};
pub use navigation::GeoPoint;

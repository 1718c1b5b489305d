//! Core traits for platform-agnostic guidance functionality.
//!
//! This module provides trait abstractions that decouple the guidance core
//! from the boat's drivers, radio link and storage medium.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Hardware and simulator implementations live outside this crate

pub mod actuation;
pub mod link;
pub mod sensors;
pub mod storage;
pub mod time;

pub use actuation::ActuationSink;
pub use link::LinkMonitor;
pub use sensors::{Attitude, BoatSensors};
pub use storage::{NullRecoveryStore, RecoveryStore, StorageError};
pub use time::{MockTime, TimeSource};

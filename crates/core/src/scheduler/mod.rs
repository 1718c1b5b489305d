//! Cooperative scheduling primitives
//!
//! All work runs from one periodic tick. Components that run slower than the
//! tick guard themselves with a [`PeriodicGate`] checked against the injected
//! clock.
//!
//! # Example
//!
//! ```rust
//! use sailnav_core::scheduler::PeriodicGate;
//!
//! let mut gate = PeriodicGate::new(1000);
//! assert!(gate.is_due(0));
//! assert!(!gate.is_due(500));
//! assert!(gate.is_due(1000));
//! ```

pub mod gate;

pub use gate::PeriodicGate;

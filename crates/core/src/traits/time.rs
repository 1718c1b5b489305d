//! Time abstraction traits for platform-agnostic timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over different
//! time providers (hardware timer, simulator clock, mock) so that every
//! periodic gate in the core can be driven by synthetic time in tests.

use core::cell::Cell;

/// Platform-agnostic time source for control loops and timing.
///
/// # Example
///
/// ```
/// use sailnav_core::traits::{TimeSource, MockTime};
///
/// fn due<T: TimeSource>(time: &T, next_due_ms: u64) -> bool {
///     time.now_ms() >= next_due_ms
/// }
///
/// let time = MockTime::new();
/// assert!(!due(&time, 100));
/// time.advance_ms(100);
/// assert!(due(&time, 100));
/// ```
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }

    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source with controllable time advancement.
///
/// Cloning a `MockTime` copies the current reading; clones advance
/// independently. Share one instance by reference to keep readings in sync.
///
/// ```
/// use sailnav_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// time.advance_ms(1500);
/// assert_eq!(time.now_ms(), 1500);
/// assert_eq!(time.now_us(), 1_500_000);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time in milliseconds.
    pub fn with_initial_ms(ms: u64) -> Self {
        Self {
            current_us: Cell::new(ms.saturating_mul(1000)),
        }
    }

    /// Sets the current time to an absolute value in milliseconds.
    pub fn set_ms(&self, ms: u64) {
        self.current_us.set(ms.saturating_mul(1000));
    }

    /// Advances the current time by the specified amount of microseconds.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get().saturating_add(us));
    }

    /// Advances the current time by the specified amount of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms.saturating_mul(1000));
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}

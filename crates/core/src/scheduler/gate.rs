//! Next-due gate for cooperative periodic work
//!
//! Each component owns one gate and checks it every tick against the injected
//! clock. A gate is due immediately after construction or [`PeriodicGate::reset`].

/// Periodic "next due" timestamp
#[derive(Debug, Clone, Copy)]
pub struct PeriodicGate {
    period_ms: u32,
    next_due_ms: u64,
}

impl PeriodicGate {
    /// Create a gate, due on the first check
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            next_due_ms: 0,
        }
    }

    /// Returns true (and schedules the next run) if the period has elapsed
    ///
    /// The next due time is computed from `now_ms`, not from the previous due
    /// time, so a late tick never causes a burst of catch-up runs.
    pub fn is_due(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.next_due_ms = now_ms.saturating_add(self.period_ms as u64);
        true
    }

    /// Push the next due time one full period past `now_ms`
    pub fn hold_off(&mut self, now_ms: u64) {
        self.next_due_ms = now_ms.saturating_add(self.period_ms as u64);
    }

    /// Make the gate due again on the next check
    pub fn reset(&mut self) {
        self.next_due_ms = 0;
    }

    /// Change the period; takes effect after the next run
    pub fn set_period_ms(&mut self, period_ms: u32) {
        self.period_ms = period_ms;
    }
}

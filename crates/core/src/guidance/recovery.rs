//! Link-loss recovery fail-safe
//!
//! Triggers when no external command has been received for longer than the
//! configured timeout. The trigger is sticky: traffic resuming on the link
//! does not clear it, only [`LinkLossFailsafe::reset`] does (called when the
//! ground explicitly sets a mission mode).

/// Sticky link-loss checker
#[derive(Debug, Clone)]
pub struct LinkLossFailsafe {
    timeout_ms: u64,
    triggered: bool,
}

impl LinkLossFailsafe {
    /// Create an untriggered checker
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            triggered: false,
        }
    }

    /// Check the link silence
    ///
    /// Returns true only on the check that first detects the timeout. Once
    /// triggered, stays triggered until `reset()`.
    pub fn check(&mut self, now_ms: u64, last_command_ms: u64) -> bool {
        if self.triggered {
            return false;
        }
        let silence_ms = now_ms.saturating_sub(last_command_ms);
        if silence_ms > self.timeout_ms {
            self.triggered = true;
            return true;
        }
        false
    }

    /// True once the timeout has been detected
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Clear the trigger
    pub fn reset(&mut self) {
        self.triggered = false;
    }

    /// Change the timeout without touching the trigger
    pub fn set_timeout_ms(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }
}

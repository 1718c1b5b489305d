//! Simulated ground station collaborators: radio link and recovery point storage.

use sailnav_core::traits::{LinkMonitor, RecoveryStore, StorageError};
use sailnav_core::GeoPoint;

/// Scripted link outage, `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outage {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl Outage {
    pub fn contains(&self, now_ms: u64) -> bool {
        now_ms >= self.start_ms && now_ms < self.end_ms
    }
}

/// Radio link fed by periodic ground heartbeats, with scripted outages.
#[derive(Debug, Clone)]
pub struct SimLink {
    heartbeat_ms: u64,
    next_heartbeat_ms: u64,
    last_received_ms: u64,
    outages: Vec<Outage>,
    received: u64,
    dropped: u64,
}

impl SimLink {
    /// Link with a heartbeat every `heartbeat_ms`; 0 disables heartbeats.
    pub fn new(heartbeat_ms: u64) -> Self {
        Self {
            heartbeat_ms,
            next_heartbeat_ms: 0,
            last_received_ms: 0,
            outages: Vec::new(),
            received: 0,
            dropped: 0,
        }
    }

    /// Drop everything sent during `[start_ms, end_ms)`.
    pub fn add_outage(&mut self, start_ms: u64, end_ms: u64) {
        self.outages.push(Outage { start_ms, end_ms });
    }

    /// True if the link is down at `now_ms`.
    pub fn is_down(&self, now_ms: u64) -> bool {
        self.outages.iter().any(|o| o.contains(now_ms))
    }

    /// Deliver any heartbeat due at `now_ms`.
    pub fn service(&mut self, now_ms: u64) {
        if self.heartbeat_ms == 0 || now_ms < self.next_heartbeat_ms {
            return;
        }
        self.next_heartbeat_ms = now_ms + self.heartbeat_ms;
        self.deliver(now_ms);
    }

    /// Attempt to deliver one packet; returns false if it was lost.
    pub fn deliver(&mut self, now_ms: u64) -> bool {
        if self.is_down(now_ms) {
            self.dropped += 1;
            return false;
        }
        self.last_received_ms = now_ms;
        self.received += 1;
        true
    }

    /// Packets delivered so far.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Packets lost to outages so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl LinkMonitor for SimLink {
    fn last_command_ms(&self) -> u64 {
        self.last_received_ms
    }
}

/// In-memory recovery point storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecoveryStore {
    point: Option<GeoPoint>,
    fail_writes: bool,
    writes: usize,
}

impl MemoryRecoveryStore {
    /// Store already holding `point`.
    pub fn with_point(point: GeoPoint) -> Self {
        Self {
            point: Some(point),
            ..Self::default()
        }
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Stored point.
    pub fn point(&self) -> Option<GeoPoint> {
        self.point
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RecoveryStore for MemoryRecoveryStore {
    fn load(&mut self) -> Option<GeoPoint> {
        self.point
    }

    fn save(&mut self, point: GeoPoint) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::WriteFailed);
        }
        self.point = Some(point);
        self.writes += 1;
        Ok(())
    }
}

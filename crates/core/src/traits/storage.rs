//! Persistent storage of the recovery point
//!
//! The recovery point is the only state that must survive a restart.

use crate::navigation::GeoPoint;

/// Errors from the recovery point storage medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The medium rejected the write
    WriteFailed,
    /// The medium is not available
    Unavailable,
}

impl StorageError {
    /// Static description, usable by every logging backend
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageError::WriteFailed => "recovery point write failed",
            StorageError::Unavailable => "recovery point storage unavailable",
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::error::Error for StorageError {}

/// Storage for the recovery point
pub trait RecoveryStore {
    /// Load the stored recovery point, `None` if nothing valid is stored
    fn load(&mut self) -> Option<GeoPoint>;

    /// Persist a new recovery point
    fn save(&mut self, point: GeoPoint) -> Result<(), StorageError>;
}

/// Store that keeps nothing; [`RecoveryStore::load`] always yields `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecoveryStore;

impl RecoveryStore for NullRecoveryStore {
    fn load(&mut self) -> Option<GeoPoint> {
        None
    }

    fn save(&mut self, _point: GeoPoint) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

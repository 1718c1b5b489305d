//! Parameter error types
//!
//! Provides error types for parameter store operations.

/// Errors from parameter store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Invalid configuration (e.g., name longer than the store allows)
    InvalidConfig,
    /// No parameter registered under that name
    UnknownParameter,
    /// Store is full
    StoreFull,
    /// Read-only parameter cannot be modified
    ReadOnly,
}

impl ParameterError {
    /// Static description, usable by every logging backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterError::InvalidConfig => "invalid parameter configuration",
            ParameterError::UnknownParameter => "unknown parameter",
            ParameterError::StoreFull => "parameter store full",
            ParameterError::ReadOnly => "parameter is read-only",
        }
    }
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::error::Error for ParameterError {}

//! Threshold and Settings Error Types

use thiserror::Error;

/// Errors raised while parsing or validating threshold settings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    /// A numeric field did not parse to a finite number
    #[error("{field} must be a number, got {input:?}")]
    NotANumber { field: &'static str, input: String },

    /// Lower bound is above the upper bound
    #[error("{metric} minimum {min} is above maximum {max}")]
    InvalidRange {
        metric: &'static str,
        min: f64,
        max: f64,
    },

    /// Alert sound name is not one of the built-in timbres
    #[error("Unknown alert sound: {0}")]
    UnknownSound(String),

    /// Persisting the validated configuration failed
    #[error("Failed to persist settings: {0}")]
    Store(#[from] StoreError),
}

/// Errors from the key-value settings store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Underlying file could not be read or written
    #[error("Settings I/O error: {0}")]
    Io(String),

    /// Stored value is not valid JSON for the expected type
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Store lock was poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

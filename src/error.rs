//! Error types for the store

use std::fmt;

/// Errors returned by store handles
///
/// A missing key is never an error: lookups report absence through
/// `Option`/`bool` results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store has been stopped, or its worker exited before answering
    Stopped,

    /// The supplied configuration cannot be used
    InvalidConfig(String),

    /// The worker thread or its runtime could not be created
    Spawn(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Stopped => write!(f, "Cannot interact with a stopped store"),
            StoreError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            StoreError::Spawn(msg) => write!(f, "Failed to start store worker: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, StoreError>;

//! Store configuration

use crate::error::{Result, StoreError};
use serde::Deserialize;

/// Configuration for a store worker
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Name of the worker thread, also attached to its log lines
    pub name: String,

    /// Maximum number of requests waiting in the worker's queue
    ///
    /// Set and Remove suspend the caller only while the queue is full.
    pub channel_capacity: usize,

    /// Initial capacity of the worker's map
    pub initial_capacity: usize,
}

impl StoreConfig {
    /// Check that the configuration can be used to start a worker
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(StoreError::InvalidConfig(
                "channel_capacity must be > 0".to_string(),
            ));
        }

        if self.name.is_empty() {
            return Err(StoreError::InvalidConfig("name must not be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            name: "chanmap".to_string(),
            channel_capacity: 1024,
            initial_capacity: 1024,
        }
    }
}

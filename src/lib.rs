//! chanmap - A lock-free in-memory key-value map
//!
//! One worker thread owns the map. Callers hold a [`Handle`] (or a
//! [`BlockingHandle`] outside async code) and talk to the worker through a
//! bounded request channel:
//! - Every request is applied by the worker, one at a time, in queue order
//! - Reads come back on a oneshot channel; writes return once queued
//! - Once stopped, every operation fails with [`StoreError::Stopped`]

pub mod config;
pub mod error;
pub mod handle;
pub mod store;
pub mod worker;

/// Re-export commonly used types
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use handle::{BlockingHandle, Handle};
pub use store::StoreStats;

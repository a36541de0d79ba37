//! In-memory storage module
//!
//! Provides the map owned by the store worker. Nothing in here is
//! synchronized: the worker is the only code that ever touches it.

mod entry;
mod memory;

pub use entry::Entry;
pub use memory::{MemoryStore, StoreStats};

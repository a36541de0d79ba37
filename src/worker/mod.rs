//! Store worker module
//!
//! A single worker owns the map and applies requests one at a time, in the
//! order they come out of its inbound channel. Callers never touch the map:
//! they send a [`Request`] and, for reads, wait on the oneshot it carries.
//! Mutual exclusion comes from single ownership, not from a lock.

mod request;
mod store_worker;

pub use request::Request;
pub use store_worker::StoreWorker;

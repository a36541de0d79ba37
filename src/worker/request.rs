//! Requests exchanged between handles and the worker

use crate::store::StoreStats;
use tokio::sync::oneshot;

/// An operation sent to the store worker
///
/// Reads carry the oneshot sender the worker answers on. Writes and Stop are
/// fire-and-forget.
pub enum Request<V> {
    /// Look up a key; answered with the stored value, if any
    Get {
        key: String,
        respond_to: oneshot::Sender<Option<V>>,
    },

    /// Insert or overwrite a key
    Set { key: String, value: V },

    /// Delete a key if present
    Remove { key: String },

    /// Check whether a key is present
    Exists {
        key: String,
        respond_to: oneshot::Sender<bool>,
    },

    /// Snapshot the store counters
    Stats {
        respond_to: oneshot::Sender<StoreStats>,
    },

    /// Leave the processing loop after this request
    Stop,
}

impl<V> Request<V> {
    /// Operation name, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Get { .. } => "GET",
            Request::Set { .. } => "SET",
            Request::Remove { .. } => "REMOVE",
            Request::Exists { .. } => "EXISTS",
            Request::Stats { .. } => "STATS",
            Request::Stop => "STOP",
        }
    }

    /// Key targeted by the request, if it has one
    pub fn key(&self) -> Option<&str> {
        match self {
            Request::Get { key, .. }
            | Request::Set { key, .. }
            | Request::Remove { key }
            | Request::Exists { key, .. } => Some(key),
            Request::Stats { .. } | Request::Stop => None,
        }
    }
}

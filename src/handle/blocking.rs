//! Blocking handle for callers outside an async runtime

use super::Handle;
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::store::StoreStats;
use crate::worker::Request;
use std::sync::atomic::Ordering;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Blocking handle to a store worker
///
/// Same operations and semantics as [`Handle`], for plain threads. The calls
/// block the current thread, so they panic if used from inside an async
/// runtime; use [`Handle`] there.
pub struct BlockingHandle<V> {
    inner: Handle<V>,
}

impl<V: Clone + Send + 'static> BlockingHandle<V> {
    /// Start a worker with the default configuration
    pub fn new() -> Result<Self> {
        Handle::new().map(Self::from)
    }

    /// Start a worker with the given configuration
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        Handle::with_config(config).map(Self::from)
    }

    /// Get the value stored under key
    pub fn get(&self, key: impl Into<String>) -> Result<Option<V>> {
        self.inner.ensure_running()?;

        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Get {
            key: key.into(),
            respond_to,
        })?;

        response.blocking_recv().map_err(|_| StoreError::Stopped)
    }

    /// Get the value stored under key along with a found flag
    pub fn get_or_default(&self, key: impl Into<String>) -> Result<(V, bool)>
    where
        V: Default,
    {
        Ok(match self.get(key)? {
            Some(value) => (value, true),
            None => (V::default(), false),
        })
    }

    /// Set key to value once the queue accepts the request
    pub fn set(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.inner.ensure_running()?;

        self.submit(Request::Set {
            key: key.into(),
            value,
        })
    }

    /// Remove key if present
    pub fn remove(&self, key: impl Into<String>) -> Result<()> {
        self.inner.ensure_running()?;

        self.submit(Request::Remove { key: key.into() })
    }

    /// Check whether key is present
    pub fn exists(&self, key: impl Into<String>) -> Result<bool> {
        self.inner.ensure_running()?;

        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Exists {
            key: key.into(),
            respond_to,
        })?;

        response.blocking_recv().map_err(|_| StoreError::Stopped)
    }

    /// Get counters from the worker
    pub fn stats(&self) -> Result<StoreStats> {
        self.inner.ensure_running()?;

        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Stats { respond_to })?;

        response.blocking_recv().map_err(|_| StoreError::Stopped)
    }

    /// Stop the worker; see [`Handle::stop`]
    pub fn stop(&self) -> Result<()> {
        if !self.inner.running.swap(false, Ordering::AcqRel) {
            warn!("Stop called on a stopped store");
            return Err(StoreError::Stopped);
        }

        info!("Stopping store");
        self.submit(Request::Stop)
    }

    /// Check whether the store is running
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Check whether the worker has exited
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Get an async handle to the same worker
    pub fn handle(&self) -> Handle<V> {
        self.inner.clone()
    }

    fn submit(&self, request: Request<V>) -> Result<()> {
        self.inner
            .request_tx
            .blocking_send(request)
            .map_err(|_| StoreError::Stopped)
    }
}

impl<V> From<Handle<V>> for BlockingHandle<V> {
    fn from(inner: Handle<V>) -> Self {
        BlockingHandle { inner }
    }
}

impl<V> Clone for BlockingHandle<V> {
    fn clone(&self) -> Self {
        BlockingHandle {
            inner: self.inner.clone(),
        }
    }
}

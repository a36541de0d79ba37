//! Handle module
//!
//! The handle is what callers hold. Each call becomes a [`Request`] sent to
//! the store worker; reads wait for the worker's answer on a oneshot channel.
//! Handles are cheap to clone and every clone talks to the same worker.

mod blocking;

pub use blocking::BlockingHandle;

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::store::StoreStats;
use crate::worker::{Request, StoreWorker};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Async handle to a store worker
///
/// Every operation except [`Handle::is_running`] requires the store to be
/// running; once [`Handle::stop`] has been called on any clone, they all
/// return [`StoreError::Stopped`].
pub struct Handle<V> {
    /// Sending half of the worker's request queue
    request_tx: mpsc::Sender<Request<V>>,

    /// Lifecycle flag shared by all clones, true until stop
    running: Arc<AtomicBool>,
}

impl<V: Clone + Send + 'static> Handle<V> {
    /// Start a worker with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(StoreConfig::default())
    }

    /// Start a worker with the given configuration
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        let request_tx = StoreWorker::spawn(&config)?;

        Ok(Handle {
            request_tx,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Get the value stored under key
    ///
    /// Waits for the worker to answer. `None` means the key is absent.
    pub async fn get(&self, key: impl Into<String>) -> Result<Option<V>> {
        self.ensure_running()?;

        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Get {
            key: key.into(),
            respond_to,
        })
        .await?;

        response.await.map_err(|_| StoreError::Stopped)
    }

    /// Get the value stored under key along with a found flag
    ///
    /// An absent key yields `(V::default(), false)`; check the flag, not
    /// the value.
    pub async fn get_or_default(&self, key: impl Into<String>) -> Result<(V, bool)>
    where
        V: Default,
    {
        Ok(match self.get(key).await? {
            Some(value) => (value, true),
            None => (V::default(), false),
        })
    }

    /// Set key to value, overwriting any previous value
    ///
    /// Returns once the worker's queue has accepted the request. Anything this
    /// caller does afterwards is ordered after it.
    pub async fn set(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.ensure_running()?;

        self.submit(Request::Set {
            key: key.into(),
            value,
        })
        .await
    }

    /// Remove key if present
    ///
    /// Same hand-off semantics as [`Handle::set`]. Removing an absent key is
    /// not an error.
    pub async fn remove(&self, key: impl Into<String>) -> Result<()> {
        self.ensure_running()?;

        self.submit(Request::Remove { key: key.into() }).await
    }

    /// Check whether key is present
    pub async fn exists(&self, key: impl Into<String>) -> Result<bool> {
        self.ensure_running()?;

        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Exists {
            key: key.into(),
            respond_to,
        })
        .await?;

        response.await.map_err(|_| StoreError::Stopped)
    }

    /// Get counters from the worker
    pub async fn stats(&self) -> Result<StoreStats> {
        self.ensure_running()?;

        let (respond_to, response) = oneshot::channel();
        self.submit(Request::Stats { respond_to }).await?;

        response.await.map_err(|_| StoreError::Stopped)
    }

    /// Stop the worker
    ///
    /// A queue slot is reserved first; the flag then flips and the request is
    /// sent without another suspension point, so no clone can issue a new
    /// operation afterwards. Dropping this future before it completes leaves
    /// the store running. Calling stop twice is an error. The map is dropped
    /// once the worker reaches the Stop request; reads still queued behind it
    /// fail with [`StoreError::Stopped`].
    pub async fn stop(&self) -> Result<()> {
        self.ensure_running()?;

        let permit = self
            .request_tx
            .reserve()
            .await
            .map_err(|_| StoreError::Stopped)?;

        if !self.running.swap(false, Ordering::AcqRel) {
            warn!("Stop called on a stopped store");
            return Err(StoreError::Stopped);
        }

        info!("Stopping store");
        permit.send(Request::Stop);
        Ok(())
    }

    /// Check whether the store is running
    ///
    /// Never blocks and never fails.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Check whether the worker has exited
    pub fn is_closed(&self) -> bool {
        self.request_tx.is_closed()
    }

    /// Wait until the worker has exited and released its map
    pub async fn closed(&self) {
        self.request_tx.closed().await
    }

    /// Get a blocking handle to the same worker
    pub fn blocking(&self) -> BlockingHandle<V> {
        BlockingHandle::from(self.clone())
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            warn!("Operation attempted on a stopped store");
            Err(StoreError::Stopped)
        }
    }

    async fn submit(&self, request: Request<V>) -> Result<()> {
        self.request_tx
            .send(request)
            .await
            .map_err(|_| StoreError::Stopped)
    }
}

impl<V> Clone for Handle<V> {
    fn clone(&self) -> Self {
        Handle {
            request_tx: self.request_tx.clone(),
            running: self.running.clone(),
        }
    }
}

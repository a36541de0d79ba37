//! Store worker implementation
//!
//! The worker runs on its own thread with a dedicated current-thread runtime
//! and owns the only `MemoryStore`. Every request goes through one bounded
//! channel, so the order the channel delivers is the order the map sees.

use super::request::Request;
use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::store::MemoryStore;
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The single owner of the key-value map
pub struct StoreWorker<V> {
    /// Worker name, used in logs
    name: String,

    /// The map; never shared
    store: MemoryStore<V>,

    /// Inbound request queue
    request_rx: mpsc::Receiver<Request<V>>,
}

impl<V: Clone + Send + 'static> StoreWorker<V> {
    /// Create a worker reading from the given queue
    pub fn new(config: &StoreConfig, request_rx: mpsc::Receiver<Request<V>>) -> Self {
        StoreWorker {
            name: config.name.clone(),
            store: MemoryStore::with_capacity(config.initial_capacity),
            request_rx,
        }
    }

    /// Start a worker on its own thread
    ///
    /// Returns the sending half of the worker's request queue.
    pub fn spawn(config: &StoreConfig) -> Result<mpsc::Sender<Request<V>>> {
        config.validate()?;

        let (request_tx, request_rx) = mpsc::channel(config.channel_capacity);
        let worker = StoreWorker::new(config, request_rx);
        let name = config.name.clone();

        std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        // Dropping the worker closes the queue; handles see Stopped.
                        error!("Worker {} failed to create runtime: {}", name, e);
                        return;
                    }
                };

                runtime.block_on(worker.run());
            })
            .map_err(|e| StoreError::Spawn(e.to_string()))?;

        info!("Worker {} started", config.name);

        Ok(request_tx)
    }

    /// The main loop
    ///
    /// Runs until a Stop request is processed or every sender is dropped.
    pub async fn run(mut self) {
        info!("Worker {} loop starting", self.name);

        loop {
            match self.request_rx.recv().await {
                Some(request) => {
                    if self.apply(request).is_break() {
                        info!("Worker {} received stop", self.name);
                        break;
                    }
                }
                None => {
                    info!("Worker {}: all handles dropped", self.name);
                    break;
                }
            }
        }

        self.shutdown();
    }

    /// Apply one request to the map
    fn apply(&mut self, request: Request<V>) -> ControlFlow<()> {
        debug!(
            "Worker {} processing {} {}",
            self.name,
            request.kind(),
            request.key().unwrap_or("")
        );

        // A dropped receiver means the caller gave up waiting; nothing to do.
        match request {
            Request::Get { key, respond_to } => {
                let _ = respond_to.send(self.store.get(&key));
            }
            Request::Set { key, value } => {
                self.store.set(key, value);
            }
            Request::Remove { key } => {
                self.store.delete(&key);
            }
            Request::Exists { key, respond_to } => {
                let _ = respond_to.send(self.store.exists(&key));
            }
            Request::Stats { respond_to } => {
                let _ = respond_to.send(self.store.stats());
            }
            Request::Stop => return ControlFlow::Break(()),
        }

        ControlFlow::Continue(())
    }

    /// Close the queue and release anything still waiting in it
    ///
    /// Dropping a queued read drops its responder, which wakes the caller
    /// with an error instead of leaving it blocked forever.
    fn shutdown(mut self) {
        self.request_rx.close();

        let mut discarded = 0usize;
        while let Ok(request) = self.request_rx.try_recv() {
            debug!("Worker {} discarding {}", self.name, request.kind());
            discarded += 1;
        }

        if discarded > 0 {
            warn!(
                "Worker {} discarded {} requests received after stop",
                self.name, discarded
            );
        }

        info!(
            "Worker {} shutting down, dropping {} keys",
            self.name,
            self.store.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn worker<V: Clone + Send + 'static>(
        capacity: usize,
    ) -> (mpsc::Sender<Request<V>>, StoreWorker<V>) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, StoreWorker::new(&StoreConfig::default(), rx))
    }

    #[tokio::test]
    async fn test_requests_applied_in_order() {
        let (tx, worker) = worker::<&'static str>(16);

        tx.send(Request::Set {
            key: "k".into(),
            value: "a",
        })
        .await
        .unwrap();
        tx.send(Request::Set {
            key: "k".into(),
            value: "b",
        })
        .await
        .unwrap();

        let (get_tx, get_rx) = oneshot::channel();
        tx.send(Request::Get {
            key: "k".into(),
            respond_to: get_tx,
        })
        .await
        .unwrap();
        tx.send(Request::Remove { key: "k".into() }).await.unwrap();

        let (exists_tx, exists_rx) = oneshot::channel();
        tx.send(Request::Exists {
            key: "k".into(),
            respond_to: exists_tx,
        })
        .await
        .unwrap();
        tx.send(Request::Stop).await.unwrap();

        worker.run().await;

        assert_eq!(get_rx.await.unwrap(), Some("b"));
        assert!(!exists_rx.await.unwrap());
    }

    #[tokio::test]
    async fn test_requests_after_stop_are_released() {
        let (tx, worker) = worker::<u32>(16);

        tx.send(Request::Set {
            key: "k".into(),
            value: 1,
        })
        .await
        .unwrap();
        tx.send(Request::Stop).await.unwrap();

        let (get_tx, get_rx) = oneshot::channel();
        tx.send(Request::Get {
            key: "k".into(),
            respond_to: get_tx,
        })
        .await
        .unwrap();

        worker.run().await;

        // The responder was dropped with the queue, not left pending.
        assert!(get_rx.await.is_err());
        assert!(tx.send(Request::Stop).await.is_err());
    }

    #[tokio::test]
    async fn test_exits_when_all_senders_dropped() {
        let (tx, worker) = worker::<u32>(4);
        let task = tokio::spawn(worker.run());

        drop(tx);

        tokio_test::assert_ok!(task.await);
    }

    #[tokio::test]
    async fn test_stats_reflect_earlier_requests() {
        let (tx, worker) = worker::<u32>(16);
        let task = tokio::spawn(worker.run());

        tx.send(Request::Set {
            key: "a".into(),
            value: 1,
        })
        .await
        .unwrap();
        tx.send(Request::Set {
            key: "b".into(),
            value: 2,
        })
        .await
        .unwrap();
        tx.send(Request::Remove { key: "a".into() }).await.unwrap();

        let (stats_tx, stats_rx) = oneshot::channel();
        tx.send(Request::Stats { respond_to: stats_tx }).await.unwrap();

        let stats = stats_rx.await.unwrap();
        assert_eq!(stats.keys, 1);
        assert_eq!(stats.sets, 2);
        assert_eq!(stats.removes, 1);

        tx.send(Request::Stop).await.unwrap();
        task.await.unwrap();
    }

    #[test]
    fn test_spawn_rejects_invalid_config() {
        let config = StoreConfig {
            channel_capacity: 0,
            ..StoreConfig::default()
        };

        let result = StoreWorker::<u32>::spawn(&config);
        assert!(matches!(result, Err(StoreError::InvalidConfig(_))));
    }
}

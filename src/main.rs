use anyhow::Context;
use chanmap::{Handle, StoreConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Load test configuration, read from an optional JSON file
#[derive(Debug, Deserialize)]
#[serde(default)]
struct LoadConfig {
    /// Store worker settings
    store: StoreConfig,

    /// Number of concurrent writer tasks
    writers: usize,

    /// Set operations issued by each writer
    sets_per_writer: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        LoadConfig {
            store: StoreConfig::default(),
            writers: num_cpus::get().clamp(1, 64),
            sets_per_writer: 10_000,
        }
    }
}

impl LoadConfig {
    fn load(path: Option<String>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(LoadConfig::default());
        };

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path))?;

        Ok(config)
    }

    fn keys(&self) -> Arc<Vec<String>> {
        let total = self.writers * self.sets_per_writer;
        Arc::new((0..total).map(|i| format!("test: {}", i)).collect())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = LoadConfig::load(std::env::args().nth(1))?;
    info!(
        "Running {} writers x {} sets (queue capacity {})",
        config.writers, config.sets_per_writer, config.store.channel_capacity
    );

    let keys = config.keys();

    let elapsed = run_channel_map(&config, keys.clone()).await?;
    info!("{} sets to channel map took {:?}", keys.len(), elapsed);

    let elapsed = run_mutex_map(&config, keys.clone()).await?;
    info!("{} sets to mutex-protected map took {:?}", keys.len(), elapsed);

    Ok(())
}

/// Drive the store worker with concurrent writers
async fn run_channel_map(config: &LoadConfig, keys: Arc<Vec<String>>) -> anyhow::Result<Duration> {
    let map: Handle<String> = Handle::with_config(config.store.clone())?;
    let start = Instant::now();

    let mut writers = Vec::with_capacity(config.writers);
    for writer in 0..config.writers {
        let map = map.clone();
        let keys = keys.clone();
        let per_writer = config.sets_per_writer;

        writers.push(tokio::spawn(async move {
            for key in &keys[writer * per_writer..(writer + 1) * per_writer] {
                map.set(key.as_str(), key.clone()).await?;
            }
            Ok::<_, chanmap::StoreError>(())
        }));
    }

    for writer in writers {
        writer.await??;
    }

    // Stats travels through the same queue, so every set above has been applied.
    let stats = map.stats().await?;
    let elapsed = start.elapsed();

    info!("Channel map stats: {}", serde_json::to_string(&stats)?);

    map.stop().await?;
    map.closed().await;

    Ok(elapsed)
}

/// Same workload against a map behind a mutex, for comparison
async fn run_mutex_map(config: &LoadConfig, keys: Arc<Vec<String>>) -> anyhow::Result<Duration> {
    let map = Arc::new(Mutex::new(HashMap::<String, String>::with_capacity(
        config.store.initial_capacity,
    )));
    let start = Instant::now();

    let mut writers = Vec::with_capacity(config.writers);
    for writer in 0..config.writers {
        let map = map.clone();
        let keys = keys.clone();
        let per_writer = config.sets_per_writer;

        writers.push(tokio::spawn(async move {
            for key in &keys[writer * per_writer..(writer + 1) * per_writer] {
                map.lock().await.insert(key.clone(), key.clone());
            }
        }));
    }

    for writer in writers {
        writer.await?;
    }

    Ok(start.elapsed())
}

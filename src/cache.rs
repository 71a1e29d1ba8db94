use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, RwLock};

/// Cache keys derived from the TMDb endpoint and its parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieSearch(String),
    MovieSearchWithYear(String, i32),
    MovieDetails(i64),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieSearch(query) => write!(f, "search:{}", query.to_lowercase()),
            CacheKey::MovieSearchWithYear(query, year) => {
                write!(f, "search:{}:{}", query.to_lowercase(), year)
            }
            CacheKey::MovieDetails(id) => write!(f, "details:{}", id),
        }
    }
}

struct CacheEntry {
    payload: String,
    expires_at: Instant,
}

/// In-process TTL cache for external API responses
///
/// Values are stored as serialized JSON with an absolute expiry instant.
/// Reads past the expiry are misses and remove the entry; a periodic
/// sweeper collects entries that are never read again. There is no size
/// bound.
///
/// Constructed once at startup and injected into whatever needs it, so
/// tests can supply an isolated instance.
#[derive(Clone, Default)]
pub struct TtlCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

/// Handle for gracefully shutting down the cache sweeper
pub struct CacheSweeperHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheSweeperHandle {
    /// Stops the periodic sweeper task
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache sweeper shutdown signal sent");
    }
}

impl TtlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves a value from the cache by key
    ///
    /// An expired entry is treated as a miss and removed. A payload that
    /// no longer deserializes is also treated as a miss.
    pub async fn get<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let key = key.to_string();

        let expired = {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                Some(entry) if Instant::now() >= entry.expires_at => true,
                Some(entry) => {
                    return match serde_json::from_str(&entry.payload) {
                        Ok(value) => Some(value),
                        Err(e) => {
                            tracing::warn!(key = %key, error = %e, "Cache deserialization failed");
                            None
                        }
                    };
                }
                None => return None,
            }
        };

        if expired {
            self.entries.write().await.remove(&key);
            tracing::debug!(key = %key, "Evicted expired cache entry on read");
        }

        None
    }

    /// Stores a value in the cache with the given time-to-live
    ///
    /// Overwriting an existing key is allowed; entries are immutable once
    /// written so a lost overwrite is harmless.
    pub async fn insert<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        let payload = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization failed");
                return;
            }
        };

        let entry = CacheEntry {
            payload,
            expires_at: Instant::now() + ttl,
        };

        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Removes all expired entries, returning how many were dropped
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    /// Number of live entries (including not-yet-swept expired ones)
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Spawns a background task that sweeps expired entries on a schedule
    ///
    /// Returns a handle that stops the task on shutdown.
    pub fn spawn_sweeper(&self, interval: Duration) -> CacheSweeperHandle {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let cache = self.clone();

        tokio::spawn(async move {
            tracing::info!(interval_secs = interval.as_secs(), "Cache sweeper task started");
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick resolves immediately

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.sweep().await;
                        if removed > 0 {
                            tracing::debug!(removed, "Swept expired cache entries");
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Cache sweeper task stopped");
                        break;
                    }
                }
            }
        });

        CacheSweeperHandle { shutdown_tx }
    }
}

/// A macro to simplify the cache-first lookup pattern.
///
/// Checks the cache for the given key. On a hit the cached value is
/// returned; on a miss the provided block computes the value, which is
/// stored with the given TTL and then returned.
///
/// # Arguments
/// * `$cache`: The [`TtlCache`] instance to consult.
/// * `$key`: The [`CacheKey`] under which the value lives.
/// * `$ttl`: Time-to-live for a freshly computed value.
/// * `$block`: Async block executed on a cache miss.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get(&$key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.insert(&$key, &value, $ttl).await;
            Ok(value)
        }
    }};
}

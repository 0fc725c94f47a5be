use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CacheValue<V> {
    value: V,
    expires_at: Instant,
}

type Gates<K> = std::sync::Mutex<HashMap<K, Arc<Mutex<()>>>>;

/// One caller's claim on a key's in-flight gate. Dropping the last claim
/// removes the gate, whether the caller fetched, found a fresh entry or was
/// cancelled while waiting.
struct InFlight<'a, K: Eq + Hash> {
    gates: &'a Gates<K>,
    key: K,
    gate: Arc<Mutex<()>>,
}

impl<'a, K: Eq + Hash + Clone> InFlight<'a, K> {
    fn join(gates: &'a Gates<K>, key: &K) -> Self {
        let mut map = gates.lock().unwrap_or_else(PoisonError::into_inner);
        let gate = Arc::clone(map.entry(key.clone()).or_default());
        InFlight {
            gates,
            key: key.clone(),
            gate,
        }
    }
}

impl<K: Eq + Hash> Drop for InFlight<'_, K> {
    fn drop(&mut self) {
        let mut map = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        // The map holds one reference and this claim another.
        if Arc::strong_count(&self.gate) <= 2 {
            map.remove(&self.key);
        }
    }
}

/// Keyed query cache with per-entry staleness windows.
///
/// Concurrent `get_or_fetch` calls for the same key share one fetch: the
/// first caller holds the key's in-flight lock while fetching, the rest wait
/// on it and then read the fresh entry. Failed fetches are never stored.
pub struct QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: Arc<Mutex<HashMap<K, CacheValue<V>>>>,
    in_flight: Arc<Gates<K>>,
}

impl<K, V> Clone for QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            in_flight: Arc::new(std::sync::Mutex::new(HashMap::new())),
        }
    }

    /// Returns a fresh value for `key`. A stale entry is evicted.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.entries.lock().await;
        if let Some(entry) = cache.get(key) {
            if entry.expires_at <= Instant::now() {
                debug!("Cache entry stale for key: {:?}", key);
                cache.remove(key);
                return None;
            }
            debug!("Cache HIT for key: {:?}", key);
            return Some(entry.value.clone());
        }
        debug!("Cache MISS for key: {:?}", key);
        None
    }

    /// Stores `value` for `stale_time`. A zero window stores nothing.
    pub async fn put(&self, key: K, value: V, stale_time: Duration) {
        if stale_time.is_zero() {
            return;
        }
        let expires_at = Instant::now() + stale_time;
        let mut cache = self.entries.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(key, CacheValue { value, expires_at });
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// success for `stale_time`.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, stale_time: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let claim = InFlight::join(&self.in_flight, &key);
        let _guard = claim.gate.lock().await;

        // Another caller may have filled the entry while we waited.
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let result = fetch().await;
        if let Ok(value) = &result {
            self.put(key, value.clone(), stale_time).await;
        }
        result
    }
}

impl<K, V> Default for QueryCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + std::fmt::Debug + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::weather::models::WeatherSnapshot;

/// A thread-safe keyed cache with TTL (time-to-live) support.
///
/// The `*_at` variants take the current instant explicitly so expiry can be
/// tested without sleeping.
pub struct TtlCache<K, V> {
    data: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: std::hash::Hash + Eq + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Get a value if it had not expired at `now`; expired entries are evicted
    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > now {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&self, key: K, value: V, now: Instant) {
        let entry = CacheEntry {
            value,
            expires_at: now + self.ttl,
        };
        self.data.insert(key, entry);
    }

    /// Remove entries that had expired at `now`
    pub fn cleanup_at(&self, now: Instant) {
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Weather snapshots keyed by normalized location
pub type WeatherCache = Arc<TtlCache<String, Arc<WeatherSnapshot>>>;

pub fn create_weather_cache(ttl: Duration) -> WeatherCache {
    Arc::new(TtlCache::new(ttl))
}

/// Normalize a location string for use as a cache key
pub fn normalize_cache_key(location: &str) -> String {
    location.trim().to_lowercase()
}

/// Start a background task that evicts expired snapshots every `every`
pub fn start_cache_cleanup_task(cache: WeatherCache, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let before = cache.len();
            cache.cleanup_at(Instant::now());
            let after = cache.len();
            if before != after {
                tracing::debug!(
                    removed = before - after,
                    remaining = after,
                    "Weather cache cleanup completed"
                );
            }
        }
    });
}

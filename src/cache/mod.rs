// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Bounded TTL cache shared by the external lookups
//!
//! One instance per lookup kind: forecast-zone resolution and emergency
//! contact resolution, both keyed by a rounded coordinate ([`GridKey`]).
//! Expired entries are purged lazily on access or by [`TtlCache::sweep`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{debug, trace};

/// Default maximum number of entries per cache
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Key→value store where every entry self-invalidates `ttl` after insertion
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
    capacity: usize,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Create a cache with a fixed time-to-live and entry bound
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(HashMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY))),
            ttl,
            capacity,
        }
    }

    /// Time-to-live applied to every insert
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry, dropping it if it has expired
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                trace!(?key, "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                trace!(?key, "cache entry expired");
                None
            }
            None => {
                trace!(?key, "cache miss");
                None
            }
        }
    }

    /// Store a value, replacing whatever occupied the slot
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock();

        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let now = Instant::now();
            entries.retain(|_, e| !e.is_expired(now));

            if entries.len() >= self.capacity {
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.expires_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest);
                    debug!(key = ?oldest, "cache full, evicted oldest entry");
                }
            }
        }

        trace!(?key, ttl_secs = self.ttl.as_secs(), "cache insert");
        entries.insert(key, CacheEntry::new(value, self.ttl));
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.lock().remove(key).map(|e| e.value)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored slots, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Purge every expired entry, returning how many were dropped
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, e| !e.is_expired(now));
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, remaining = entries.len(), "cache sweep");
        }
        evicted
    }
}

/// Coordinate rounded to a fixed number of decimals, used as a cache key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    lat: i64,
    lon: i64,
    precision: u8,
}

impl GridKey {
    pub fn new(lat: f64, lon: f64, precision: u8) -> Self {
        let scale = 10f64.powi(i32::from(precision));
        Self {
            lat: (lat * scale).round() as i64,
            lon: (lon * scale).round() as i64,
            precision,
        }
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10f64.powi(i32::from(self.precision));
        let p = usize::from(self.precision);
        write!(
            f,
            "{:.p$},{:.p$}",
            self.lat as f64 / scale,
            self.lon as f64 / scale,
            p = p
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache: TtlCache<&str, i32> = TtlCache::new(Duration::from_secs(60), 8);
        cache.insert("a", 1);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"a"), Some(1));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty(), "expired entry should be purged on access");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinsert_replaces_slot_and_resets_expiry() {
        let cache: TtlCache<&str, i32> = TtlCache::new(Duration::from_secs(10), 8);
        cache.insert("a", 1);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.insert("a", 2);
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get(&"a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_drops_only_expired() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(30), 8);
        cache.insert(1, 10);
        tokio::time::advance(Duration::from_secs(20)).await;
        cache.insert(2, 20);
        tokio::time::advance(Duration::from_secs(15)).await;

        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_evicts_oldest() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60), 2);
        cache.insert(1, 100);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert(2, 200);
        tokio::time::advance(Duration::from_secs(1)).await;
        cache.insert(3, 300);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&3), Some(300));
    }

    #[test]
    fn test_grid_key_rounding() {
        let a = GridKey::new(40.71281, -74.00601, 3);
        let b = GridKey::new(40.7126, -74.0058, 3);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "40.713,-74.006");

        let fine = GridKey::new(40.71281, -74.00601, 4);
        assert_ne!(GridKey::new(40.7126, -74.0058, 4), fine);
        assert_eq!(fine.precision(), 4);
    }
}

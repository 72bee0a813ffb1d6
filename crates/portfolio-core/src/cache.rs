//! TTL cache honoring per-endpoint revalidation windows.
//!
//! Only live payloads are stored, so a fallback answer is re-attempted on the
//! next request instead of being pinned for the whole window.

use std::future::Future;
use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::fallback::Sourced;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }
}

#[derive(Debug)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            let ttl = self.ttl;
            self.entries.remove_if(key, |_, entry| entry.is_expired(ttl));
        }
        None
    }

    pub fn insert(&self, key: K, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serves a fresh cached value as live, otherwise runs `fetch` and caches
    /// its result when it is live.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Sourced<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Sourced<V>>,
    {
        if let Some(hit) = self.get(&key) {
            debug!("serving cached upstream payload");
            return Sourced::live(hit);
        }

        let sourced = fetch().await;
        if sourced.is_live() {
            self.insert(key, sourced.data.clone());
        }
        sourced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entries_are_served() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k".to_string(), 1u32);
        assert_eq!(cache.get(&"k".to_string()), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k".to_string(), 1u32);
        assert_eq!(cache.get(&"k".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache = TtlCache::new(Duration::from_millis(5));
        cache.insert("k".to_string(), 1u32);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&"k".to_string()), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn only_live_payloads_are_cached() {
        let cache = TtlCache::new(Duration::from_secs(60));

        let first = cache
            .get_or_fetch("k".to_string(), || async { Sourced::fallback(1u32, "down") })
            .await;
        assert!(!first.is_live());
        assert!(cache.is_empty());

        let second = cache
            .get_or_fetch("k".to_string(), || async { Sourced::live(2u32) })
            .await;
        assert_eq!(second.data, 2);

        let third = cache
            .get_or_fetch("k".to_string(), || async { Sourced::live(3u32) })
            .await;
        assert!(third.is_live());
        assert_eq!(third.data, 2);

        cache.invalidate(&"k".to_string());
        assert!(cache.is_empty());
    }
}

use std::num::NonZeroUsize;

use async_trait::async_trait;
use lru::LruCache;
use macrolens_core::CacheStore;
use tokio::sync::Mutex;

/// In-process LRU-backed [`CacheStore`].
///
/// Entries are never evicted for age, only for capacity: freshness lives in
/// the serialized envelope so the fallback coordinator can still read an
/// expired entry when a live fetch fails.
pub struct MemoryStore {
    inner: Mutex<LruCache<String, String>>,
}

impl MemoryStore {
    /// Create a store holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        // Avoid zero capacity panics
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut guard = self.inner.lock().await;
        guard.get(key).cloned()
    }

    async fn set(&self, key: &str, value: String) {
        let mut guard = self.inner.lock().await;
        guard.put(key.to_string(), value);
    }

    async fn delete(&self, key: &str) {
        let mut guard = self.inner.lock().await;
        guard.pop(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete_round_trip() {
        let store = MemoryStore::new(4);
        assert_eq!(store.get("k").await, None);
        store.set("k", "v".to_string()).await;
        assert_eq!(store.get("k").await, Some("v".to_string()));
        store.delete("k").await;
        assert_eq!(store.get("k").await, None);
    }

    #[tokio::test]
    async fn capacity_evicts_least_recently_used() {
        let store = MemoryStore::new(2);
        store.set("a", "1".to_string()).await;
        store.set("b", "2".to_string()).await;
        store.get("a").await;
        store.set("c", "3".to_string()).await;
        assert_eq!(store.get("b").await, None);
        assert_eq!(store.get("a").await, Some("1".to_string()));
    }
}

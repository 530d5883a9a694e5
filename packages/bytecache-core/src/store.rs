//! Bounded store: weighted eviction with optional TTL

use crate::byte_view::ByteView;
use crate::config::NamespaceConfig;
use moka::sync::Cache;
use std::sync::Arc;

/// Key→[`ByteView`] container bounded by a byte budget.
///
/// Backed by moka (TinyLFU admission, LRU eviction). Each entry weighs its key
/// length plus its value length, and the cache evicts once the total exceeds
/// `capacity_bytes`. Eviction is applied by moka's maintenance tasks, so the
/// budget may be briefly overshot under concurrent writes. All operations are
/// internally synchronized.
#[derive(Clone)]
pub struct BoundedStore {
    cache: Cache<String, ByteView>,
    capacity_bytes: u64,
}

impl BoundedStore {
    pub fn new(config: &NamespaceConfig) -> Self {
        let namespace: Arc<str> = Arc::from(config.name.as_str());
        let log_evictions = config.enable_eviction_listener;

        let mut builder = Cache::builder()
            // Weigher: key + value bytes
            .weigher(|key: &String, value: &ByteView| entry_weight(key, value))
            .eviction_listener(move |key: Arc<String>, _value, cause| {
                if log_evictions {
                    tracing::debug!("{} evicted: {} (cause: {:?})", namespace, key, cause);
                }
            });

        // 0 = unbounded
        if config.capacity_bytes > 0 {
            builder = builder.max_capacity(config.capacity_bytes);
        }
        if let Some(ttl) = config.ttl() {
            builder = builder.time_to_live(ttl);
        }

        Self {
            cache: builder.build(),
            capacity_bytes: config.capacity_bytes,
        }
    }

    pub fn get(&self, key: &str) -> Option<ByteView> {
        self.cache.get(key)
    }

    pub fn add(&self, key: &str, value: ByteView) {
        self.cache.insert(key.to_string(), value);
    }

    /// Return the cached view, or run `init` once per key among concurrent
    /// callers and cache its result.
    ///
    /// Errors are shared with every caller waiting on the same key and are not
    /// cached.
    pub fn get_or_try_insert_with<F, E>(&self, key: &str, init: F) -> Result<ByteView, Arc<E>>
    where
        F: FnOnce() -> Result<ByteView, E>,
        E: Send + Sync + 'static,
    {
        self.cache.try_get_with_by_ref(key, init)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    pub fn invalidate(&self, key: &str) {
        self.cache.invalidate(key);
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }

    /// Apply pending evictions and expirations
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }

    /// Approximate entry count (exact after [`run_pending_tasks`](Self::run_pending_tasks))
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Sum of entry weights in bytes
    pub fn weighted_size(&self) -> u64 {
        self.cache.weighted_size()
    }

    /// Configured byte budget (0 = unbounded)
    pub fn capacity_bytes(&self) -> u64 {
        self.capacity_bytes
    }
}

fn entry_weight(key: &str, value: &ByteView) -> u32 {
    let bytes = key.len().saturating_add(value.len());
    u32::try_from(bytes).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity_bytes: u64) -> BoundedStore {
        BoundedStore::new(&NamespaceConfig::new("test", capacity_bytes))
    }

    #[test]
    fn test_add_get() {
        let store = store(1024);

        assert!(store.get("a").is_none());
        store.add("a", ByteView::from("1"));

        let view = store.get("a").unwrap();
        assert_eq!(view, "1");
        assert!(store.contains("a"));
    }

    #[test]
    fn test_get_shares_buffer() {
        let store = store(1024);
        let view = ByteView::from("payload");
        store.add("k", view.clone());

        assert!(store.get("k").unwrap().ptr_eq(&view));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let store = store(1024);
        store.add("a", ByteView::from("1"));
        store.add("b", ByteView::from("2"));

        store.invalidate("a");
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());

        store.clear();
        assert!(store.get("b").is_none());
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn test_weight_counts_key_and_value() {
        let store = store(1024);
        store.add("key", ByteView::from("value"));
        store.run_pending_tasks();

        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.weighted_size(), 8);
    }

    #[test]
    fn test_capacity_bound() {
        let store = store(100);

        for i in 0..50 {
            // 2-byte key + 8-byte value
            store.add(&format!("{:02}", i), ByteView::from(vec![0u8; 8]));
        }
        store.run_pending_tasks();

        assert!(store.weighted_size() <= 100);
        assert!(store.entry_count() <= 10);
    }

    #[test]
    fn test_unbounded() {
        let store = store(0);
        assert_eq!(store.capacity_bytes(), 0);

        for i in 0..100 {
            store.add(&i.to_string(), ByteView::from(vec![0u8; 64]));
        }
        store.run_pending_tasks();

        assert_eq!(store.entry_count(), 100);
    }

    #[test]
    fn test_try_insert_error_not_cached() {
        let store = store(1024);

        let err = store
            .get_or_try_insert_with("k", || Err::<ByteView, _>("boom"))
            .unwrap_err();
        assert_eq!(*err, "boom");
        assert!(!store.contains("k"));

        let view = store
            .get_or_try_insert_with("k", || Ok::<_, &str>(ByteView::from("v")))
            .unwrap();
        assert_eq!(view, "v");
        assert!(store.contains("k"));
    }

    #[test]
    fn test_ttl_expires_entries() {
        let store = BoundedStore::new(&NamespaceConfig::new("ttl", 1024).ttl_secs(1));
        store.add("k", ByteView::from("v"));
        assert!(store.get("k").is_some());

        std::thread::sleep(std::time::Duration::from_millis(1200));
        store.run_pending_tasks();

        assert!(store.get("k").is_none());
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn test_eviction_listener_enabled() {
        let config = NamespaceConfig::new("listened", 64).enable_eviction_listener(true);
        let store = BoundedStore::new(&config);

        for i in 0..32 {
            store.add(&format!("{:02}", i), ByteView::from(vec![0u8; 14]));
        }
        store.invalidate("00");
        store.run_pending_tasks();

        assert!(store.weighted_size() <= 64);
        assert!(store.entry_count() <= 4);
    }
}

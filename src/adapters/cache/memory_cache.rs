use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::ports::cache::PageCache;

const FALLBACK_CAPACITY: NonZeroUsize = NonZeroUsize::new(100).unwrap();

struct Snapshot {
    html: String,
    expires_at: Instant,
}

/// In-process LRU of page snapshots with a per-entry expiry.
pub struct MemoryCache {
    inner: Mutex<LruCache<String, Snapshot>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or_else(|| {
            tracing::warn!("Cache max_entries was 0, defaulting to {FALLBACK_CAPACITY}");
            FALLBACK_CAPACITY
        });
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map_or(0, |cache| cache.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PageCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let Ok(mut cache) = self.inner.lock() else {
            tracing::error!(key, "Page cache lock poisoned, treating as miss");
            return None;
        };
        let expired = cache.peek(key)?.expires_at <= Instant::now();
        if expired {
            cache.pop(key);
            return None;
        }
        cache.get(key).map(|snapshot| snapshot.html.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        let Ok(mut cache) = self.inner.lock() else {
            tracing::error!(key, "Page cache lock poisoned, skipping write");
            return;
        };
        cache.put(
            key.to_string(),
            Snapshot {
                html: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

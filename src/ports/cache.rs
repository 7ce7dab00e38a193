use std::time::Duration;

/// Short-lived store for fetched page snapshots, keyed by URL.
pub trait PageCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, ttl: Duration);
}

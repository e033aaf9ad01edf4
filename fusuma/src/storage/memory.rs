use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{LocalCache, RemoteStore, StoreError};

/// In-process local cache. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, String>>>,
    quota: Option<usize>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject blobs larger than `bytes`, like a browser storage quota.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    pub fn insert(&self, key: &str, blob: &str) {
        self.entries.lock().insert(key.to_string(), blob.to_string());
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entry(key))
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), StoreError> {
        if let Some(available) = self.quota {
            if blob.len() > available {
                return Err(StoreError::QuotaExceeded {
                    needed: blob.len(),
                    available,
                });
            }
        }
        self.insert(key, blob);
        Ok(())
    }
}

/// In-process remote store. Clones share the same entries and write count.
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    entries: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, blob: &str) {
        self.entries.lock().insert(key.to_string(), blob.to_string());
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    /// Successful puts so far.
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entry(key))
    }

    async fn put(&self, key: &str, blob: String) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), blob);
        *self.writes.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_clones_share_entries() {
        let cache = MemoryCache::new();
        let handle = cache.clone();
        cache.set("k", "v").unwrap();
        assert_eq!(handle.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(handle.get("missing").unwrap(), None);
    }

    #[test]
    fn test_cache_quota() {
        let cache = MemoryCache::new().with_quota(4);
        assert!(cache.set("k", "1234").is_ok());
        let err = cache.set("k", "12345").unwrap_err();
        assert!(matches!(
            err,
            StoreError::QuotaExceeded {
                needed: 5,
                available: 4
            }
        ));
        // Failed write leaves the previous value
        assert_eq!(cache.entry("k").as_deref(), Some("1234"));
    }

    #[tokio::test]
    async fn test_remote_counts_writes() {
        let remote = MemoryRemote::new();
        let handle = remote.clone();
        remote.put("k", "a".to_string()).await.unwrap();
        remote.put("k", "b".to_string()).await.unwrap();
        assert_eq!(handle.write_count(), 2);
        assert_eq!(handle.get("k").await.unwrap().as_deref(), Some("b"));
    }
}

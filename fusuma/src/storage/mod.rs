mod file;
mod memory;

pub use file::{FileCache, FileRemote};
pub use memory::{MemoryCache, MemoryRemote};

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage quota exceeded ({needed} bytes, {available} available)")]
    QuotaExceeded { needed: usize, available: usize },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fast synchronous store read once at startup so the first render has
/// cards, and written on every debounced local flush.
pub trait LocalCache {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, blob: &str) -> Result<(), StoreError>;
}

/// Shared store that carries the workspace across devices.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, blob: String) -> Result<(), StoreError>;
}

#[cfg(test)]
pub mod mock {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Local cache whose reads and writes can be made to fail.
    #[derive(Clone, Default)]
    pub struct MockCache {
        pub inner: MemoryCache,
        fail_reads: Arc<AtomicBool>,
        fail_writes: Arc<AtomicBool>,
    }

    impl MockCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_blob(self, key: &str, blob: &str) -> Self {
            self.inner.insert(key, blob);
            self
        }

        pub fn with_failing_reads(self) -> Self {
            self.fail_reads.store(true, Ordering::SeqCst);
            self
        }

        pub fn with_failing_writes(self) -> Self {
            self.fail_writes.store(true, Ordering::SeqCst);
            self
        }
    }

    impl LocalCache for MockCache {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("mock read failure".to_string()));
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, blob: &str) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::QuotaExceeded {
                    needed: blob.len(),
                    available: 0,
                });
            }
            self.inner.set(key, blob)
        }
    }

    /// Remote store that records attempts and fails on demand.
    /// Clones share state so a test can flip failures mid-run.
    #[derive(Clone, Default)]
    pub struct MockRemote {
        pub inner: MemoryRemote,
        fail_reads: Arc<AtomicBool>,
        fail_writes: Arc<AtomicBool>,
        put_attempts: Arc<AtomicUsize>,
    }

    impl MockRemote {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_blob(self, key: &str, blob: &str) -> Self {
            self.inner.insert(key, blob);
            self
        }

        pub fn with_failing_reads(self) -> Self {
            self.fail_reads.store(true, Ordering::SeqCst);
            self
        }

        pub fn with_failing_writes(self) -> Self {
            self.set_failing_writes(true);
            self
        }

        pub fn set_failing_writes(&self, failing: bool) {
            self.fail_writes.store(failing, Ordering::SeqCst);
        }

        pub fn put_attempts(&self) -> usize {
            self.put_attempts.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteStore for MockRemote {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("mock read failure".to_string()));
            }
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, blob: String) -> Result<(), StoreError> {
            self.put_attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("mock write failure".to_string()));
            }
            self.inner.put(key, blob).await
        }
    }
}

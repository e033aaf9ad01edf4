mod debounce;
mod merge;

pub use debounce::Debouncer;
pub use merge::{merge, same_content};

use fusuma_schema::PersistedWorkspace;

use crate::clock::Clock;
use crate::core::Config;
use crate::storage::{LocalCache, RemoteStore};

fn parse_blob(blob: &str, source: &str) -> Option<PersistedWorkspace> {
    match PersistedWorkspace::from_blob(blob) {
        Ok(persisted) => Some(persisted),
        Err(e) => {
            tracing::warn!("Ignoring {} workspace blob: {}", source, e);
            None
        }
    }
}

/// Debounced local and remote persistence of workspace snapshots.
///
/// Nothing here runs on its own: the owner calls [`SyncEngine::flush_due`]
/// once [`SyncEngine::next_deadline`] has passed. Remote writes stay gated
/// until [`SyncEngine::initial_sync`] has merged the remote copy in.
pub struct SyncEngine<L, R, C> {
    local: L,
    remote: R,
    clock: C,
    key: String,
    remote_retry_ms: u64,
    local_writer: Debouncer,
    remote_writer: Debouncer,
    remote_ready: bool,
    pending: Option<PersistedWorkspace>,
    last_recorded: Option<PersistedWorkspace>,
    remote_copy: Option<PersistedWorkspace>,
}

impl<L: LocalCache, R: RemoteStore, C: Clock> SyncEngine<L, R, C> {
    pub fn new(local: L, remote: R, clock: C, config: &Config) -> Self {
        Self {
            local,
            remote,
            clock,
            key: config.storage_key.clone(),
            remote_retry_ms: config.remote_retry_ms,
            local_writer: Debouncer::new(config.local_debounce_ms),
            remote_writer: Debouncer::new(config.remote_debounce_ms),
            remote_ready: false,
            pending: None,
            last_recorded: None,
            remote_copy: None,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn local(&self) -> &L {
        &self.local
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn is_remote_ready(&self) -> bool {
        self.remote_ready
    }

    /// Synchronous startup read of the local cache.
    pub fn load_local(&mut self) -> Option<PersistedWorkspace> {
        let loaded = match self.local.get(&self.key) {
            Ok(Some(blob)) => parse_blob(&blob, "local"),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read local cache: {}", e);
                None
            }
        };
        self.last_recorded = loaded.clone();
        loaded
    }

    async fn load_remote(&self) -> Option<PersistedWorkspace> {
        match self.remote.get(&self.key).await {
            Ok(Some(blob)) => parse_blob(&blob, "remote"),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read remote workspace, continuing with local: {}", e);
                None
            }
        }
    }

    /// Read the remote copy once and merge it with `local`. Nothing is
    /// written until [`SyncEngine::adopt`].
    pub async fn merge_remote(&mut self, local: PersistedWorkspace) -> PersistedWorkspace {
        let remote = self.load_remote().await;
        let merged = match &remote {
            Some(remote) => merge(&local, remote),
            None => local,
        };
        self.remote_copy = remote;
        merged
    }

    /// Persist the startup workspace locally and open the remote-write gate.
    /// The remote writer is armed when `snapshot` differs from the copy
    /// [`SyncEngine::merge_remote`] read.
    pub fn adopt(&mut self, snapshot: PersistedWorkspace) {
        self.write_local(&snapshot);
        self.local_writer.cancel();
        self.remote_ready = true;

        let remote_stale = match self.remote_copy.take() {
            Some(remote) => !same_content(&remote, &snapshot),
            None => !snapshot.is_empty(),
        };
        if remote_stale {
            self.remote_writer.trigger(self.clock.now_ms());
        }

        tracing::info!(
            "Initial sync done: {} cards, remote {}",
            snapshot.cards.len(),
            if remote_stale { "needs update" } else { "up to date" }
        );
        self.last_recorded = Some(snapshot.clone());
        self.pending = Some(snapshot);
    }

    /// [`SyncEngine::merge_remote`] then [`SyncEngine::adopt`] the merge as is.
    pub async fn initial_sync(&mut self, local: PersistedWorkspace) -> PersistedWorkspace {
        let merged = self.merge_remote(local).await;
        self.adopt(merged.clone());
        merged
    }

    /// Note a new workspace snapshot and (re)arm the writers.
    /// Snapshots that only differ in their timestamp are ignored.
    pub fn record(&mut self, snapshot: PersistedWorkspace) {
        if self
            .last_recorded
            .as_ref()
            .is_some_and(|last| same_content(last, &snapshot))
        {
            return;
        }

        let now = self.clock.now_ms();
        self.last_recorded = Some(snapshot.clone());
        self.pending = Some(snapshot);
        self.local_writer.trigger(now);
        if self.remote_ready {
            self.remote_writer.trigger(now);
        }
    }

    /// Earliest moment `flush_due` has work to do.
    pub fn next_deadline(&self) -> Option<u64> {
        let remote = self
            .remote_ready
            .then(|| self.remote_writer.deadline())
            .flatten();
        match (self.local_writer.deadline(), remote) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn has_pending_writes(&self) -> bool {
        self.next_deadline().is_some()
    }

    /// Run every writer whose deadline has passed.
    pub async fn flush_due(&mut self) {
        let now = self.clock.now_ms();
        if self.local_writer.take_due(now) {
            self.flush_local();
        }
        if self.remote_ready && self.remote_writer.take_due(now) {
            self.flush_remote().await;
        }
    }

    /// Run every armed writer now, e.g. before exiting.
    pub async fn flush_all(&mut self) {
        if self.local_writer.is_armed() {
            self.local_writer.cancel();
            self.flush_local();
        }
        if self.remote_ready && self.remote_writer.is_armed() {
            self.remote_writer.cancel();
            self.flush_remote().await;
        }
    }

    fn flush_local(&self) {
        if let Some(snapshot) = &self.pending {
            self.write_local(snapshot);
        }
    }

    fn write_local(&self, snapshot: &PersistedWorkspace) {
        let blob = match snapshot.to_blob() {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Failed to encode workspace: {}", e);
                return;
            }
        };
        match self.local.set(&self.key, &blob) {
            Ok(()) => tracing::debug!("Wrote local cache ({} bytes)", blob.len()),
            Err(e) => tracing::warn!("Failed to write local cache: {}", e),
        }
    }

    async fn flush_remote(&mut self) {
        let Some(snapshot) = &self.pending else {
            return;
        };
        let blob = match snapshot.to_blob() {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!("Failed to encode workspace: {}", e);
                return;
            }
        };

        match self.remote.put(&self.key, blob).await {
            Ok(()) => tracing::debug!("Wrote remote workspace"),
            Err(e) => {
                tracing::warn!(
                    "Remote write failed, retrying in {} ms: {}",
                    self.remote_retry_ms,
                    e
                );
                let now = self.clock.now_ms();
                self.remote_writer.trigger_after(now, self.remote_retry_ms);
            }
        }
    }
}

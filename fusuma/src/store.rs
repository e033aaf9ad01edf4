use std::sync::Arc;

use fusuma_schema::{ActiveMode, CardId, CardKind, CardMeta, LayoutMode, Point, Size, SnapZone};
use tokio::sync::watch;

use crate::clock::Clock;
use crate::core::{AddCardOptions, Config, Workspace};
use crate::storage::{LocalCache, RemoteStore};
use crate::sync::SyncEngine;

/// Reactive owner of the workspace.
///
/// Every mutator works on a clone of the current snapshot, publishes the
/// result to subscribers and hands it to the sync engine. Snapshots are
/// immutable once published.
pub struct WorkspaceStore<L, R, C> {
    current: Arc<Workspace>,
    tx: watch::Sender<Arc<Workspace>>,
    sync: SyncEngine<L, R, C>,
}

impl<L: LocalCache, R: RemoteStore, C: Clock> WorkspaceStore<L, R, C> {
    /// Start from the local cache so the first render already has cards.
    pub fn new(mut sync: SyncEngine<L, R, C>, config: &Config) -> Self {
        let workspace = match sync.load_local() {
            Some(persisted) => Workspace::from_persisted(config, persisted),
            None => Workspace::new(config),
        };
        tracing::info!("Loaded {} cards from local cache", workspace.cards.len());

        let current = Arc::new(workspace);
        let (tx, _rx) = watch::channel(current.clone());
        Self { current, tx, sync }
    }

    /// Merge with the remote copy, repair it, then persist and publish the
    /// repaired workspace.
    pub async fn initialize(&mut self) {
        let local = self.current.to_persisted();
        let merged = self.sync.merge_remote(local).await;
        let mut next = (*self.current).clone();
        next.apply_persisted(merged);
        self.sync.adopt(next.to_persisted());
        self.publish(next);
    }

    pub fn snapshot(&self) -> Arc<Workspace> {
        self.current.clone()
    }

    /// Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Workspace>> {
        self.tx.subscribe()
    }

    pub fn sync(&self) -> &SyncEngine<L, R, C> {
        &self.sync
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.sync.next_deadline()
    }

    pub async fn flush_due(&mut self) {
        self.sync.flush_due().await
    }

    pub async fn flush_all(&mut self) {
        self.sync.flush_all().await
    }

    fn publish(&mut self, next: Workspace) {
        let next = Arc::new(next);
        self.current = next.clone();
        self.tx.send_replace(next);
    }

    fn update<T>(&mut self, persist: bool, f: impl FnOnce(&mut Workspace) -> T) -> T {
        let mut next = (*self.current).clone();
        let result = f(&mut next);
        if next == *self.current {
            return result;
        }
        if persist {
            next.last_modified = self.sync.now_ms();
            self.sync.record(next.to_persisted());
        }
        self.publish(next);
        result
    }

    pub fn add_card(&mut self, kind: CardKind, options: AddCardOptions) -> CardId {
        let now = self.sync.now_ms();
        self.update(true, |ws| ws.add_card(kind, options, now))
    }

    pub fn remove_card(&mut self, id: &CardId) {
        self.update(true, |ws| ws.remove_card(id))
    }

    /// Focus alone never arms the writers.
    pub fn focus_card(&mut self, id: &CardId) {
        self.update(false, |ws| ws.focus_card(id))
    }

    pub fn minimize_card(&mut self, id: &CardId) {
        self.update(true, |ws| ws.minimize_card(id))
    }

    pub fn restore_card(&mut self, id: &CardId) {
        self.update(true, |ws| ws.restore_card(id))
    }

    pub fn maximize_card(&mut self, id: &CardId) {
        self.update(true, |ws| ws.maximize_card(id))
    }

    pub fn unmaximize_card(&mut self, id: &CardId) {
        self.update(true, |ws| ws.unmaximize_card(id))
    }

    pub fn toggle_maximize(&mut self, id: &CardId) {
        self.update(true, |ws| ws.toggle_maximize(id))
    }

    pub fn set_card_title(&mut self, id: &CardId, title: &str) {
        self.update(true, |ws| ws.set_card_title(id, title))
    }

    pub fn update_card_meta(&mut self, id: &CardId, meta: CardMeta) {
        self.update(true, |ws| ws.update_card_meta(id, meta))
    }

    pub fn move_card(&mut self, id: &CardId, x: i32, y: i32) {
        self.update(true, |ws| ws.move_card(id, x, y))
    }

    pub fn resize_card(&mut self, id: &CardId, width: u32, height: u32) {
        self.update(true, |ws| ws.resize_card(id, width, height))
    }

    pub fn snap_card(&mut self, id: &CardId, zone: SnapZone) {
        self.update(true, |ws| ws.snap_card(id, zone))
    }

    pub fn snap_card_at(&mut self, id: &CardId, point: Point) -> Option<SnapZone> {
        self.update(true, |ws| ws.snap_card_at(id, point))
    }

    pub fn unsnap_card(&mut self, id: &CardId) {
        self.update(true, |ws| ws.unsnap_card(id))
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.update(true, |ws| ws.set_layout_mode(mode))
    }

    pub fn cascade_cards(&mut self) {
        self.update(true, |ws| ws.cascade_cards())
    }

    pub fn tile_cards(&mut self) {
        self.update(true, |ws| ws.tile_cards())
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        self.update(true, |ws| ws.set_bounds(bounds))
    }

    pub fn set_active_mode(&mut self, mode: ActiveMode) {
        self.update(true, |ws| ws.set_active_mode(mode))
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.update(true, |ws| ws.set_snap_enabled(enabled))
    }

    pub fn set_grid_snap_enabled(&mut self, enabled: bool) {
        self.update(true, |ws| ws.set_grid_snap_enabled(enabled))
    }

    pub fn set_context_panel_collapsed(&mut self, collapsed: bool) {
        self.update(true, |ws| ws.set_context_panel_collapsed(collapsed))
    }

    pub fn set_is_mobile(&mut self, is_mobile: bool) {
        self.update(true, |ws| ws.set_is_mobile(is_mobile))
    }

    /// Carousel navigation, like focus, never arms the writers.
    pub fn set_mobile_active_index(&mut self, index: usize) {
        self.update(false, |ws| ws.set_mobile_active_index(index))
    }

    pub fn mobile_next(&mut self) {
        self.update(false, |ws| ws.mobile_next())
    }

    pub fn mobile_prev(&mut self) {
        self.update(false, |ws| ws.mobile_prev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::mock::MockRemote;
    use crate::storage::MemoryCache;
    use crate::core::zorder;
    use fusuma_schema::{Card, PersistedWorkspace, Rect};

    const KEY: &str = "workspace-layout";

    type TestStore = WorkspaceStore<MemoryCache, MockRemote, ManualClock>;

    fn store_with(local: MemoryCache, remote: MockRemote) -> (TestStore, ManualClock) {
        let config = Config::default();
        let clock = ManualClock::new(50_000);
        let sync = SyncEngine::new(local, remote, clock.clone(), &config);
        (WorkspaceStore::new(sync, &config), clock)
    }

    fn store() -> (TestStore, ManualClock) {
        store_with(MemoryCache::new(), MockRemote::new())
    }

    #[tokio::test]
    async fn test_subscribers_see_new_snapshots() {
        let (mut store, _clock) = store();
        let mut rx = store.subscribe();

        let id = store.add_card(CardKind::Chat, AddCardOptions::default());
        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert!(seen.card(&id).is_some());
        assert!(Arc::ptr_eq(&seen, &store.snapshot()));
    }

    #[tokio::test]
    async fn test_no_op_does_not_publish() {
        let (mut store, _clock) = store();
        let id = store.add_card(CardKind::Chat, AddCardOptions::default());
        let rx = store.subscribe();

        store.focus_card(&id);
        store.remove_card(&CardId::from("missing"));
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_old_snapshots_are_immutable() {
        let (mut store, _clock) = store();
        let before = store.snapshot();
        store.add_card(CardKind::Terminal, AddCardOptions::default());
        assert!(before.cards.is_empty());
        assert_eq!(store.snapshot().cards.len(), 1);
    }

    #[tokio::test]
    async fn test_focus_does_not_arm_writers() {
        let (mut store, _clock) = store();
        store.initialize().await;
        let a = store.add_card(CardKind::Chat, AddCardOptions::default());
        store.add_card(CardKind::Chat, AddCardOptions::default());
        store.flush_all().await;
        assert!(store.next_deadline().is_none());

        store.focus_card(&a);
        assert!(store.snapshot().is_focused(&a));
        assert!(store.next_deadline().is_none());
    }

    #[tokio::test]
    async fn test_mutation_stamps_last_modified_and_persists() {
        let (mut store, clock) = store();
        store.initialize().await;
        clock.advance(1_000);
        store.add_card(CardKind::Settings, AddCardOptions::default());
        assert_eq!(store.snapshot().last_modified, 51_000);

        clock.advance(300);
        store.flush_due().await;
        let blob = store.sync().local().entry(KEY).unwrap();
        let persisted = PersistedWorkspace::from_blob(&blob).unwrap();
        assert_eq!(persisted.cards.len(), 1);
        assert_eq!(persisted.last_modified, 51_000);
    }

    #[tokio::test]
    async fn test_startup_reads_local_then_merges_remote() {
        let (mut seed, _clock) = store();
        let local_id = seed.add_card(CardKind::Chat, AddCardOptions::default());
        let local_blob = seed.snapshot().to_persisted();

        let (mut other, _clock) = store();
        let remote_id = other.add_card(CardKind::Project, AddCardOptions::default());
        other.set_layout_mode(LayoutMode::Stack);
        let remote_blob = other.snapshot().to_persisted();

        let local = MemoryCache::new();
        local.insert(KEY, &local_blob.to_blob().unwrap());
        let remote = MockRemote::new().with_blob(KEY, &remote_blob.to_blob().unwrap());
        let (mut store, _clock) = store_with(local, remote.clone());
        let mut rx = store.subscribe();

        // First render comes from the local cache alone
        assert!(store.snapshot().card(&local_id).is_some());
        assert!(store.snapshot().card(&remote_id).is_none());

        store.initialize().await;
        assert!(rx.has_changed().unwrap());
        let ws = store.snapshot();
        let ids: Vec<&CardId> = ws.cards.iter().map(|c| &c.id).collect();
        assert_eq!(ids, vec![&remote_id, &local_id]);
        assert_eq!(ws.layout_mode, LayoutMode::Stack);

        store.flush_all().await;
        assert_eq!(remote.put_attempts(), 1);
    }

    fn tiled_blob(id: &str) -> PersistedWorkspace {
        let mut card = Card::new(
            CardKind::Chat.default_meta(),
            id.to_string(),
            Rect::new(40, 40, 600, 700),
            0,
        );
        card.id = CardId::from(id);
        card.z_index = 1;
        PersistedWorkspace {
            cards: vec![card],
            layout_mode: LayoutMode::Tile,
            ..PersistedWorkspace::default()
        }
    }

    #[tokio::test]
    async fn test_startup_persists_the_repaired_merge() {
        let local = MemoryCache::new();
        local.insert(KEY, &tiled_blob("local").to_blob().unwrap());
        let remote = MockRemote::new().with_blob(KEY, &tiled_blob("remote").to_blob().unwrap());
        let (mut store, _clock) = store_with(local, remote.clone());

        store.initialize().await;
        store.flush_all().await;

        let expected = store.snapshot().to_persisted();
        assert!(zorder::has_unique_z(&expected.cards));
        assert_ne!(expected.cards[0].position, expected.cards[1].position);

        let local_blob = store.sync().local().entry(KEY).unwrap();
        assert_eq!(PersistedWorkspace::from_blob(&local_blob).unwrap(), expected);
        let remote_blob = remote.inner.entry(KEY).unwrap();
        assert_eq!(PersistedWorkspace::from_blob(&remote_blob).unwrap(), expected);
        assert!(store.next_deadline().is_none());
    }

    #[tokio::test]
    async fn test_carousel_navigation_does_not_arm_writers() {
        let (mut store, _clock) = store();
        store.initialize().await;
        store.add_card(CardKind::Chat, AddCardOptions::default());
        store.add_card(CardKind::Terminal, AddCardOptions::default());
        store.set_is_mobile(true);
        store.flush_all().await;

        store.mobile_next();
        store.mobile_prev();
        store.set_mobile_active_index(1);
        assert_eq!(store.snapshot().mobile_active_index, 1);
        assert!(store.next_deadline().is_none());
    }
}

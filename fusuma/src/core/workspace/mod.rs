use fusuma_schema::{
    ActiveMode, Card, CardId, CardKind, CardMeta, LayoutMode, PersistedWorkspace, Point, Size,
    SnapZone, SCHEMA_VERSION,
};

use super::config::Config;
use super::zorder;

mod arrange;
mod cards;
mod mobile;
mod placement;

use arrange::*;
use cards::*;
use mobile::*;
use placement::*;

/// Optional inputs for [`Workspace::add_card`].
#[derive(Debug, Clone, Default)]
pub struct AddCardOptions {
    pub title: Option<String>,
    pub data_id: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub meta: Option<CardMeta>,
}

impl AddCardOptions {
    pub fn with_data_id(data_id: impl Into<String>) -> Self {
        Self {
            data_id: Some(data_id.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub active_mode: ActiveMode,
    /// Insertion order. Display order comes from `z_index`.
    pub cards: Vec<Card>,
    pub focused_card_id: Option<CardId>,
    pub next_z_index: u64,
    pub bounds: Size,
    pub layout_mode: LayoutMode,
    pub snap_enabled: bool,
    pub grid_snap_enabled: bool,
    pub context_panel_collapsed: bool,
    pub is_mobile: bool,
    pub mobile_active_index: usize,
    pub last_modified: u64,
    pub padding: u32,
    pub grid_size: u32,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Workspace {
    pub fn new(config: &Config) -> Self {
        Self {
            active_mode: ActiveMode::Workspace,
            cards: Vec::new(),
            focused_card_id: None,
            next_z_index: 1,
            bounds: config.initial_bounds,
            layout_mode: LayoutMode::FreeForm,
            snap_enabled: true,
            grid_snap_enabled: false,
            context_panel_collapsed: false,
            is_mobile: false,
            mobile_active_index: 0,
            last_modified: 0,
            padding: config.padding,
            grid_size: config.grid_size,
        }
    }

    pub fn from_persisted(config: &Config, persisted: PersistedWorkspace) -> Self {
        let mut ws = Self::new(config);
        ws.apply_persisted(persisted);
        ws
    }

    /// The part of the workspace written to the local cache and remote store.
    pub fn to_persisted(&self) -> PersistedWorkspace {
        PersistedWorkspace {
            version: SCHEMA_VERSION,
            cards: self.cards.clone(),
            layout_mode: self.layout_mode,
            context_panel_collapsed: self.context_panel_collapsed,
            snap_enabled: self.snap_enabled,
            grid_snap_enabled: self.grid_snap_enabled,
            last_modified: self.last_modified,
        }
    }

    /// Replace persisted fields, keeping runtime ones (focus, bounds, mobile
    /// state, active mode), then re-establish the invariants.
    pub fn apply_persisted(&mut self, persisted: PersistedWorkspace) {
        self.cards = persisted.cards;
        self.layout_mode = persisted.layout_mode;
        self.context_panel_collapsed = persisted.context_panel_collapsed;
        self.snap_enabled = persisted.snap_enabled;
        self.grid_snap_enabled = persisted.grid_snap_enabled;
        self.last_modified = persisted.last_modified;

        self.next_z_index = zorder::normalize(&mut self.cards, self.next_z_index);
        reflow(self);
        tracing::debug!(
            "Adopted persisted workspace: {} cards, {} layout",
            self.cards.len(),
            self.layout_mode
        );
    }

    // Queries

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub(crate) fn card_mut(&mut self, id: &CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| &c.id == id)
    }

    pub fn visible_cards(&self) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.is_visible()).collect()
    }

    pub fn minimized_cards(&self) -> Vec<&Card> {
        self.cards.iter().filter(|c| c.minimized).collect()
    }

    pub fn focused_card(&self) -> Option<&Card> {
        self.focused_card_id.as_ref().and_then(|id| self.card(id))
    }

    pub fn is_focused(&self, id: &CardId) -> bool {
        self.focused_card_id.as_ref() == Some(id)
    }

    pub fn topmost_card(&self) -> Option<&Card> {
        zorder::topmost(&self.cards)
    }

    /// Back-to-front, the order a renderer paints in.
    pub fn cards_by_z(&self) -> Vec<&Card> {
        zorder::stacking_order(&self.cards)
    }

    pub fn find_by_data(&self, kind: CardKind, data_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.matches_data(kind, data_id))
    }

    // Card lifecycle - delegated to workspace/cards.rs

    pub fn add_card(&mut self, kind: CardKind, options: AddCardOptions, now_ms: u64) -> CardId {
        add_card(self, kind, options, now_ms)
    }

    pub fn remove_card(&mut self, id: &CardId) {
        remove_card(self, id)
    }

    pub fn focus_card(&mut self, id: &CardId) {
        focus_card(self, id)
    }

    pub fn minimize_card(&mut self, id: &CardId) {
        minimize_card(self, id)
    }

    pub fn restore_card(&mut self, id: &CardId) {
        restore_card(self, id)
    }

    pub fn maximize_card(&mut self, id: &CardId) {
        maximize_card(self, id)
    }

    pub fn unmaximize_card(&mut self, id: &CardId) {
        unmaximize_card(self, id)
    }

    pub fn toggle_maximize(&mut self, id: &CardId) {
        toggle_maximize(self, id)
    }

    pub fn set_card_title(&mut self, id: &CardId, title: &str) {
        set_card_title(self, id, title)
    }

    pub fn update_card_meta(&mut self, id: &CardId, meta: CardMeta) {
        update_card_meta(self, id, meta)
    }

    // Placement - delegated to workspace/placement.rs

    pub fn move_card(&mut self, id: &CardId, x: i32, y: i32) {
        move_card(self, id, x, y)
    }

    pub fn resize_card(&mut self, id: &CardId, width: u32, height: u32) {
        resize_card(self, id, width, height)
    }

    pub fn snap_card(&mut self, id: &CardId, zone: SnapZone) {
        snap_card(self, id, zone)
    }

    pub fn snap_card_at(&mut self, id: &CardId, point: Point) -> Option<SnapZone> {
        snap_card_at(self, id, point)
    }

    pub fn unsnap_card(&mut self, id: &CardId) {
        unsnap_card(self, id)
    }

    // Arrangement - delegated to workspace/arrange.rs

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        set_layout_mode(self, mode)
    }

    pub fn cascade_cards(&mut self) {
        cascade_cards(self)
    }

    pub fn tile_cards(&mut self) {
        tile_cards(self)
    }

    pub fn set_bounds(&mut self, bounds: Size) {
        set_bounds(self, bounds)
    }

    /// Re-run the current layout mode and repair focus.
    pub fn reflow(&mut self) {
        reflow(self)
    }

    // Settings

    pub fn set_active_mode(&mut self, mode: ActiveMode) {
        if self.active_mode != mode {
            tracing::debug!("Active mode: {:?} -> {:?}", self.active_mode, mode);
            self.active_mode = mode;
        }
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    pub fn set_grid_snap_enabled(&mut self, enabled: bool) {
        self.grid_snap_enabled = enabled;
    }

    pub fn set_context_panel_collapsed(&mut self, collapsed: bool) {
        self.context_panel_collapsed = collapsed;
    }

    // Mobile carousel - delegated to workspace/mobile.rs

    pub fn set_is_mobile(&mut self, is_mobile: bool) {
        set_is_mobile(self, is_mobile)
    }

    pub fn mobile_cards(&self) -> Vec<&Card> {
        mobile_cards(self)
    }

    pub fn mobile_active_card(&self) -> Option<&Card> {
        mobile_active_card(self)
    }

    pub fn set_mobile_active_index(&mut self, index: usize) {
        set_mobile_active_index(self, index)
    }

    pub fn mobile_next(&mut self) {
        mobile_next(self)
    }

    pub fn mobile_prev(&mut self) {
        mobile_prev(self)
    }
}

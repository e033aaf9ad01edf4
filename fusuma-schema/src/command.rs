use serde::{Deserialize, Serialize};

use crate::{ActiveMode, CardId, CardKind, CardMeta, LayoutMode, Point, Size, SnapZone};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Card lifecycle
    AddCard {
        kind: CardKind,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        data_id: Option<String>,
        #[serde(default)]
        position: Option<Point>,
        #[serde(default)]
        size: Option<Size>,
        #[serde(default)]
        meta: Option<CardMeta>,
    },
    RemoveCard { id: CardId },
    FocusCard { id: CardId },
    MinimizeCard { id: CardId },
    RestoreCard { id: CardId },
    MaximizeCard { id: CardId },
    UnmaximizeCard { id: CardId },
    ToggleMaximize { id: CardId },
    SetCardTitle { id: CardId, title: String },
    UpdateCardMeta { id: CardId, meta: CardMeta },

    // Placement
    MoveCard { id: CardId, x: i32, y: i32 },
    ResizeCard { id: CardId, width: u32, height: u32 },
    SnapCard { id: CardId, zone: SnapZone },
    /// Dock wherever a drag released at (x, y) lands, if near an edge.
    SnapCardAt { id: CardId, x: i32, y: i32 },
    UnsnapCard { id: CardId },

    // Layout operations
    SetLayoutMode { mode: LayoutMode },
    CascadeCards,
    TileCards,

    // Workspace settings
    SetBounds { width: u32, height: u32 },
    SetActiveMode { mode: ActiveMode },
    SetSnapEnabled { enabled: bool },
    SetGridSnapEnabled { enabled: bool },
    SetContextPanelCollapsed { collapsed: bool },

    // Mobile carousel
    SetMobile { is_mobile: bool },
    SetMobileIndex { index: usize },
    MobileNext,
    MobilePrev,

    // Queries
    ListCards,
    GetState,
}

impl Command {
    /// Read-only commands never change the workspace.
    pub fn is_query(&self) -> bool {
        matches!(self, Command::ListCards | Command::GetState)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error { message: String },
    CardId { id: CardId },
    Snapped { zone: Option<SnapZone> },
    Cards { cards: Vec<CardInfo> },
    State { state: StateInfo },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardInfo {
    pub id: CardId,
    pub kind: CardKind,
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub z_index: u64,
    pub minimized: bool,
    pub maximized: bool,
    pub snapped_to: Option<SnapZone>,
    pub data_id: Option<String>,
    pub is_focused: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInfo {
    pub layout_mode: LayoutMode,
    pub active_mode: ActiveMode,
    pub focused_card_id: Option<CardId>,
    pub card_count: usize,
    pub visible_count: usize,
    pub width: u32,
    pub height: u32,
    pub snap_enabled: bool,
    pub grid_snap_enabled: bool,
    pub context_panel_collapsed: bool,
    pub is_mobile: bool,
    pub mobile_active_index: usize,
}

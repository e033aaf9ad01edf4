pub mod cascade;
pub mod engine;
pub mod focus;
pub mod side_by_side;
pub mod snap;
pub mod stack;
pub mod tile;

use fusuma_schema::CardId;

pub use engine::{apply_layout, release_layout, LayoutContext, LayoutOutcome};
pub use snap::{snap_rect, zone_at, SNAP_EDGE_THRESHOLD};

/// Gap between cards and around the workspace edge in auto layouts.
pub const LAYOUT_PADDING: u32 = 16;

/// One card's placement as computed by a layout algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct CardGeometry {
    pub id: CardId,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

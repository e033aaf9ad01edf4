use fusuma_layout::{snap_rect, zone_at, SNAP_EDGE_THRESHOLD};
use fusuma_schema::{Card, CardId, Point, Size, SnapZone, MIN_CARD_SIZE};

use super::super::zorder;
use super::Workspace;

/// Round to the nearest grid line, halves away from the origin on the
/// positive side.
pub(crate) fn round_to_grid(value: i32, grid: u32) -> i32 {
    if grid == 0 {
        return value;
    }
    let grid = i64::from(grid);
    let rounded = (i64::from(value) + grid / 2).div_euclid(grid) * grid;
    rounded.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn grid_for(ws: &Workspace) -> u32 {
    if ws.grid_snap_enabled {
        ws.grid_size
    } else {
        0
    }
}

/// Manual placement drops every automatic arrangement.
fn release_to_free_placement(card: &mut Card) {
    card.snapped_to = None;
    card.maximized = false;
    card.clear_saved_geometry();
}

pub fn move_card(ws: &mut Workspace, id: &CardId, x: i32, y: i32) {
    let grid = grid_for(ws);
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Move: unknown card {}", id);
        return;
    };
    release_to_free_placement(card);
    card.position = Point::new(round_to_grid(x, grid), round_to_grid(y, grid));
}

pub fn resize_card(ws: &mut Workspace, id: &CardId, width: u32, height: u32) {
    let grid = grid_for(ws);
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Resize: unknown card {}", id);
        return;
    };
    release_to_free_placement(card);
    let width = round_to_grid(width.min(i32::MAX as u32) as i32, grid).max(0) as u32;
    let height = round_to_grid(height.min(i32::MAX as u32) as i32, grid).max(0) as u32;
    card.size = Size::new(width, height).at_least(MIN_CARD_SIZE);
}

pub fn snap_card(ws: &mut Workspace, id: &CardId, zone: SnapZone) {
    if !ws.snap_enabled {
        tracing::debug!("Snap disabled, ignoring snap of {}", id);
        return;
    }
    let rect = snap_rect(zone, ws.bounds);
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Snap: unknown card {}", id);
        return;
    };
    if card.minimized {
        return;
    }
    card.capture_geometry();
    card.maximized = false;
    card.snapped_to = Some(zone);
    card.set_rect(rect);
    tracing::debug!("Snapped card {} to {}", id, zone);

    zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, id);
    ws.focused_card_id = Some(id.clone());
}

/// Dock a card released at `point` if it landed near an edge.
pub fn snap_card_at(ws: &mut Workspace, id: &CardId, point: Point) -> Option<SnapZone> {
    if !ws.snap_enabled {
        return None;
    }
    let zone = zone_at(point, ws.bounds, SNAP_EDGE_THRESHOLD)?;
    snap_card(ws, id, zone);
    ws.card(id)
        .filter(|c| c.snapped_to == Some(zone))
        .map(|_| zone)
}

pub fn unsnap_card(ws: &mut Workspace, id: &CardId) {
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Unsnap: unknown card {}", id);
        return;
    };
    if card.snapped_to.take().is_none() {
        return;
    }
    card.restore_geometry();
}

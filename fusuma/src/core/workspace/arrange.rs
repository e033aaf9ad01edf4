use fusuma_layout::{
    apply_layout, cascade, release_layout, snap_rect, tile, CardGeometry, LayoutContext,
};
use fusuma_schema::{CardId, LayoutMode, Rect, Size};

use super::super::zorder;
use super::{clamp_mobile_index, Workspace};

/// Re-run the current layout mode, then repair focus and the carousel index.
pub fn reflow(ws: &mut Workspace) {
    if ws.layout_mode.is_auto() {
        let focused = ws.focused_card_id.clone();
        let ctx = LayoutContext {
            bounds: ws.bounds,
            padding: ws.padding,
            focused: focused.as_ref(),
            next_z_index: ws.next_z_index,
        };
        let outcome = apply_layout(ws.layout_mode, &mut ws.cards, &ctx);
        ws.next_z_index = outcome.next_z_index;

        // Focus follows the card focus mode shows
        if let Some(id) = outcome.maximized {
            zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, &id);
            ws.focused_card_id = Some(id);
        }
    }
    normalize_focus(ws);
    clamp_mobile_index(ws);
}

/// Drop focus that points at a missing or minimized card.
pub fn normalize_focus(ws: &mut Workspace) {
    let stale = match ws.focused_card() {
        Some(card) => card.minimized,
        None => ws.focused_card_id.is_some(),
    };
    if stale {
        ws.focused_card_id = None;
    }
}

pub fn set_layout_mode(ws: &mut Workspace, mode: LayoutMode) {
    if ws.layout_mode == mode {
        return;
    }
    tracing::info!("Layout mode: {} -> {}", ws.layout_mode, mode);

    if ws.layout_mode.is_auto() {
        release_layout(&mut ws.cards);
    }
    ws.layout_mode = mode;
    reflow(ws);
}

/// One-shot placement: the cards behave as if dragged there by hand.
fn place_manually(ws: &mut Workspace, geometries: &[CardGeometry]) {
    for geometry in geometries {
        if let Some(card) = ws.card_mut(&geometry.id) {
            card.snapped_to = None;
            card.maximized = false;
            card.clear_saved_geometry();
            card.set_rect(Rect::new(
                geometry.x,
                geometry.y,
                geometry.width,
                geometry.height,
            ));
        }
    }
}

/// Cascade visible cards oldest first, re-stacking them in that order.
pub fn cascade_cards(ws: &mut Workspace) {
    let mut visible: Vec<_> = ws
        .cards
        .iter()
        .filter(|c| c.is_visible())
        .map(|c| (c.created_at, c.id.clone(), c.size))
        .collect();
    visible.sort_by_key(|(created_at, _, _)| *created_at);
    let cards: Vec<(CardId, Size)> = visible.into_iter().map(|(_, id, size)| (id, size)).collect();

    let geometries = cascade::generate_layout(ws.bounds, ws.padding, &cards);
    place_manually(ws, &geometries);
    for geometry in &geometries {
        zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, &geometry.id);
    }
    if let Some(last) = geometries.last() {
        ws.focused_card_id = Some(last.id.clone());
    }
    tracing::debug!("Cascaded {} cards", geometries.len());
}

/// One-shot grid arrangement; the layout mode is left alone.
pub fn tile_cards(ws: &mut Workspace) {
    let ids: Vec<CardId> = ws
        .cards
        .iter()
        .filter(|c| c.is_visible())
        .map(|c| c.id.clone())
        .collect();
    let geometries = tile::generate_layout(ws.bounds, ws.padding, &ids);
    place_manually(ws, &geometries);
    tracing::debug!("Tiled {} cards", geometries.len());
}

pub fn set_bounds(ws: &mut Workspace, bounds: Size) {
    let bounds = Size::new(bounds.width.max(1), bounds.height.max(1));
    if ws.bounds == bounds {
        return;
    }
    tracing::debug!(
        "Bounds: {}x{} -> {}x{}",
        ws.bounds.width,
        ws.bounds.height,
        bounds.width,
        bounds.height
    );
    ws.bounds = bounds;

    if ws.layout_mode.is_auto() {
        reflow(ws);
        return;
    }
    for card in ws.cards.iter_mut() {
        if card.maximized {
            card.set_rect(Rect::new(0, 0, bounds.width, bounds.height));
        } else if let Some(zone) = card.snapped_to {
            card.set_rect(snap_rect(zone, bounds));
        }
    }
}

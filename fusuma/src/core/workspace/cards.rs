use fusuma_layout::cascade;
use fusuma_schema::{Card, CardId, CardKind, CardMeta, LayoutMode, Rect, MIN_CARD_SIZE};

use super::super::zorder;
use super::{reflow, AddCardOptions, Workspace};

/// Open-or-focus: a card already showing `(kind, data_id)` is restored and
/// focused instead of duplicated.
pub fn add_card(ws: &mut Workspace, kind: CardKind, options: AddCardOptions, now_ms: u64) -> CardId {
    if let Some(data_id) = options.data_id.as_deref() {
        if let Some(existing) = ws.find_by_data(kind, data_id) {
            let id = existing.id.clone();
            let minimized = existing.minimized;
            tracing::debug!("{} card for {} already open: {}", kind, data_id, id);
            if minimized {
                restore_card(ws, &id);
            } else {
                focus_card(ws, &id);
            }
            return id;
        }
    }

    let meta = match options.meta {
        Some(meta) if meta.kind() == kind => meta,
        Some(meta) => {
            tracing::debug!("Ignoring {} meta for new {} card", meta.kind(), kind);
            kind.default_meta()
        }
        None => kind.default_meta(),
    };
    let title = options
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| kind.default_title().to_string());
    let size = match options.size {
        Some(size) => size.at_least(MIN_CARD_SIZE),
        None => cascade::fit_size(kind.default_size(), ws.bounds, ws.padding),
    };
    let position = options.position.unwrap_or_else(|| {
        let anchor = ws.topmost_card().map(|c| c.position);
        cascade::next_position(anchor, size, ws.bounds, ws.padding)
    });

    let mut card = Card::new(meta, title, Rect::from_parts(position, size), now_ms);
    card.data_id = options.data_id;
    let id = card.id.clone();
    tracing::debug!("Add {} card {} at {}", kind, id, card.rect());

    ws.cards.push(card);
    zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, &id);
    ws.focused_card_id = Some(id.clone());
    reflow(ws);
    id
}

pub fn remove_card(ws: &mut Workspace, id: &CardId) {
    let Some(index) = ws.cards.iter().position(|c| &c.id == id) else {
        tracing::debug!("Remove: unknown card {}", id);
        return;
    };
    ws.cards.remove(index);
    if ws.is_focused(id) {
        ws.focused_card_id = None;
    }
    tracing::debug!("Removed card {}", id);
    reflow(ws);
}

pub fn focus_card(ws: &mut Workspace, id: &CardId) {
    match ws.card(id).map(|c| c.is_visible()) {
        Some(true) => {}
        Some(false) => {
            tracing::debug!("Focus: card {} is minimized", id);
            return;
        }
        None => {
            tracing::debug!("Focus: unknown card {}", id);
            return;
        }
    }
    zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, id);
    ws.focused_card_id = Some(id.clone());
}

pub fn minimize_card(ws: &mut Workspace, id: &CardId) {
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Minimize: unknown card {}", id);
        return;
    };
    if card.minimized {
        return;
    }
    if card.maximized {
        card.maximized = false;
        card.restore_geometry();
    }
    card.minimized = true;
    card.auto_minimized = false;

    if ws.is_focused(id) {
        ws.focused_card_id = None;
    }
    reflow(ws);
}

pub fn restore_card(ws: &mut Workspace, id: &CardId) {
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Restore: unknown card {}", id);
        return;
    };
    if !card.minimized {
        return;
    }
    card.minimized = false;
    card.auto_minimized = false;

    zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, id);
    ws.focused_card_id = Some(id.clone());
    // In focus mode this demotes the card currently shown
    reflow(ws);
}

pub fn maximize_card(ws: &mut Workspace, id: &CardId) {
    let fullscreen = Rect::new(0, 0, ws.bounds.width, ws.bounds.height);
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Maximize: unknown card {}", id);
        return;
    };
    if card.maximized && card.is_visible() {
        return;
    }
    card.minimized = false;
    card.auto_minimized = false;
    card.capture_geometry();
    card.snapped_to = None;
    card.maximized = true;
    card.set_rect(fullscreen);

    zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, id);
    ws.focused_card_id = Some(id.clone());
    if ws.layout_mode == LayoutMode::Focus {
        reflow(ws);
    }
}

pub fn unmaximize_card(ws: &mut Workspace, id: &CardId) {
    let Some(card) = ws.card_mut(id) else {
        tracing::debug!("Unmaximize: unknown card {}", id);
        return;
    };
    if !card.maximized {
        return;
    }
    card.maximized = false;
    card.restore_geometry();

    // Focus mode immediately re-maximizes the focused card
    if ws.layout_mode.is_auto() {
        reflow(ws);
    }
}

pub fn toggle_maximize(ws: &mut Workspace, id: &CardId) {
    match ws.card(id).map(|c| c.maximized) {
        Some(true) => unmaximize_card(ws, id),
        Some(false) => maximize_card(ws, id),
        None => tracing::debug!("Toggle maximize: unknown card {}", id),
    }
}

pub fn set_card_title(ws: &mut Workspace, id: &CardId, title: &str) {
    if let Some(card) = ws.card_mut(id) {
        if card.title != title {
            card.title = title.to_string();
        }
    }
}

/// Replace a card's meta. A variant of a different kind is ignored.
pub fn update_card_meta(ws: &mut Workspace, id: &CardId, meta: CardMeta) {
    let Some(card) = ws.card_mut(id) else {
        return;
    };
    if card.kind() != meta.kind() {
        tracing::debug!(
            "Refusing {} meta for {} card {}",
            meta.kind(),
            card.kind(),
            id
        );
        return;
    }
    card.meta = meta;
}

use fusuma_schema::{Card, CardId, Rect, Size};

/// Pick the card focus mode should show fullscreen.
///
/// Priority: the focused card if visible, then the first visible card in
/// insertion order, then the most recently stacked card focus mode itself
/// minimized (so closing the shown card reveals the next one).
pub fn select_target(cards: &[Card], focused: Option<&CardId>) -> Option<CardId> {
    if let Some(id) = focused {
        if cards.iter().any(|c| &c.id == id && c.is_visible()) {
            return Some(id.clone());
        }
    }

    if let Some(card) = cards.iter().find(|c| c.is_visible()) {
        return Some(card.id.clone());
    }

    cards
        .iter()
        .filter(|c| c.auto_minimized)
        .max_by_key(|c| c.z_index)
        .map(|c| c.id.clone())
}

/// Maximize exactly one card and force every other visible card minimized.
/// Returns the maximized card, if any card could be shown.
pub fn apply(cards: &mut [Card], focused: Option<&CardId>, bounds: Size) -> Option<CardId> {
    let target = select_target(cards, focused)?;
    let fullscreen = Rect::new(0, 0, bounds.width, bounds.height);

    for card in cards.iter_mut() {
        if card.id == target {
            card.capture_geometry();
            card.minimized = false;
            card.auto_minimized = false;
            card.maximized = true;
            card.snapped_to = None;
            card.set_rect(fullscreen);
        } else {
            if card.is_visible() {
                card.capture_geometry();
                card.minimized = true;
                card.auto_minimized = true;
            }
            card.maximized = false;
        }
    }

    tracing::debug!("Focus layout shows card {}", target);
    Some(target)
}

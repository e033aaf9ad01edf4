use fusuma_schema::{Card, CardId};

use super::super::zorder;
use super::Workspace;

/// Crossing the mobile breakpoint always starts the carousel over.
pub fn set_is_mobile(ws: &mut Workspace, is_mobile: bool) {
    if ws.is_mobile != is_mobile {
        tracing::info!("Mobile layout {}", if is_mobile { "on" } else { "off" });
    }
    ws.is_mobile = is_mobile;
    ws.mobile_active_index = 0;
}

/// Carousel pages: visible cards in insertion order.
pub fn mobile_cards(ws: &Workspace) -> Vec<&Card> {
    ws.cards.iter().filter(|c| c.is_visible()).collect()
}

pub fn mobile_active_card(ws: &Workspace) -> Option<&Card> {
    mobile_cards(ws).get(ws.mobile_active_index).copied()
}

/// Select a page (clamped to the last one) and focus its card.
pub fn set_mobile_active_index(ws: &mut Workspace, index: usize) {
    let ids: Vec<CardId> = mobile_cards(ws).iter().map(|c| c.id.clone()).collect();
    let Some(last) = ids.len().checked_sub(1) else {
        ws.mobile_active_index = 0;
        return;
    };
    let index = index.min(last);
    ws.mobile_active_index = index;

    let id = &ids[index];
    zorder::bring_to_front(&mut ws.cards, &mut ws.next_z_index, id);
    ws.focused_card_id = Some(id.clone());
}

pub fn mobile_next(ws: &mut Workspace) {
    let index = ws.mobile_active_index.saturating_add(1);
    set_mobile_active_index(ws, index);
}

pub fn mobile_prev(ws: &mut Workspace) {
    let index = ws.mobile_active_index.saturating_sub(1);
    set_mobile_active_index(ws, index);
}

pub fn clamp_mobile_index(ws: &mut Workspace) {
    let count = ws.cards.iter().filter(|c| c.is_visible()).count();
    ws.mobile_active_index = ws.mobile_active_index.min(count.saturating_sub(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AddCardOptions;
    use fusuma_schema::CardKind;

    fn workspace(n: usize) -> (Workspace, Vec<CardId>) {
        let mut ws = Workspace::default();
        let ids = (0..n)
            .map(|i| ws.add_card(CardKind::Chat, AddCardOptions::default(), i as u64))
            .collect();
        ws.set_is_mobile(true);
        (ws, ids)
    }

    #[test]
    fn test_set_is_mobile_resets_index() {
        let (mut ws, _) = workspace(3);
        set_mobile_active_index(&mut ws, 2);
        set_is_mobile(&mut ws, false);
        assert_eq!(ws.mobile_active_index, 0);
        assert!(!ws.is_mobile);
    }

    #[test]
    fn test_navigation_clamps_without_wrapping() {
        let (mut ws, ids) = workspace(3);
        mobile_prev(&mut ws);
        assert_eq!(ws.mobile_active_index, 0);

        mobile_next(&mut ws);
        mobile_next(&mut ws);
        mobile_next(&mut ws);
        assert_eq!(ws.mobile_active_index, 2);
        assert_eq!(mobile_active_card(&ws).map(|c| &c.id), Some(&ids[2]));

        set_mobile_active_index(&mut ws, 99);
        assert_eq!(ws.mobile_active_index, 2);
    }

    #[test]
    fn test_selecting_page_focuses_card() {
        let (mut ws, ids) = workspace(3);
        set_mobile_active_index(&mut ws, 0);
        assert!(ws.is_focused(&ids[0]));
        assert_eq!(ws.topmost_card().map(|c| &c.id), Some(&ids[0]));
    }

    #[test]
    fn test_minimized_cards_are_not_pages() {
        let (mut ws, ids) = workspace(3);
        ws.minimize_card(&ids[1]);
        let pages: Vec<&CardId> = mobile_cards(&ws).iter().map(|c| &c.id).collect();
        assert_eq!(pages, vec![&ids[0], &ids[2]]);
    }

    #[test]
    fn test_index_clamped_after_removal() {
        let (mut ws, ids) = workspace(3);
        set_mobile_active_index(&mut ws, 2);
        ws.remove_card(&ids[2]);
        assert_eq!(ws.mobile_active_index, 1);
        ws.remove_card(&ids[0]);
        ws.remove_card(&ids[1]);
        assert_eq!(ws.mobile_active_index, 0);
        assert!(mobile_active_card(&ws).is_none());
    }
}

use fusuma_schema::{Card, CardId, LayoutMode, Rect, Size};

use crate::{focus, side_by_side, stack, tile, CardGeometry};

pub struct LayoutContext<'a> {
    pub bounds: Size,
    pub padding: u32,
    pub focused: Option<&'a CardId>,
    pub next_z_index: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub next_z_index: u64,
    /// The card focus mode maximized.
    pub maximized: Option<CardId>,
}

/// Visible cards in insertion order.
pub fn visible_card_ids(cards: &[Card]) -> Vec<CardId> {
    cards
        .iter()
        .filter(|c| c.is_visible())
        .map(|c| c.id.clone())
        .collect()
}

/// Reflow `cards` for `mode`. Minimized cards pass through untouched
/// (focus mode may additionally demote or promote cards).
pub fn apply_layout(mode: LayoutMode, cards: &mut [Card], ctx: &LayoutContext) -> LayoutOutcome {
    let mut outcome = LayoutOutcome {
        next_z_index: ctx.next_z_index,
        maximized: None,
    };

    match mode {
        LayoutMode::FreeForm => {}
        LayoutMode::SideBySide => {
            let ids = visible_card_ids(cards);
            let geometries = side_by_side::generate_layout(ctx.bounds, ctx.padding, &ids);
            apply_geometries(cards, &geometries);
        }
        LayoutMode::Tile => {
            let ids = visible_card_ids(cards);
            let geometries = tile::generate_layout(ctx.bounds, ctx.padding, &ids);
            apply_geometries(cards, &geometries);
        }
        LayoutMode::Stack => {
            let ids = visible_card_ids(cards);
            let geometries = stack::generate_layout(ctx.bounds, &ids);
            apply_geometries(cards, &geometries);

            // Later cards render above earlier ones
            let max_existing = cards.iter().map(|c| c.z_index).max().unwrap_or(0);
            let mut z = ctx.next_z_index.max(max_existing + 1);
            for id in &ids {
                if let Some(card) = cards.iter_mut().find(|c| &c.id == id) {
                    card.z_index = z;
                    z += 1;
                }
            }
            outcome.next_z_index = z;
        }
        LayoutMode::Focus => {
            outcome.maximized = focus::apply(cards, ctx.focused, ctx.bounds);
        }
    }

    tracing::debug!(
        "Applied {} layout to {} cards ({} visible)",
        mode,
        cards.len(),
        cards.iter().filter(|c| c.is_visible()).count()
    );

    outcome
}

/// Write layout output into the cards, remembering the pre-layout geometry.
pub fn apply_geometries(cards: &mut [Card], geometries: &[CardGeometry]) {
    for geometry in geometries {
        if let Some(card) = cards.iter_mut().find(|c| c.id == geometry.id) {
            card.capture_geometry();
            card.snapped_to = None;
            card.maximized = false;
            card.set_rect(Rect::new(
                geometry.x,
                geometry.y,
                geometry.width,
                geometry.height,
            ));
        }
    }
}

/// Undo every automatic arrangement: restore saved geometry and bring back
/// cards focus mode minimized. Cards the user minimized stay minimized.
pub fn release_layout(cards: &mut [Card]) {
    for card in cards.iter_mut() {
        if card.auto_minimized {
            card.minimized = false;
            card.auto_minimized = false;
        }
        card.maximized = false;
        card.snapped_to = None;
        card.restore_geometry();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusuma_schema::{CardKind, Point, SnapZone};

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| {
                let mut card = Card::new(
                    CardKind::Terminal.default_meta(),
                    format!("T{}", i),
                    Rect::new(40 * i as i32, 30 * i as i32, 500, 400),
                    i as u64,
                );
                card.id = CardId::from(format!("c{}", i));
                card.z_index = i as u64 + 1;
                card
            })
            .collect()
    }

    fn ctx(focused: Option<&CardId>) -> LayoutContext<'_> {
        LayoutContext {
            bounds: Size::new(1920, 1080),
            padding: 16,
            focused,
            next_z_index: 10,
        }
    }

    #[test]
    fn test_free_form_is_identity() {
        let mut list = cards(3);
        let before = list.clone();
        let outcome = apply_layout(LayoutMode::FreeForm, &mut list, &ctx(None));
        assert_eq!(list, before);
        assert_eq!(outcome.next_z_index, 10);
    }

    #[test]
    fn test_minimized_cards_pass_through() {
        let mut list = cards(3);
        list[1].minimized = true;
        let before = list[1].clone();
        apply_layout(LayoutMode::Tile, &mut list, &ctx(None));
        assert_eq!(list[1], before);
        // Two visible cards share a single row
        assert_eq!(list[0].position.y, list[2].position.y);
    }

    #[test]
    fn test_layout_captures_geometry_and_clears_snap() {
        let mut list = cards(2);
        list[0].snapped_to = Some(SnapZone::Left);
        list[0].saved_position = Some(Point::new(7, 7));
        list[0].saved_size = Some(Size::new(300, 300));

        apply_layout(LayoutMode::SideBySide, &mut list, &ctx(None));

        assert_eq!(list[0].snapped_to, None);
        // Existing snapshot kept
        assert_eq!(list[0].saved_position, Some(Point::new(7, 7)));
        assert_eq!(list[1].saved_position, Some(Point::new(40, 30)));
    }

    #[test]
    fn test_stack_assigns_increasing_z() {
        let mut list = cards(3);
        list[2].z_index = 40;
        let outcome = apply_layout(LayoutMode::Stack, &mut list, &ctx(None));

        let zs: Vec<u64> = list.iter().map(|c| c.z_index).collect();
        assert_eq!(zs, vec![41, 42, 43]);
        assert_eq!(outcome.next_z_index, 44);
        assert!(list[1].position.x > list[0].position.x);
    }

    #[test]
    fn test_focus_outcome_reports_maximized() {
        let mut list = cards(3);
        let focused = CardId::from("c2");
        let outcome = apply_layout(LayoutMode::Focus, &mut list, &ctx(Some(&focused)));
        assert_eq!(outcome.maximized, Some(focused));
        assert_eq!(list.iter().filter(|c| c.minimized).count(), 2);
    }

    #[test]
    fn test_release_restores_everything() {
        let mut list = cards(3);
        let original: Vec<Rect> = list.iter().map(|c| c.rect()).collect();
        list[0].minimized = true;

        apply_layout(LayoutMode::Tile, &mut list, &ctx(None));
        let focused = CardId::from("c1");
        apply_layout(LayoutMode::Focus, &mut list, &ctx(Some(&focused)));
        release_layout(&mut list);

        for (card, rect) in list.iter().zip(&original) {
            assert_eq!(card.rect(), *rect);
            assert!(!card.has_saved_geometry());
            assert!(!card.maximized);
        }
        // User minimized stays minimized; forced one is back
        assert!(list[0].minimized);
        assert!(!list[2].minimized);
    }
}

use fusuma_schema::{CardId, Size};

use crate::CardGeometry;

pub const STACK_MAX_WIDTH: u32 = 600;
pub const STACK_MAX_HEIGHT: u32 = 500;
pub const STACK_OFFSET: u32 = 30;

/// Shared centred footprint, each card nudged down-right of the previous one.
/// Geometry order is the stacking order: later entries render above earlier ones.
pub fn generate_layout(bounds: Size, card_ids: &[CardId]) -> Vec<CardGeometry> {
    if card_ids.is_empty() {
        return vec![];
    }

    let width = STACK_MAX_WIDTH.min((bounds.width as f64 * 0.7) as u32);
    let height = STACK_MAX_HEIGHT.min((bounds.height as f64 * 0.8) as u32);

    // Centre the whole deck, not just the first card
    let spread = STACK_OFFSET * (card_ids.len() as u32 - 1);
    let base_x = (bounds.width as i32 - width as i32 - spread as i32) / 2;
    let base_y = (bounds.height as i32 - height as i32 - spread as i32) / 2;

    card_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let offset = (i as u32 * STACK_OFFSET) as i32;
            CardGeometry {
                id: id.clone(),
                x: base_x.max(0) + offset,
                y: base_y.max(0) + offset,
                width,
                height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<CardId> {
        (0..n).map(|i| CardId::from(format!("c{}", i))).collect()
    }

    #[test]
    fn test_footprint_caps() {
        let geoms = generate_layout(Size::new(1920, 1080), &ids(1));
        assert_eq!((geoms[0].width, geoms[0].height), (600, 500));
        // Centred
        assert_eq!((geoms[0].x, geoms[0].y), (660, 290));
    }

    #[test]
    fn test_footprint_shrinks_with_small_bounds() {
        let geoms = generate_layout(Size::new(800, 500), &ids(1));
        assert_eq!((geoms[0].width, geoms[0].height), (560, 400));
    }

    #[test]
    fn test_cascade_offsets() {
        let geoms = generate_layout(Size::new(1920, 1080), &ids(3));
        assert_eq!(geoms[1].x - geoms[0].x, 30);
        assert_eq!(geoms[2].y - geoms[1].y, 30);
        assert!(geoms.iter().all(|g| g.width == 600 && g.height == 500));
        // Deck centred: first and last card equidistant from the centre
        let centre_x = 960;
        let first_mid = geoms[0].x + 300;
        let last_mid = geoms[2].x + 300;
        assert_eq!(centre_x - first_mid, last_mid - centre_x);
    }
}

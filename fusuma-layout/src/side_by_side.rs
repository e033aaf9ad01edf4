use fusuma_schema::{CardId, Size, MIN_CARD_WIDTH};

use crate::CardGeometry;

pub const MAX_COLUMNS: u32 = 4;

/// Equal-width full-height columns, at most `MAX_COLUMNS` of them.
///
/// Columns never shrink below `MIN_CARD_WIDTH`: when more cards are present
/// than columns fit, the surplus wraps into further equal-height rows.
pub fn generate_layout(bounds: Size, padding: u32, card_ids: &[CardId]) -> Vec<CardGeometry> {
    if card_ids.is_empty() {
        return vec![];
    }

    let count = card_ids.len() as u32;

    // Total: cols * w + (cols + 1) * padding = width
    let fitting = bounds.width.saturating_sub(padding) / (MIN_CARD_WIDTH + padding);
    let cols = count.min(MAX_COLUMNS).min(fitting.max(1));
    let rows = count.div_ceil(cols);

    let width = bounds.width.saturating_sub((cols + 1) * padding) / cols;
    let height = bounds.height.saturating_sub((rows + 1) * padding) / rows;

    card_ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let col = i as u32 % cols;
            let row = i as u32 / cols;
            CardGeometry {
                id: id.clone(),
                x: (padding + col * (width + padding)) as i32,
                y: (padding + row * (height + padding)) as i32,
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
    fn test_empty() {
        assert!(generate_layout(Size::new(1920, 1080), 16, &[]).is_empty());
    }

    #[test]
    fn test_two_columns_span_full_height() {
        let geoms = generate_layout(Size::new(1920, 1080), 16, &ids(2));
        assert_eq!(geoms.len(), 2);
        // (1920 - 3 * 16) / 2
        assert_eq!(geoms[0].width, 936);
        assert_eq!(geoms[0].height, 1080 - 32);
        assert_eq!(geoms[0].x, 16);
        assert_eq!(geoms[1].x, 16 + 936 + 16);
        assert_eq!(geoms[0].y, geoms[1].y);
    }

    #[test]
    fn test_four_columns() {
        let geoms = generate_layout(Size::new(1920, 1080), 16, &ids(4));
        let xs: Vec<i32> = geoms.iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![16, 492, 968, 1444]);
        assert!(geoms.iter().all(|g| g.width == 460 && g.y == 16));
    }

    #[test]
    fn test_more_than_four_wraps_into_rows() {
        let geoms = generate_layout(Size::new(1920, 1080), 16, &ids(6));
        assert_eq!(geoms[4].y, geoms[5].y);
        assert!(geoms[4].y > geoms[0].y);
        assert_eq!(geoms[4].x, geoms[0].x);
        assert!(geoms.iter().all(|g| g.width >= MIN_CARD_WIDTH));
    }

    #[test]
    fn test_narrow_bounds_cap_columns() {
        // Only two floor-width columns fit into 700px
        let geoms = generate_layout(Size::new(700, 900), 16, &ids(3));
        assert!(geoms.iter().all(|g| g.width >= MIN_CARD_WIDTH));
        assert_eq!(geoms[2].x, geoms[0].x);
        assert!(geoms[2].y > geoms[0].y);
    }
}

use fusuma_schema::{CardId, Size};

use crate::CardGeometry;

/// Near-square grid: `ceil(sqrt(n))` columns, filled row-major.
pub fn generate_layout(bounds: Size, padding: u32, card_ids: &[CardId]) -> Vec<CardGeometry> {
    if card_ids.is_empty() {
        return vec![];
    }

    let (cols, rows) = grid_dimensions(card_ids.len() as u32);

    // Total: n * w + (n + 1) * padding = extent
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

/// (columns, rows) for `count` cells.
pub fn grid_dimensions(count: u32) -> (u32, u32) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as u32;
    (cols, count.div_ceil(cols))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusuma_schema::Rect;

    fn ids(n: usize) -> Vec<CardId> {
        (0..n).map(|i| CardId::from(format!("c{}", i))).collect()
    }

    #[test]
    fn test_grid_dimensions() {
        assert_eq!(grid_dimensions(0), (0, 0));
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(2), (2, 1));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (3, 2));
        assert_eq!(grid_dimensions(9), (3, 3));
        assert_eq!(grid_dimensions(10), (4, 3));
    }

    #[test]
    fn test_single_card_fills_padded_bounds() {
        let geoms = generate_layout(Size::new(1920, 1080), 16, &ids(1));
        assert_eq!(geoms.len(), 1);
        assert_eq!(
            (geoms[0].x, geoms[0].y, geoms[0].width, geoms[0].height),
            (16, 16, 1888, 1048)
        );
    }

    #[test]
    fn test_row_major_order() {
        let geoms = generate_layout(Size::new(1920, 1080), 16, &ids(5));
        assert_eq!(geoms[0].y, geoms[1].y);
        assert_eq!(geoms[1].y, geoms[2].y);
        assert!(geoms[3].y > geoms[0].y);
        assert_eq!(geoms[3].x, geoms[0].x);
        assert!(geoms[1].x > geoms[0].x);
    }

    #[test]
    fn test_cells_cover_bounds_without_overlap() {
        let bounds = Size::new(1920, 1080);
        let padding = 16;
        for n in 1..=12 {
            let geoms = generate_layout(bounds, padding, &ids(n));
            let rects: Vec<Rect> = geoms
                .iter()
                .map(|g| Rect::new(g.x, g.y, g.width, g.height))
                .collect();
            let outer = Rect::new(0, 0, bounds.width, bounds.height);

            for (i, a) in rects.iter().enumerate() {
                assert!(outer.contains(a), "n={} cell {} outside bounds", n, i);
                for b in rects.iter().skip(i + 1) {
                    assert!(!a.intersects(b), "n={} cells overlap", n);
                }
            }

            // Each filled row spans the width up to rounding slack
            let (cols, _) = grid_dimensions(n as u32);
            let row_width = cols * geoms[0].width + (cols + 1) * padding;
            assert!(bounds.width - row_width < cols);
        }
    }
}

use fusuma_schema::{CardId, Point, Size, MIN_CARD_SIZE};

use crate::CardGeometry;

pub const CASCADE_OFFSET: i32 = 30;

/// Where a new card of `size` goes: one step down-right of `anchor`,
/// or back to the padded corner when that would overflow the bounds.
pub fn next_position(anchor: Option<Point>, size: Size, bounds: Size, padding: u32) -> Point {
    let corner = Point::new(padding as i32, padding as i32);
    let Some(anchor) = anchor else {
        return corner;
    };

    let candidate = anchor.offset(CASCADE_OFFSET, CASCADE_OFFSET);
    let overflows_x = candidate.x.saturating_add(size.width as i32) > bounds.width as i32;
    let overflows_y = candidate.y.saturating_add(size.height as i32) > bounds.height as i32;
    if overflows_x || overflows_y || candidate.x < 0 || candidate.y < 0 {
        corner
    } else {
        candidate
    }
}

/// Fit a size into the padded bounds without going below the card floor.
pub fn fit_size(size: Size, bounds: Size, padding: u32) -> Size {
    let ceiling = Size::new(
        bounds.width.saturating_sub(padding * 2),
        bounds.height.saturating_sub(padding * 2),
    );
    size.at_most(ceiling).at_least(MIN_CARD_SIZE)
}

/// Classic overlapping cascade, keeping each card's own size.
/// `cards` should already be in the desired order (oldest first).
pub fn generate_layout(bounds: Size, padding: u32, cards: &[(CardId, Size)]) -> Vec<CardGeometry> {
    let mut anchor: Option<Point> = None;
    cards
        .iter()
        .map(|(id, size)| {
            let size = fit_size(*size, bounds, padding);
            let position = next_position(anchor, size, bounds, padding);
            anchor = Some(position);
            CardGeometry {
                id: id.clone(),
                x: position.x,
                y: position.y,
                width: size.width,
                height: size.height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Size = Size {
        width: 1280,
        height: 800,
    };

    #[test]
    fn test_first_card_goes_to_corner() {
        let p = next_position(None, Size::new(600, 400), BOUNDS, 16);
        assert_eq!(p, Point::new(16, 16));
    }

    #[test]
    fn test_steps_from_anchor() {
        let p = next_position(Some(Point::new(100, 100)), Size::new(600, 400), BOUNDS, 16);
        assert_eq!(p, Point::new(130, 130));
    }

    #[test]
    fn test_wraps_on_overflow() {
        let p = next_position(Some(Point::new(700, 100)), Size::new(600, 400), BOUNDS, 16);
        assert_eq!(p, Point::new(16, 16));
        let p = next_position(Some(Point::new(100, 390)), Size::new(600, 400), BOUNDS, 16);
        assert_eq!(p, Point::new(16, 16));
    }

    #[test]
    fn test_fit_size() {
        assert_eq!(fit_size(Size::new(2000, 300), BOUNDS, 16), Size::new(1248, 300));
        assert_eq!(fit_size(Size::new(10, 10), BOUNDS, 16), MIN_CARD_SIZE);
    }

    #[test]
    fn test_generate_layout_cascades_and_wraps() {
        let cards: Vec<(CardId, Size)> = (0..14)
            .map(|i| (CardId::from(format!("c{}", i)), Size::new(600, 400)))
            .collect();
        let geoms = generate_layout(BOUNDS, 16, &cards);

        assert_eq!((geoms[0].x, geoms[0].y), (16, 16));
        assert_eq!((geoms[1].x, geoms[1].y), (46, 46));
        // 16 + 13 * 30 + 400 > 800, so the deck restarts at the corner
        let wrapped = geoms.iter().skip(1).position(|g| g.x == 16).unwrap() + 1;
        assert!(wrapped < 14);
        for g in &geoms {
            assert!(g.y + g.height as i32 <= BOUNDS.height as i32);
        }
    }
}

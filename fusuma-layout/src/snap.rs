use fusuma_schema::{Point, Rect, Size, SnapZone};

/// Distance from a workspace edge within which a drag release docks the card.
pub const SNAP_EDGE_THRESHOLD: u32 = 24;

/// Rectangle a card occupies when docked to `zone`.
/// Edges halve one axis, corners quarter both; odd remainders go to the right/bottom half.
pub fn snap_rect(zone: SnapZone, bounds: Size) -> Rect {
    let left_w = bounds.width / 2;
    let right_w = bounds.width - left_w;
    let top_h = bounds.height / 2;
    let bottom_h = bounds.height - top_h;
    let mid_x = left_w as i32;
    let mid_y = top_h as i32;

    match zone {
        SnapZone::Left => Rect::new(0, 0, left_w, bounds.height),
        SnapZone::Right => Rect::new(mid_x, 0, right_w, bounds.height),
        SnapZone::Top => Rect::new(0, 0, bounds.width, top_h),
        SnapZone::Bottom => Rect::new(0, mid_y, bounds.width, bottom_h),
        SnapZone::TopLeft => Rect::new(0, 0, left_w, top_h),
        SnapZone::TopRight => Rect::new(mid_x, 0, right_w, top_h),
        SnapZone::BottomLeft => Rect::new(0, mid_y, left_w, bottom_h),
        SnapZone::BottomRight => Rect::new(mid_x, mid_y, right_w, bottom_h),
    }
}

/// Classify a drag release point. Corners win over edges.
pub fn zone_at(point: Point, bounds: Size, threshold: u32) -> Option<SnapZone> {
    let t = threshold as i32;
    let near_left = point.x <= t;
    let near_right = point.x >= bounds.width as i32 - t;
    let near_top = point.y <= t;
    let near_bottom = point.y >= bounds.height as i32 - t;

    match (near_left, near_right, near_top, near_bottom) {
        (true, _, true, _) => Some(SnapZone::TopLeft),
        (_, true, true, _) => Some(SnapZone::TopRight),
        (true, _, _, true) => Some(SnapZone::BottomLeft),
        (_, true, _, true) => Some(SnapZone::BottomRight),
        (true, _, _, _) => Some(SnapZone::Left),
        (_, true, _, _) => Some(SnapZone::Right),
        (_, _, true, _) => Some(SnapZone::Top),
        (_, _, _, true) => Some(SnapZone::Bottom),
        _ => None,
    }
}

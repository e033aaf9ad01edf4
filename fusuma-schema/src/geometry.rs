use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Clamp both axes up to the given floor.
    pub fn at_least(self, floor: Size) -> Self {
        Self {
            width: self.width.max(floor.width),
            height: self.height.max(floor.height),
        }
    }

    /// Clamp both axes down to the given ceiling.
    pub fn at_most(self, ceiling: Size) -> Self {
        Self {
            width: self.width.min(ceiling.width),
            height: self.height.min(ceiling.height),
        }
    }
}

/// Position plus size in workspace coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width as i32)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height as i32)
    }

    /// True when the interiors overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_at_least() {
        let size = Size::new(100, 500).at_least(Size::new(280, 200));
        assert_eq!(size, Size::new(280, 500));
    }

    #[test]
    fn test_size_at_most() {
        let size = Size::new(900, 100).at_most(Size::new(800, 600));
        assert_eq!(size, Size::new(800, 100));
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10, 20, 100, 50);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 70);
        assert_eq!(rect.position(), Point::new(10, 20));
        assert_eq!(rect.size(), Size::new(100, 50));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 50, 100, 100);
        let c = Rect::new(100, 0, 100, 100);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Shared edge only
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_contains() {
        let outer = Rect::new(0, 0, 1920, 1080);
        assert!(outer.contains(&Rect::new(16, 16, 600, 500)));
        assert!(!outer.contains(&Rect::new(1800, 0, 200, 100)));
    }

    #[test]
    fn test_rect_display() {
        assert_eq!(format!("{}", Rect::new(10, 20, 300, 200)), "300x200+10+20");
    }
}

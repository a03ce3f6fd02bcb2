//! Integer screen-space geometry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn max_x(&self) -> i32 { self.x + self.width }

    pub fn max_y(&self) -> i32 { self.y + self.height }

    pub fn mid(&self) -> Point { Point::new(self.x + self.width / 2, self.y + self.height / 2) }

    /// Half-open containment: the right and bottom edges belong to the
    /// neighbouring rect.
    pub fn contains(&self, point: Point) -> bool {
        (self.x..self.max_x()).contains(&point.x) && (self.y..self.max_y()).contains(&point.y)
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        let min_x = self.x.max(other.x);
        let max_x = self.max_x().min(other.max_x());
        let min_y = self.y.max(other.y);
        let max_y = self.max_y().min(other.max_y());
        Rect::new(min_x, min_y, (max_x - min_x).max(0), (max_y - min_y).max(0))
    }

    pub fn area(&self) -> i64 { i64::from(self.width) * i64::from(self.height) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0, 0, 100, 50);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(99, 49)));
        assert!(!r.contains(Point::new(100, 10)));
        assert!(!r.contains(Point::new(10, 50)));
    }

    #[test]
    fn intersection_of_disjoint_rects_is_empty() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(200, 0, 100, 100);
        assert_eq!(0, a.intersection(&b).area());
    }

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 25, 100, 100);
        assert_eq!(Rect::new(50, 25, 50, 75), a.intersection(&b));
    }

    #[test]
    fn mid_point() {
        assert_eq!(Point::new(1960, 540), Rect::new(1000, 0, 1920, 1080).mid());
    }
}

//! Axis-aligned bounds in world units.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in world units (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized bounds spanning two arbitrary corner points.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    /// Tight bounds around a set of points. `None` when empty.
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(fx, fy), rest) = points.split_first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (fx, fy, fx, fy);
        for &(x, y) in rest {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        Some(Self::from_corners(x0, y0, x1, y1))
    }

    /// Union of every bounds in the iterator. `None` when empty.
    pub fn union_all(iter: impl IntoIterator<Item = Bounds>) -> Option<Self> {
        iter.into_iter().reduce(|a, b| a.union(&b))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// True when the two rectangles overlap or touch.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.right().max(other.right());
        let y1 = self.bottom().max(other.bottom());
        Bounds::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Bounds {
        Bounds::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_spans_both() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(20.0, -5.0, 5.0, 5.0);
        assert_eq!(a.union(&b), Bounds::new(0.0, -5.0, 25.0, 15.0));
    }

    #[test]
    fn from_points_normalizes() {
        let b = Bounds::from_points(&[(5.0, 9.0), (-1.0, 2.0), (3.0, 4.0)]).unwrap();
        assert_eq!(b, Bounds::new(-1.0, 2.0, 6.0, 7.0));
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn touching_rects_intersect() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Bounds::new(10.0, 10.0, 1.0, 1.0)));
        assert!(!a.intersects(&Bounds::new(10.5, 0.0, 1.0, 1.0)));
    }
}

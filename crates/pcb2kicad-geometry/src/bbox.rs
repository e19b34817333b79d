use pcb2kicad_core::Coord;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in board units. `x1/y1` is the minimum corner.
///
/// The empty box has inverted bounds so that it is the identity of
/// [`BoundingBox::union`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: Coord,
    pub y1: Coord,
    pub x2: Coord,
    pub y2: Coord,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    #[must_use]
    pub const fn new(x1: Coord, y1: Coord, x2: Coord, y2: Coord) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            x1: Coord::MAX,
            y1: Coord::MAX,
            x2: Coord::MIN,
            y2: Coord::MIN,
        }
    }

    /// Box spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(ax: Coord, ay: Coord, bx: Coord, by: Coord) -> Self {
        Self {
            x1: ax.min(bx),
            y1: ay.min(by),
            x2: ax.max(bx),
            y2: ay.max(by),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x1 > self.x2 || self.y1 > self.y2
    }

    pub fn include_point(&mut self, x: Coord, y: Coord) {
        self.x1 = self.x1.min(x);
        self.y1 = self.y1.min(y);
        self.x2 = self.x2.max(x);
        self.y2 = self.y2.max(y);
    }

    #[must_use]
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        if other.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return *other;
        }
        BoundingBox {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Grow by `d` on every side. The empty box stays empty.
    #[must_use]
    pub fn expand(&self, d: Coord) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        BoundingBox {
            x1: self.x1 - d,
            y1: self.y1 - d,
            x2: self.x2 + d,
            y2: self.y2 + d,
        }
    }

    #[must_use]
    pub fn width(&self) -> Coord {
        if self.is_empty() {
            0
        } else {
            self.x2 - self.x1
        }
    }

    #[must_use]
    pub fn height(&self) -> Coord {
        if self.is_empty() {
            0
        } else {
            self.y2 - self.y1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_union_identity() {
        let b = BoundingBox::new(1, 2, 3, 4);
        assert_eq!(BoundingBox::empty().union(&b), b);
        assert_eq!(b.union(&BoundingBox::empty()), b);
        assert!(BoundingBox::empty().is_empty());
        assert_eq!(BoundingBox::empty().expand(10), BoundingBox::empty());
        assert_eq!(BoundingBox::empty().width(), 0);
    }

    #[test]
    fn corners_are_normalized() {
        let b = BoundingBox::from_corners(5, -1, -3, 7);
        assert_eq!(b, BoundingBox::new(-3, -1, 5, 7));
        assert_eq!(b.width(), 8);
        assert_eq!(b.height(), 8);
        assert_eq!(b.expand(1).union(&b), b.expand(1));
    }
}

//! Integer geometry in device coordinates.
//!
//! Rectangles use the edge representation the native windowing APIs use
//! (`left`, `top`, `right`, `bottom`, with `right`/`bottom` exclusive), which
//! keeps frame-delta arithmetic in the backends free of conversions.

/// A point in device coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A rectangle given by its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub left: i32,
    /// Top edge (inclusive).
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Width of the rectangle.
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height of the rectangle.
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Top-left corner.
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Move the rectangle by the given amounts.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.left + dx, self.top + dy, self.right + dx, self.bottom + dy)
    }

    /// Move the rectangle so its top-left corner lands at `(x, y)`.
    pub fn moved_to(&self, x: i32, y: i32) -> Self {
        Self::from_origin_size(x, y, self.width(), self.height())
    }

    /// Check if a point is inside this rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Compute the origin that centers a `width`×`height` box inside this rectangle.
    pub fn centered_origin(&self, width: i32, height: i32) -> Point {
        Point::new(
            self.left + (self.width() - width) / 2,
            self.top + (self.height() - height) / 2,
        )
    }

    /// Shift (never shrink) this rectangle so it lies inside `bounds`.
    ///
    /// Right and bottom overflows are corrected first, then left and top, so a
    /// rectangle larger than `bounds` ends up aligned to the top-left edge.
    pub fn shifted_inside(&self, bounds: &Rect) -> Self {
        let mut rect = *self;
        if rect.right > bounds.right {
            let dx = rect.right - bounds.right;
            rect = rect.offset(-dx, 0);
        }
        if rect.bottom > bounds.bottom {
            let dy = rect.bottom - bounds.bottom;
            rect = rect.offset(0, -dy);
        }
        if rect.left < bounds.left {
            let dx = bounds.left - rect.left;
            rect = rect.offset(dx, 0);
        }
        if rect.top < bounds.top {
            let dy = bounds.top - rect.top;
            rect = rect.offset(0, dy);
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_size() {
        let rect = Rect::from_origin_size(10, 20, 300, 200);
        assert_eq!(rect.width(), 300);
        assert_eq!(rect.height(), 200);
        assert_eq!(rect.origin(), Point::new(10, 20));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0, 0, 100, 100);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(99, 99));
        assert!(!rect.contains(100, 50));
        assert!(!rect.contains(-1, 50));
    }

    #[test]
    fn test_centered_origin() {
        let rect = Rect::new(100, 100, 500, 400);
        assert_eq!(rect.centered_origin(200, 100), Point::new(200, 200));
    }

    #[test]
    fn test_shifted_inside_moves_without_shrinking() {
        let work = Rect::new(0, 0, 1920, 1040);

        let overflow_right = Rect::from_origin_size(1800, 100, 400, 300);
        let shifted = overflow_right.shifted_inside(&work);
        assert_eq!(shifted, Rect::from_origin_size(1520, 100, 400, 300));

        let overflow_top_left = Rect::from_origin_size(-50, -20, 400, 300);
        let shifted = overflow_top_left.shifted_inside(&work);
        assert_eq!(shifted, Rect::from_origin_size(0, 0, 400, 300));

        let too_big = Rect::from_origin_size(100, 100, 2000, 1200);
        let shifted = too_big.shifted_inside(&work);
        assert_eq!(shifted.left, 0);
        assert_eq!(shifted.top, 0);
        assert_eq!(shifted.width(), 2000);
    }
}

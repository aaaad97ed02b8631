use serde::{Deserialize, Serialize};

/// Smallest denominator used by distance and normalization math.
pub const EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x * (1.0 - t) + other.x * t,
            self.y * (1.0 - t) + other.y * t,
        )
    }

    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned rectangle in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Same rectangle with `left <= right` and `top <= bottom`.
    pub fn normalized(&self) -> Self {
        Self::new(self.left, self.top, self.right, self.bottom)
    }

    pub fn from_center(center: Point, width: f32, height: f32) -> Self {
        let half_w = width.max(0.0) / 2.0;
        let half_h = height.max(0.0) / 2.0;
        Self {
            left: center.x - half_w,
            top: center.y - half_h,
            right: center.x + half_w,
            bottom: center.y + half_h,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }

    /// Inclusive containment, grown by `buffer` on every side.
    pub fn contains(&self, point: Point, buffer: f32) -> bool {
        point.x >= self.left - buffer
            && point.x <= self.right + buffer
            && point.y >= self.top - buffer
            && point.y <= self.bottom + buffer
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Tight box around `rects`; all zeros when the iterator is empty.
    pub fn from_rects<I>(rects: I) -> Self
    where
        I: IntoIterator<Item = Rect>,
    {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        let mut any = false;
        for rect in rects {
            any = true;
            min_x = min_x.min(rect.left);
            min_y = min_y.min(rect.top);
            max_x = max_x.max(rect.right);
            max_y = max_y.max(rect.bottom);
        }
        if !any {
            return Self::default();
        }
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn inflate(&self, amount: f32) -> Self {
        let amount = amount.max(0.0);
        Self {
            min_x: self.min_x - amount,
            max_x: self.max_x + amount,
            min_y: self.min_y - amount,
            max_y: self.max_y + amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_from_center_round_trips_center() {
        let rect = Rect::from_center(Point::new(10.0, -4.0), 20.0, 8.0);
        assert_eq!(rect.left, 0.0);
        assert_eq!(rect.bottom, 0.0);
        assert_eq!(rect.center(), Point::new(10.0, -4.0));
    }

    #[test]
    fn contains_honors_buffer() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!rect.contains(Point::new(11.5, 5.0), 1.0));
        assert!(rect.contains(Point::new(11.5, 5.0), 2.0));
    }

    #[test]
    fn empty_bounding_box_is_zero() {
        let bounds = BoundingBox::from_rects(Vec::new());
        assert_eq!(bounds, BoundingBox::default());
        assert_eq!(bounds.center(), Point::new(0.0, 0.0));
    }
}

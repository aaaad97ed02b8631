use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicBezier {
    pub fn new(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        Self {
            start,
            control1,
            control2,
            end,
        }
    }

    pub fn point_at(&self, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }

    /// `count` points at evenly spaced parameters, endpoints included.
    pub fn sample(&self, count: usize) -> Vec<Point> {
        match count {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => (0..count)
                .map(|i| self.point_at(i as f32 / (count - 1) as f32))
                .collect(),
        }
    }

    pub fn to_svg_path(&self) -> String {
        format!(
            "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve() -> CubicBezier {
        CubicBezier::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 0.0),
        )
    }

    #[test]
    fn evaluates_endpoints_and_midpoint() {
        let c = curve();
        assert_eq!(c.point_at(0.0), c.start);
        assert_eq!(c.point_at(1.0), c.end);
        assert_eq!(c.point_at(0.5), Point::new(50.0, 75.0));
    }

    #[test]
    fn samples_include_endpoints() {
        let points = curve().sample(50);
        assert_eq!(points.len(), 50);
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(points[49], Point::new(100.0, 0.0));
        assert!(curve().sample(0).is_empty());
    }

    #[test]
    fn formats_svg_path() {
        assert_eq!(
            curve().to_svg_path(),
            "M 0.00 0.00 C 0.00 100.00, 100.00 100.00, 100.00 0.00"
        );
    }
}

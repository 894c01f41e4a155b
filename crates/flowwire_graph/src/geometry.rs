// SPDX-License-Identifier: MIT OR Apache-2.0
//! Geometry primitives used for layout and pointer hit-testing.
//!
//! Everything here is a pure function of its arguments. All coordinates are
//! in graph space; translating device coordinates is the caller's job.

use serde::{Deserialize, Serialize};

/// Number of line segments used when sampling a connection curve
const BEZIER_SAMPLES: usize = 24;

/// A point in graph space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// An axis-aligned rectangle, stored as min/max corners
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Point,
    /// Bottom-right corner
    pub max: Point,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub fn from_min_size(min: Point, width: f32, height: f32) -> Self {
        Self {
            min,
            max: Point::new(min.x + width, min.y + height),
        }
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(self, margin: f32) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Inclusive containment test
    pub fn contains(&self, p: Point) -> bool {
        point_in_rect(p, *self)
    }
}

/// Inclusive point-in-rectangle test.
pub fn point_in_rect(p: Point, r: Rect) -> bool {
    p.x >= r.min.x && p.x <= r.max.x && p.y >= r.min.y && p.y <= r.max.y
}

/// Euclidean point-in-circle test (boundary inclusive).
pub fn point_in_circle(p: Point, center: Point, radius: f32) -> bool {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// Axis-aligned approximation of [`point_in_circle`]: `|dx| <= r && |dy| <= r`.
///
/// Socket hit-testing uses this so sockets and nodes share the same
/// box-shaped tolerance.
pub fn point_in_box(p: Point, center: Point, radius: f32) -> bool {
    (p.x - center.x).abs() <= radius && (p.y - center.y).abs() <= radius
}

/// Control points for a horizontal-handle cubic Bézier between two points.
///
/// Both handles sit at the horizontal midpoint; the first keeps the source's
/// height and the second the target's.
pub fn bezier_control_points(
    source_x: f32,
    source_y: f32,
    target_x: f32,
    target_y: f32,
) -> (Point, Point) {
    let mid_x = source_x + (target_x - source_x) * 0.5;
    (Point::new(mid_x, source_y), Point::new(mid_x, target_y))
}

/// Evaluate a cubic Bézier at parameter `t` in `[0, 1]`.
pub fn cubic_bezier_point(a: Point, c1: Point, c2: Point, b: Point, t: f32) -> Point {
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    let uuu = uu * u;
    let ttt = tt * t;
    Point::new(
        uuu * a.x + 3.0 * uu * t * c1.x + 3.0 * u * tt * c2.x + ttt * b.x,
        uuu * a.y + 3.0 * uu * t * c1.y + 3.0 * u * tt * c2.y + ttt * b.y,
    )
}

/// Approximate distance from `p` to the connection curve between `source`
/// and `target`, sampled as a polyline.
pub fn distance_to_bezier(source: Point, target: Point, p: Point) -> f32 {
    let (c1, c2) = bezier_control_points(source.x, source.y, target.x, target.y);
    let mut prev = source;
    let mut best = f32::MAX;
    for i in 1..=BEZIER_SAMPLES {
        let t = i as f32 / BEZIER_SAMPLES as f32;
        let next = cubic_bezier_point(source, c1, c2, target, t);
        best = best.min(point_segment_distance(prev, next, p));
        prev = next;
    }
    best
}

fn point_segment_distance(a: Point, b: Point, p: Point) -> f32 {
    let ab = Point::new(b.x - a.x, b.y - a.y);
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len2).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * ab.x, a.y + t * ab.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds_inclusive() {
        let r = Rect::from_min_size(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!(r.contains(Point::new(10.0, 20.0)));
        assert!(r.contains(Point::new(110.0, 70.0)));
        assert!(!r.contains(Point::new(9.9, 20.0)));
        assert!(!r.contains(Point::new(50.0, 70.1)));
    }

    #[test]
    fn test_rect_expand() {
        let r = Rect::from_min_size(Point::new(0.0, 0.0), 10.0, 10.0).expand(2.0);
        assert_eq!(r.min, Point::new(-2.0, -2.0));
        assert_eq!(r.max, Point::new(12.0, 12.0));
    }

    #[test]
    fn test_circle_vs_box() {
        let center = Point::new(0.0, 0.0);
        let corner = Point::new(9.0, 9.0);
        // Inside the box approximation but outside the true circle
        assert!(point_in_box(corner, center, 10.0));
        assert!(!point_in_circle(corner, center, 10.0));
        assert!(point_in_circle(Point::new(10.0, 0.0), center, 10.0));
        assert!(!point_in_box(Point::new(10.5, 0.0), center, 10.0));
    }

    #[test]
    fn test_bezier_control_points() {
        let (cp1, cp2) = bezier_control_points(0.0, 10.0, 100.0, 50.0);
        assert_eq!(cp1, Point::new(50.0, 10.0));
        assert_eq!(cp2, Point::new(50.0, 50.0));

        // Backwards links still put the handles at the midpoint
        let (cp1, cp2) = bezier_control_points(100.0, 0.0, 0.0, 0.0);
        assert_eq!(cp1.x, 50.0);
        assert_eq!(cp2.x, 50.0);
    }

    #[test]
    fn test_bezier_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 40.0);
        let (c1, c2) = bezier_control_points(a.x, a.y, b.x, b.y);
        assert_eq!(cubic_bezier_point(a, c1, c2, b, 0.0), a);
        assert_eq!(cubic_bezier_point(a, c1, c2, b, 1.0), b);
        let mid = cubic_bezier_point(a, c1, c2, b, 0.5);
        assert!((mid.x - 50.0).abs() < 1e-4);
        assert!((mid.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_distance_to_bezier() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!(distance_to_bezier(a, b, Point::new(50.0, 0.0)) < 1e-3);
        let d = distance_to_bezier(a, b, Point::new(50.0, 8.0));
        assert!((d - 8.0).abs() < 1e-3);
    }
}

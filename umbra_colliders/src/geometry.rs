// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment helpers shared by the world and its callers.

use kurbo::{Point, Rect};
use umbra_index::Aabb2D;

/// Intersection point of segments `a0 -> a1` and `b0 -> b1`, endpoints included.
///
/// Parallel segments never intersect, even when they overlap.
pub fn segment_intersection(a0: Point, a1: Point, b0: Point, b1: Point) -> Option<Point> {
    let r = a1 - a0;
    let s = b1 - b0;
    let denom = r.cross(s);
    if denom == 0.0 {
        return None;
    }
    let qp = b0 - a0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then(|| a0 + r * t)
}

/// Point of segment `a -> b` nearest to `p`.
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b - a;
    let len2 = ab.hypot2();
    if len2 == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

pub(crate) fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_segments_meet() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(4.0, 0.0),
        );
        assert_eq!(hit, Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn touching_endpoints_count() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, -1.0),
            Point::new(2.0, 1.0),
        );
        assert_eq!(hit, Some(Point::new(2.0, 0.0)));
        assert!(
            segment_intersection(
                Point::new(0.0, 0.0),
                Point::new(1.9, 0.0),
                Point::new(2.0, -1.0),
                Point::new(2.0, 1.0),
            )
            .is_none()
        );
    }

    #[test]
    fn parallel_segments_do_not_meet() {
        assert!(
            segment_intersection(
                Point::new(0.0, 0.0),
                Point::new(2.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(3.0, 0.0),
            )
            .is_none()
        );
    }

    #[test]
    fn closest_point_clamps_to_ends() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Point::new(3.0, 5.0), a, b), Point::new(3.0, 0.0));
        assert_eq!(closest_point_on_segment(Point::new(-3.0, 5.0), a, b), a);
        assert_eq!(closest_point_on_segment(Point::new(12.0, -1.0), a, b), b);
        assert_eq!(closest_point_on_segment(Point::new(1.0, 1.0), a, a), a);
    }
}

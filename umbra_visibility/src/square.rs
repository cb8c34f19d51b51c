// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The axis-aligned query square around the eye.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point, Rect, Vec2};
use umbra_colliders::segment_intersection;

#[derive(Clone, Copy, Debug)]
pub(crate) struct QuerySquare {
    pub(crate) bounds: Rect,
    /// Counter-clockwise from the bottom-left corner.
    pub(crate) corners: [Point; 4],
    /// Edges between consecutive corners, each lengthened by the nudge at both ends.
    pub(crate) edges: [Line; 4],
    pub(crate) nudge: f64,
}

impl QuerySquare {
    pub(crate) fn new(eye: Point, side: f64, nudge: f64) -> Self {
        let h = side / 2.0;
        let bounds = Rect::new(eye.x - h, eye.y - h, eye.x + h, eye.y + h);
        let corners = [
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
            Point::new(bounds.x0, bounds.y1),
        ];
        let along = [
            Vec2::new(nudge, 0.0),
            Vec2::new(0.0, nudge),
            Vec2::new(-nudge, 0.0),
            Vec2::new(0.0, -nudge),
        ];
        let edges = core::array::from_fn(|i| {
            Line::new(corners[i] - along[i], corners[(i + 1) % 4] + along[i])
        });
        Self {
            bounds,
            corners,
            edges,
            nudge,
        }
    }

    /// Whether `p` is inside the square, edges included.
    pub(crate) fn contains(&self, p: Point) -> bool {
        let b = &self.bounds;
        b.x0 <= p.x && p.x <= b.x1 && b.y0 <= p.y && p.y <= b.y1
    }

    /// Distance from the center to a corner.
    pub(crate) fn half_diagonal(&self) -> f64 {
        self.bounds.width().hypot(self.bounds.height()) / 2.0
    }

    /// Crossing of `from -> to` with the square's edges closest to `from`.
    pub(crate) fn first_crossing(&self, from: Point, to: Point) -> Option<Point> {
        self.edges
            .iter()
            .filter_map(|e| segment_intersection(from, to, e.p0, e.p1))
            .min_by(|a, b| {
                from.distance_squared(*a)
                    .total_cmp(&from.distance_squared(*b))
            })
    }

    /// Shorten the ray `from -> to` (heading along `dir`) to just past the square.
    pub(crate) fn clamp(&self, from: Point, to: Point, dir: Vec2) -> Point {
        match self.first_crossing(from, to) {
            Some(crossing) => crossing + dir * self.nudge,
            None => to,
        }
    }
}

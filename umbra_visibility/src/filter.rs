// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Removal of discontinuities whose opening is too narrow to pass through.
//!
//! A discontinuity marks where vision slips past an obstacle vertex into
//! the space behind it. If other geometry on the open side of that vertex
//! comes within the threshold distance, the gap is treated as closed: the
//! discontinuity is dropped and the gap is reported as a marked hole from
//! the nearby point to the vertex. Discontinuities seen through a marked
//! hole are dropped as well.

use alloc::vec::Vec;
use kurbo::{Line, Point};
use umbra_colliders::{closest_point_on_segment, segment_intersection};

use crate::context::PendingDiscontinuity;
use crate::response::Winding;

/// Filter `discontinuities` in place and append a hole for each removal.
///
/// `spans` are the visible boundary spans indexed like the double rays the
/// discontinuities refer to. All distances are in internal units.
pub(crate) fn filter_discontinuities(
    eye: Point,
    threshold: f64,
    spans: &[Line],
    discontinuities: &mut Vec<PendingDiscontinuity>,
    holes: &mut Vec<Line>,
) {
    if spans.is_empty() || discontinuities.is_empty() {
        return;
    }
    let all = discontinuities.clone();
    discontinuities.retain(|d| match nearest_blocker(eye, threshold, spans, &all, d) {
        Some(p) => {
            holes.push(Line::new(p, d.vertex));
            false
        }
        None => true,
    });
    discontinuities.retain(|d| {
        holes
            .iter()
            .all(|h| segment_intersection(eye, d.vertex, h.p0, h.p1).is_none())
    });
}

/// Point within `threshold` of the vertex on the open side of `d`, closest to the eye.
fn nearest_blocker(
    eye: Point,
    threshold: f64,
    spans: &[Line],
    all: &[PendingDiscontinuity],
    d: &PendingDiscontinuity,
) -> Option<Point> {
    let n = spans.len();
    let (cw, step) = match d.winding {
        Winding::Right => (1.0, 1),
        Winding::Left => (-1.0, -1),
    };
    let dv = d.vertex - eye;
    let open_side = |p: Point| cw * dv.cross(p - eye);

    let mut best: Option<Point> = None;
    let mut consider = |p: Point| {
        if p.distance(d.vertex) <= threshold
            && best.is_none_or(|b| eye.distance_squared(p) < eye.distance_squared(b))
        {
            best = Some(p);
        }
    };

    let mut j = d.ray.offset(step);
    for _ in 1..n {
        let span = spans[j.wrap(n)];
        if open_side(span.p0) >= 0.0 || open_side(span.p1) >= 0.0 {
            consider(closest_point_on_segment(d.vertex, span.p0, span.p1));
        }
        j = j.offset(step);
    }

    let own = d.ray.wrap(n);
    for o in all {
        if o.ray.wrap(n) != own && open_side(o.vertex) > 0.0 {
            consider(closest_point_on_segment(d.vertex, o.vertex, o.far));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::WrappingIndex;
    use alloc::vec;

    fn disc(vertex: (f64, f64), far: (f64, f64), winding: Winding, ray: isize) -> PendingDiscontinuity {
        PendingDiscontinuity {
            vertex: vertex.into(),
            far: far.into(),
            winding,
            ray: WrappingIndex(ray),
            is_boundary: false,
        }
    }

    /// Eye at the origin looking along +x past the corner (4, 1) of an
    /// obstacle below it, at a wall at x = 5.5.
    fn corner_and_wall() -> Vec<Line> {
        vec![
            // 0: obstacle face ending at the corner.
            Line::new((4.0, -5.0), (4.0, 1.0)),
            // 1: wall above the grazing ray.
            Line::new((5.5, 1.375), (5.5, 10.0)),
            // 2: far side, behind the eye.
            Line::new((5.5, 10.0), (-20.0, 20.0)),
            // 3: closes the loop.
            Line::new((-20.0, 20.0), (4.0, -5.0)),
        ]
    }

    #[test]
    fn narrow_gap_becomes_a_hole() {
        let spans = corner_and_wall();
        let mut discs = vec![disc((4.0, 1.0), (5.5, 1.375), Winding::Right, 0)];
        let mut holes = Vec::new();
        filter_discontinuities(Point::ORIGIN, 2.0, &spans, &mut discs, &mut holes);
        assert!(discs.is_empty());
        assert_eq!(holes, vec![Line::new((5.5, 1.375), (4.0, 1.0))]);
    }

    #[test]
    fn wide_gap_survives() {
        let spans = corner_and_wall();
        let mut discs = vec![disc((4.0, 1.0), (5.5, 1.375), Winding::Right, 0)];
        let mut holes = Vec::new();
        filter_discontinuities(Point::ORIGIN, 1.0, &spans, &mut discs, &mut holes);
        assert_eq!(discs.len(), 1);
        assert!(holes.is_empty());
    }

    #[test]
    fn geometry_on_the_occluded_side_is_ignored() {
        let mut spans = corner_and_wall();
        // Close to the corner, but below the grazing ray.
        spans[1] = Line::new((5.0, 0.5), (5.5, 0.5));
        let mut discs = vec![disc((4.0, 1.0), (5.5, 1.375), Winding::Right, 0)];
        let mut holes = Vec::new();
        filter_discontinuities(Point::ORIGIN, 2.0, &spans, &mut discs, &mut holes);
        assert_eq!(discs.len(), 1);
        assert!(holes.is_empty());
    }

    #[test]
    fn discontinuities_seen_through_a_hole_are_dropped() {
        let spans = vec![
            Line::new((4.0, -5.0), (4.0, 1.0)),
            Line::new((5.0, 1.5), (5.0, 3.0)),
            Line::new((5.0, 3.0), (-20.0, 20.0)),
            Line::new((-20.0, 20.0), (4.0, -5.0)),
        ];
        let mut discs = vec![
            disc((4.0, 1.0), (5.0, 1.25), Winding::Right, 0),
            // Far away, but the line of sight to it crosses the closed gap.
            disc((9.0, 2.5), (12.0, 2.5), Winding::Left, 2),
        ];
        let mut holes = Vec::new();
        filter_discontinuities(Point::ORIGIN, 2.0, &spans, &mut discs, &mut holes);
        assert_eq!(holes, vec![Line::new((5.0, 1.5), (4.0, 1.0))]);
        assert!(discs.is_empty());
    }
}

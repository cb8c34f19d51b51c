// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convex polygon shape with narrow-phase ray casting.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Line, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::error::ShapeError;

/// Maximum number of vertices of a [`ConvexPolygon`].
pub const MAX_POLYGON_VERTICES: usize = 8;

type VertexBuf<T> = SmallVec<[T; MAX_POLYGON_VERTICES]>;

/// A convex polygon with 3 to [`MAX_POLYGON_VERTICES`] vertices.
///
/// Vertices are stored counter-clockwise (positive signed area, y up), and
/// every edge `i` (from vertex `i` to vertex `i + 1`) carries its outward unit
/// normal. Collinear vertices are kept.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvexPolygon {
    vertices: VertexBuf<Point>,
    normals: VertexBuf<Vec2>,
}

impl ConvexPolygon {
    /// Build a polygon from its outline, in either winding order.
    pub fn new(points: &[Point]) -> Result<Self, ShapeError> {
        let count = points.len();
        if count < 3 {
            return Err(ShapeError::TooFewVertices { count });
        }
        if count > MAX_POLYGON_VERTICES {
            return Err(ShapeError::TooManyVertices { count });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(ShapeError::NonFinite);
        }

        let mut vertices: VertexBuf<Point> = points.iter().copied().collect();
        let area = signed_area(&vertices);
        if area.abs() <= f64::EPSILON {
            return Err(ShapeError::Degenerate);
        }
        if area < 0.0 {
            vertices.reverse();
        }

        let n = vertices.len();
        let mut normals = VertexBuf::new();
        for i in 0..n {
            let edge = vertices[(i + 1) % n] - vertices[i];
            let len = edge.hypot();
            if len <= f64::EPSILON {
                return Err(ShapeError::Degenerate);
            }
            let turn = edge.cross(vertices[(i + 2) % n] - vertices[(i + 1) % n]);
            if turn < -f64::EPSILON * len {
                return Err(ShapeError::NotConvex);
            }
            normals.push(Vec2::new(edge.y, -edge.x) / len);
        }
        Ok(Self { vertices, normals })
    }

    /// Axis-aligned box as a polygon.
    pub fn from_rect(rect: Rect) -> Result<Self, ShapeError> {
        let r = rect.abs();
        Self::new(&[
            Point::new(r.x0, r.y0),
            Point::new(r.x1, r.y0),
            Point::new(r.x1, r.y1),
            Point::new(r.x0, r.y1),
        ])
    }

    /// The polygon mapped through `affine`.
    ///
    /// A mirroring transform flips the outline back to counter-clockwise.
    /// Transforms that collapse the polygon are rejected.
    pub fn transformed(&self, affine: Affine) -> Result<Self, ShapeError> {
        let points: VertexBuf<Point> = self.vertices.iter().map(|&p| affine * p).collect();
        Self::new(&points)
    }

    /// Vertices, counter-clockwise.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Outward unit normal of each edge.
    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edge `i`, from vertex `i` to vertex `i + 1` (wrapping).
    pub fn edge(&self, i: usize) -> Line {
        let n = self.vertices.len();
        Line::new(self.vertices[i % n], self.vertices[(i + 1) % n])
    }

    /// Tight axis-aligned bounds.
    pub fn bounding_box(&self) -> Rect {
        let first = Rect::from_points(self.vertices[0], self.vertices[0]);
        self.vertices[1..]
            .iter()
            .fold(first, |r, &p| r.union_pt(p))
    }

    /// Whether `pt` lies inside or on the outline.
    pub fn contains(&self, pt: Point) -> bool {
        self.vertices
            .iter()
            .zip(&self.normals)
            .all(|(&v, n)| n.dot(pt - v) <= 0.0)
    }

    /// Cast the segment `p1 -> p2` against the polygon.
    ///
    /// Returns the fraction along the segment where it enters the polygon and
    /// the outward normal of the entered edge. Segments that start inside the
    /// polygon do not hit it.
    pub fn ray_cast(&self, p1: Point, p2: Point) -> Option<(f64, Vec2)> {
        let d = p2 - p1;
        let mut lower = 0.0;
        let mut upper = 1.0;
        let mut entered = None;

        for (i, (&v, &n)) in self.vertices.iter().zip(&self.normals).enumerate() {
            // p = p1 + t * d lies behind edge i when dot(n, p - v) <= 0.
            let numerator = n.dot(v - p1);
            let denominator = n.dot(d);
            if denominator == 0.0 {
                if numerator < 0.0 {
                    return None;
                }
            } else if denominator < 0.0 && numerator < lower * denominator {
                lower = numerator / denominator;
                entered = Some(i);
            } else if denominator > 0.0 && numerator < upper * denominator {
                upper = numerator / denominator;
            }
            if upper < lower {
                return None;
            }
        }
        entered.map(|i| (lower, self.normals[i]))
    }
}

fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    let twice: f64 = (0..n)
        .map(|i| vertices[i].to_vec2().cross(vertices[(i + 1) % n].to_vec2()))
        .sum();
    0.5 * twice
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> ConvexPolygon {
        ConvexPolygon::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0)).unwrap()
    }

    #[test]
    fn clockwise_input_is_normalized() {
        let cw = ConvexPolygon::new(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap();
        assert!(signed_area(cw.vertices()) > 0.0);
        // Bottom edge of a CCW box points down.
        let sq = unit_square();
        assert_eq!(sq.normals()[0], Vec2::new(0.0, -1.0));
        assert_eq!(sq.normals()[1], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn edges_wrap_around() {
        let sq = unit_square();
        assert_eq!(sq.edge(0), Line::new((0.0, 0.0), (1.0, 0.0)));
        assert_eq!(sq.edge(3), Line::new((0.0, 1.0), (0.0, 0.0)));
        assert_eq!(sq.edge(5), sq.edge(1));
    }

    #[test]
    fn construction_errors() {
        let p = Point::ORIGIN;
        assert_eq!(
            ConvexPolygon::new(&[p, p]),
            Err(ShapeError::TooFewVertices { count: 2 })
        );
        assert_eq!(
            ConvexPolygon::new(&[p; 9]),
            Err(ShapeError::TooManyVertices { count: 9 })
        );
        assert_eq!(
            ConvexPolygon::new(&[p, Point::new(f64::NAN, 0.0), Point::new(0.0, 1.0)]),
            Err(ShapeError::NonFinite)
        );
        assert_eq!(
            ConvexPolygon::new(&[p, Point::new(1.0, 1.0), Point::new(2.0, 2.0)]),
            Err(ShapeError::Degenerate)
        );
        // An arrowhead has a reflex vertex.
        assert_eq!(
            ConvexPolygon::new(&[
                Point::new(0.0, 0.0),
                Point::new(2.0, 1.0),
                Point::new(0.0, 2.0),
                Point::new(1.0, 1.0),
            ]),
            Err(ShapeError::NotConvex)
        );
    }

    #[test]
    fn ray_cast_reports_entry_fraction_and_normal() {
        let sq = unit_square();
        let (t, n) = sq
            .ray_cast(Point::new(-1.0, 0.5), Point::new(3.0, 0.5))
            .unwrap();
        assert!((t - 0.25).abs() < 1e-12, "entry at x = 0, got {t}");
        assert_eq!(n, Vec2::new(-1.0, 0.0));

        // Too short to reach the box.
        assert!(
            sq.ray_cast(Point::new(-1.0, 0.5), Point::new(-0.5, 0.5))
                .is_none()
        );
        // Passing beside it.
        assert!(sq.ray_cast(Point::new(-1.0, 2.0), Point::new(3.0, 2.0)).is_none());
    }

    #[test]
    fn ray_cast_is_one_sided_and_ignores_zero_length() {
        let sq = unit_square();
        assert!(sq.ray_cast(Point::new(0.5, 0.5), Point::new(3.0, 0.5)).is_none());
        assert!(sq.ray_cast(Point::new(-1.0, 0.5), Point::new(-1.0, 0.5)).is_none());
    }

    #[test]
    fn ray_cast_grazing_a_corner_hits() {
        let sq = unit_square();
        let hit = sq.ray_cast(Point::new(-1.0, -1.0), Point::new(2.0, 2.0));
        let (t, _) = hit.unwrap();
        assert!((t - 1.0 / 3.0).abs() < 1e-12, "enters at the origin corner");
    }

    #[test]
    fn contains_is_inclusive() {
        let sq = unit_square();
        assert!(sq.contains(Point::new(0.5, 0.5)));
        assert!(sq.contains(Point::new(1.0, 0.5)));
        assert!(!sq.contains(Point::new(1.0001, 0.5)));
    }

    #[test]
    fn mirrored_transform_keeps_ccw_and_bounds() {
        let sq = unit_square();
        let mirrored = sq
            .transformed(Affine::translate((5.0, 0.0)) * Affine::FLIP_X)
            .unwrap();
        assert!(signed_area(mirrored.vertices()) > 0.0);
        assert_eq!(mirrored.bounding_box(), Rect::new(4.0, 0.0, 5.0, 1.0));
        assert_eq!(
            sq.transformed(Affine::scale_non_uniform(1.0, 0.0)),
            Err(ShapeError::Degenerate)
        );
    }
}

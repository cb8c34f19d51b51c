// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Result types of a visibility query.

use alloc::vec::Vec;
use kurbo::{Line, Point};

/// Which side of a discontinuity's vertex, seen from the eye, is occluded.
///
/// The obstacle owning the vertex sits on the occluded side; the opening
/// past the vertex is on the other side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Winding {
    /// Occluded counter-clockwise of the vertex.
    Left,
    /// Occluded clockwise of the vertex.
    Right,
}

/// Index into a cyclic list that may run one past either end.
///
/// # Examples
///
/// ```
/// use umbra_visibility::WrappingIndex;
///
/// assert_eq!(WrappingIndex(-1).wrap(5), 4);
/// assert_eq!(WrappingIndex(7).wrap(5), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WrappingIndex(pub isize);

impl WrappingIndex {
    /// Map into `[0, len)` with Euclidean remainder. Returns 0 when `len` is 0.
    #[inline]
    pub fn wrap(self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.0.rem_euclid(len as isize) as usize
    }

    /// Index `by` steps further along.
    #[inline]
    #[must_use]
    pub fn offset(self, by: isize) -> Self {
        Self(self.0 + by)
    }
}

impl From<usize> for WrappingIndex {
    fn from(i: usize) -> Self {
        Self(i as isize)
    }
}

/// A break in the visible boundary where an obstacle edge casts a shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Discontinuity {
    /// Obstacle vertex the shadow starts at.
    pub vertex: Point,
    /// Where the ray grazing the vertex ended up.
    pub far: Point,
    /// Occluded side of the vertex.
    pub winding: Winding,
    /// Edge of [`VisibilityResponse::edges`] lit next to the vertex.
    pub edge_index: usize,
    /// The grazing ray ran out at the query square instead of hitting an obstacle.
    pub is_boundary: bool,
}

impl Discontinuity {
    /// The shadow edge as a segment from the vertex to the far point.
    pub fn line(&self) -> Line {
        Line::new(self.vertex, self.far)
    }

    /// Length of the shadow edge.
    pub fn length(&self) -> f64 {
        self.line().length()
    }
}

/// A vertex both rays landed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VertexHit {
    /// The vertex.
    pub point: Point,
    /// Edge of [`VisibilityResponse::edges`] starting at the vertex.
    pub edge_index: usize,
}

/// Visible region around one observer, in output units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityResponse {
    /// Closed boundary of the visible region, counter-clockwise around the
    /// eye: each edge ends where the next begins.
    pub edges: Vec<Line>,
    /// Shadow edges, ordered by angle around the eye.
    pub discontinuities: Vec<Discontinuity>,
    /// Openings judged too narrow to pass, each from a point on nearby
    /// geometry to the vertex of a removed discontinuity.
    pub marked_holes: Vec<Line>,
    /// Vertices that were hit head-on.
    pub vertex_hits: Vec<VertexHit>,
    /// Side of the query square, as requested.
    pub square_side: f64,
}

impl VisibilityResponse {
    /// Whether the query produced no region.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of triangles in the fan from the eye over the edges.
    pub fn num_triangles(&self) -> usize {
        self.edges.len()
    }

    /// Triangle `i` of the fan rooted at `origin`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.num_triangles()`.
    pub fn triangle(&self, i: usize, origin: Point) -> [Point; 3] {
        let edge = self.edges[i];
        [origin, edge.p0, edge.p1]
    }

    /// The discontinuity attached to edge `edge_index`, if any.
    pub fn discontinuity_for_edge(&self, edge_index: usize) -> Option<&Discontinuity> {
        self.discontinuities
            .iter()
            .find(|d| d.edge_index == edge_index)
    }

    /// The boundary as a vertex list.
    ///
    /// Stops at the first edge with a non-finite coordinate. An edge's end
    /// is skipped when it lies within `distance_epsilon` of the next edge's
    /// start; otherwise it is pushed away from `expand_origin` by
    /// `expand_mult` times its offset from it.
    ///
    /// Responses from the engine are closed loops, so every end matches the
    /// next start and nothing is expanded. Expansion only affects edge lists
    /// the caller has opened or built.
    pub fn polygon(&self, distance_epsilon: f64, expand_origin: Point, expand_mult: f64) -> Vec<Point> {
        let n = self.edges.len();
        let mut out = Vec::with_capacity(n);
        for (i, edge) in self.edges.iter().enumerate() {
            if !(edge.p0.is_finite() && edge.p1.is_finite()) {
                break;
            }
            out.push(edge.p0);
            let next = self.edges[(i + 1) % n].p0;
            if edge.p1.distance(next) > distance_epsilon {
                out.push(edge.p1 + (edge.p1 - expand_origin) * expand_mult);
            }
        }
        out
    }
}

// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::shape::MAX_POLYGON_VERTICES;

/// Reasons a [`ConvexPolygon`](crate::ConvexPolygon) cannot be built.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// Fewer than three vertices.
    #[error("a convex polygon needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },
    /// More vertices than a collider can hold.
    #[error("a convex polygon holds at most {MAX_POLYGON_VERTICES} vertices, got {count}")]
    TooManyVertices {
        /// Number of vertices supplied.
        count: usize,
    },
    /// A coordinate is NaN or infinite.
    #[error("polygon vertex is not finite")]
    NonFinite,
    /// The outline turns both ways.
    #[error("polygon is not convex")]
    NotConvex,
    /// Zero area, or two consecutive vertices coincide.
    #[error("polygon is degenerate")]
    Degenerate,
}

// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-worker scratch state reused across requests.

use alloc::vec::Vec;
use kurbo::{Line, Point};

use crate::response::{WrappingIndex, Winding};

/// How an obstacle's silhouette changes at a candidate vertex, going counter-clockwise
/// around the obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisionExtends {
    /// The edge leaving the vertex faces the eye, the one arriving does not.
    Begins,
    /// The edge arriving at the vertex faces the eye, the one leaving does not.
    Ends,
    /// Both edges face the eye, or the vertex lies on the query square.
    Interior,
}

/// A point rays will be cast towards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateVertex {
    /// Position in internal units.
    pub pos: Point,
    /// [`comparable_angle`](crate::comparable_angle) of `pos` around the eye.
    pub angle: f64,
    /// Corner of the query square, or a point where an obstacle crosses it.
    pub on_boundary: bool,
    /// Silhouette change at this vertex.
    pub vision_extends: VisionExtends,
}

/// Outcome of the ray pair cast past one candidate vertex.
///
/// Consecutive outcomes around the eye are joined by one visible boundary
/// span, from `second` of the earlier to `first` of the later.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoubleRay {
    /// End point of the clockwise ray.
    pub first: Point,
    /// End point of the counter-clockwise ray.
    pub second: Point,
    /// The clockwise ray stopped at the vertex.
    pub first_reached: bool,
    /// The counter-clockwise ray stopped at the vertex.
    pub second_reached: bool,
}

impl DoubleRay {
    pub(crate) fn at_vertex(v: Point) -> Self {
        Self {
            first: v,
            second: v,
            first_reached: true,
            second_reached: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct RayInput {
    pub(crate) targets: [Point; 2],
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PendingDiscontinuity {
    pub(crate) vertex: Point,
    pub(crate) far: Point,
    pub(crate) winding: Winding,
    /// Double ray whose span the discontinuity belongs to.
    pub(crate) ray: WrappingIndex,
    pub(crate) is_boundary: bool,
}

/// Scratch buffers for one worker.
///
/// A context carries no meaning between requests; it only keeps allocations
/// alive. Give each thread its own.
#[derive(Debug, Default)]
pub struct VisibilityContext {
    pub(crate) candidates: Vec<CandidateVertex>,
    pub(crate) surely_invisible: Vec<Point>,
    pub(crate) crossings: Vec<Point>,
    pub(crate) ray_inputs: Vec<RayInput>,
    pub(crate) ray_outputs: Vec<[Option<Point>; 2]>,
    pub(crate) double_rays: Vec<DoubleRay>,
    pub(crate) discontinuities: Vec<PendingDiscontinuity>,
    /// Double-ray index and position of each vertex hit.
    pub(crate) vertex_hits: Vec<(usize, Point)>,
    pub(crate) spans: Vec<Line>,
    pub(crate) holes: Vec<Line>,
}

impl VisibilityContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate vertices of the last request, sorted by angle.
    pub fn candidates(&self) -> &[CandidateVertex] {
        &self.candidates
    }

    /// Obstacle vertices of the last request that were skipped because they
    /// face away from the eye.
    pub fn surely_invisible(&self) -> &[Point] {
        &self.surely_invisible
    }

    /// Ray pair outcomes of the last request, in internal units.
    pub fn double_rays(&self) -> &[DoubleRay] {
        &self.double_rays
    }

    pub(crate) fn clear(&mut self) {
        self.candidates.clear();
        self.surely_invisible.clear();
        self.crossings.clear();
        self.ray_inputs.clear();
        self.ray_outputs.clear();
        self.double_rays.clear();
        self.discontinuities.clear();
        self.vertex_hits.clear();
        self.spans.clear();
        self.holes.clear();
    }
}

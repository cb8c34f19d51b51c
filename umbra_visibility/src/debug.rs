// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Optional side channel reporting the rays and segments a query produced.

use alloc::vec::Vec;
use kurbo::Point;

use crate::settings::UnitScale;

/// What a debug segment represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RayTag {
    /// An edge of the query square.
    QueryBounds,
    /// Ray that landed on its vertex.
    VertexHit,
    /// Ray stopped by an obstacle in front of its vertex.
    Obstructed,
    /// Ray that passed its vertex and ran out at the query square.
    ExtendedVisionHit,
    /// Ray that passed its vertex and hit another obstacle.
    FreeArea,
    /// A discontinuity in the final response.
    Discontinuity,
    /// A marked hole.
    UnreachableArea,
    /// A vertex skipped because both of its edges face away from the eye.
    SurelyInvisible,
}

/// Receiver for debug segments, in output units.
pub trait DebugSink {
    /// Called for every segment of interest.
    fn on_ray_cast(&mut self, from: Point, to: Point, tag: RayTag);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDebug;

impl DebugSink for NoDebug {
    #[inline(always)]
    fn on_ray_cast(&mut self, _: Point, _: Point, _: RayTag) {}
}

/// A recorded debug segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugLine {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Meaning.
    pub tag: RayTag,
}

/// Sink that collects every segment for drawing.
#[derive(Clone, Debug, Default)]
pub struct DebugLines {
    /// Segments in emission order.
    pub lines: Vec<DebugLine>,
}

impl DebugLines {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded segments with the given tag.
    pub fn tagged(&self, tag: RayTag) -> impl Iterator<Item = &DebugLine> + '_ {
        self.lines.iter().filter(move |l| l.tag == tag)
    }

    /// Forget all segments.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl DebugSink for DebugLines {
    fn on_ray_cast(&mut self, from: Point, to: Point, tag: RayTag) {
        self.lines.push(DebugLine { from, to, tag });
    }
}

/// Forwards segments to a sink after converting them to output units.
pub(crate) struct Emitter<'a, S: ?Sized> {
    sink: &'a mut S,
    scale: UnitScale,
    eye: Point,
}

impl<'a, S: DebugSink + ?Sized> Emitter<'a, S> {
    pub(crate) fn new(sink: &'a mut S, scale: UnitScale, eye: Point) -> Self {
        Self { sink, scale, eye }
    }

    /// Segment between two internal points.
    pub(crate) fn segment(&mut self, from: Point, to: Point, tag: RayTag) {
        self.sink
            .on_ray_cast(self.scale.to_output(from), self.scale.to_output(to), tag);
    }

    /// Ray from the eye to an internal point.
    pub(crate) fn ray(&mut self, to: Point, tag: RayTag) {
        self.segment(self.eye, to, tag);
    }
}

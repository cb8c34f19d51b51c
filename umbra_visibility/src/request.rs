// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The query a caller submits.

use kurbo::{Point, Vec2};
use umbra_colliders::{CollisionFilter, EntityId};

/// One visibility query, in internal units.
///
/// The visible region is computed inside an axis-aligned square of side
/// `square_side` centered on the eye, which is `eye + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityRequest {
    /// Entity looking; its own colliders never occlude.
    pub subject: Option<EntityId>,
    /// Observer position.
    pub eye: Point,
    /// Added to `eye`, for example to look from a character's head.
    pub offset: Vec2,
    /// Side of the query square. Requests with a side below 1, or one that
    /// is not finite, produce an empty response.
    pub square_side: f64,
    /// Which colliders occlude.
    pub filter: CollisionFilter,
    /// Drop discontinuities whose vertex lies this close to other visible
    /// geometry on its open side, marking the gap as a hole. Zero or
    /// negative disables the filter.
    pub ignore_discontinuities_shorter_than: f64,
}

impl VisibilityRequest {
    /// Request around `eye` with the default filter and no subject, offset, or filtering.
    pub fn new(eye: Point, square_side: f64) -> Self {
        Self {
            subject: None,
            eye,
            offset: Vec2::ZERO,
            square_side,
            filter: CollisionFilter::default(),
            ignore_discontinuities_shorter_than: 0.0,
        }
    }

    /// Set the looking entity.
    pub fn with_subject(mut self, subject: EntityId) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Set the eye offset.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    /// Set the occluder filter.
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enable discontinuity filtering with the given distance.
    pub fn ignoring_discontinuities_shorter_than(mut self, distance: f64) -> Self {
        self.ignore_discontinuities_shorter_than = distance;
        self
    }

    /// Whether the request produces any geometry.
    pub fn valid(&self) -> bool {
        self.square_side.is_finite() && self.square_side >= 1.0
    }

    /// The point rays are cast from.
    pub fn effective_eye(&self) -> Point {
        self.eye + self.offset
    }
}

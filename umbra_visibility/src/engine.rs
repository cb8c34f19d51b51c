// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The request pipeline and batch drivers.

use alloc::vec::Vec;

use umbra_colliders::ColliderQuery;

use crate::cast::{cast_rays, classify};
use crate::collect::collect_candidates;
use crate::context::VisibilityContext;
use crate::debug::{DebugSink, Emitter, NoDebug, RayTag};
use crate::filter::filter_discontinuities;
use crate::request::VisibilityRequest;
use crate::response::VisibilityResponse;
use crate::settings::{UnitScale, VisibilitySettings};
use crate::square::QuerySquare;
use crate::stitch::{assemble, build_spans};

/// Computes visible regions against a [`ColliderQuery`] snapshot.
///
/// The engine holds configuration only. Scratch state lives in a
/// [`VisibilityContext`] the caller passes in, so one engine can serve any
/// number of threads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VisibilityEngine {
    /// Tolerances, stored with every field non-negative.
    pub settings: VisibilitySettings,
    /// Conversion applied to every point of a response.
    pub scale: UnitScale,
}

impl VisibilityEngine {
    /// Engine with the given tolerances and output scale.
    ///
    /// Negative tolerances are replaced by their magnitude.
    pub fn new(settings: VisibilitySettings, scale: UnitScale) -> Self {
        Self {
            settings: settings.absolutized(),
            scale,
        }
    }

    /// Compute the visible region for one request.
    pub fn respond<W: ColliderQuery + ?Sized>(
        &self,
        ctx: &mut VisibilityContext,
        world: &W,
        request: &VisibilityRequest,
    ) -> VisibilityResponse {
        self.respond_with_sink(ctx, world, request, &mut NoDebug)
    }

    /// Like [`respond`](Self::respond), reporting every ray and segment of
    /// interest to `sink` in output units.
    pub fn respond_with_sink<W, S>(
        &self,
        ctx: &mut VisibilityContext,
        world: &W,
        request: &VisibilityRequest,
        sink: &mut S,
    ) -> VisibilityResponse
    where
        W: ColliderQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        ctx.clear();
        if !request.valid() {
            return VisibilityResponse {
                square_side: request.square_side,
                ..VisibilityResponse::default()
            };
        }

        let settings = self.settings.absolutized();
        let eye = request.effective_eye();
        let square = QuerySquare::new(eye, request.square_side, settings.boundary_nudge);
        let mut debug = Emitter::new(sink, self.scale, eye);

        collect_candidates(world, request, eye, &square, &settings, ctx, &mut debug);
        cast_rays(world, request, eye, &square, &settings, ctx);
        classify(eye, &square, &settings, self.scale, ctx, &mut debug);
        build_spans(ctx);

        let threshold = request.ignore_discontinuities_shorter_than;
        if threshold > 0.0 {
            let before = ctx.discontinuities.len();
            filter_discontinuities(
                eye,
                threshold,
                &ctx.spans,
                &mut ctx.discontinuities,
                &mut ctx.holes,
            );
            let removed = before - ctx.discontinuities.len();
            if removed > 0 {
                log::debug!(
                    "discontinuity filter removed {removed} of {before}, marked {} holes",
                    ctx.holes.len()
                );
            }
            for hole in &ctx.holes {
                debug.segment(hole.p0, hole.p1, RayTag::UnreachableArea);
            }
        }
        for d in &ctx.discontinuities {
            debug.segment(d.vertex, d.far, RayTag::Discontinuity);
        }

        let response = assemble(ctx, self.scale, request.square_side);
        log::trace!(
            "visibility at {eye:?}: {} candidates, {} double rays, {} edges, {} discontinuities",
            ctx.candidates.len(),
            ctx.double_rays.len(),
            response.edges.len(),
            response.discontinuities.len()
        );
        response
    }

    /// Answer every request in order, reusing one context.
    ///
    /// # Panics
    ///
    /// Panics if the number of responses differs from the number of requests.
    pub fn respond_all<W: ColliderQuery + ?Sized>(
        &self,
        world: &W,
        requests: &[VisibilityRequest],
    ) -> Vec<VisibilityResponse> {
        log::debug!("answering {} visibility requests", requests.len());
        let mut ctx = VisibilityContext::new();
        let responses: Vec<_> = requests
            .iter()
            .map(|r| self.respond(&mut ctx, world, r))
            .collect();
        assert_eq!(
            responses.len(),
            requests.len(),
            "every visibility request must get exactly one response"
        );
        responses
    }

    /// Answer every request on the rayon pool, one context per worker.
    ///
    /// Responses come back in request order and match
    /// [`respond_all`](Self::respond_all).
    ///
    /// # Panics
    ///
    /// Panics if the number of responses differs from the number of requests.
    #[cfg(feature = "parallel")]
    pub fn respond_all_par<W: ColliderQuery + Sync + ?Sized>(
        &self,
        world: &W,
        requests: &[VisibilityRequest],
    ) -> Vec<VisibilityResponse> {
        use rayon::prelude::*;

        log::debug!("answering {} visibility requests in parallel", requests.len());
        let responses: Vec<_> = requests
            .par_iter()
            .map_init(VisibilityContext::new, |ctx, r| self.respond(ctx, world, r))
            .collect();
        assert_eq!(
            responses.len(),
            requests.len(),
            "every visibility request must get exactly one response"
        );
        responses
    }
}

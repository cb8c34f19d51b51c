// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Joining double rays into the closed boundary of the response.

use alloc::vec::Vec;
use kurbo::Line;

use crate::context::VisibilityContext;
use crate::response::{Discontinuity, VertexHit, VisibilityResponse};
use crate::settings::UnitScale;

/// Span `i` runs from the end of double ray `i` to the start of the next one.
pub(crate) fn build_spans(ctx: &mut VisibilityContext) {
    let n = ctx.double_rays.len();
    let rays = &ctx.double_rays;
    ctx.spans
        .extend((0..n).map(|i| Line::new(rays[i].second, rays[(i + 1) % n].first)));
}

/// Produce the response in output units.
///
/// A double ray whose two ends differ contributes the radial edge between
/// them; every double ray then contributes its span. Each edge starts where
/// the previous one ends, so the boundary closes.
pub(crate) fn assemble(
    ctx: &VisibilityContext,
    scale: UnitScale,
    square_side: f64,
) -> VisibilityResponse {
    let line = |l: Line| Line::new(scale.to_output(l.p0), scale.to_output(l.p1));
    let n = ctx.double_rays.len();

    let mut edges = Vec::with_capacity(2 * n);
    let mut span_edge = Vec::with_capacity(n);
    for (dr, span) in ctx.double_rays.iter().zip(&ctx.spans) {
        if dr.first != dr.second {
            edges.push(line(Line::new(dr.first, dr.second)));
        }
        span_edge.push(edges.len());
        edges.push(line(*span));
    }

    let discontinuities = ctx
        .discontinuities
        .iter()
        .map(|d| Discontinuity {
            vertex: scale.to_output(d.vertex),
            far: scale.to_output(d.far),
            winding: d.winding,
            edge_index: span_edge[d.ray.wrap(n)],
            is_boundary: d.is_boundary,
        })
        .collect();

    let vertex_hits = ctx
        .vertex_hits
        .iter()
        .map(|&(i, point)| VertexHit {
            point: scale.to_output(point),
            edge_index: span_edge[i],
        })
        .collect();

    VisibilityResponse {
        edges,
        discontinuities,
        marked_holes: ctx.holes.iter().map(|&h| line(h)).collect(),
        vertex_hits,
        square_side,
    }
}

// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Casting the ray pair past each candidate vertex and reading the result.
//!
//! Every obstacle vertex gets two rays, offset sideways by a small amount so
//! that one grazes the clockwise side of the vertex and the other the
//! counter-clockwise side. Where the two land tells whether the vertex is
//! hidden, hit head-on, or the start of a shadow. Boundary vertices only get
//! one ray, aimed straight at them.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};
use umbra_colliders::ColliderQuery;

use crate::context::{DoubleRay, PendingDiscontinuity, RayInput, VisibilityContext};
use crate::debug::{DebugSink, Emitter, RayTag};
use crate::request::VisibilityRequest;
use crate::response::{Winding, WrappingIndex};
use crate::settings::{UnitScale, VisibilitySettings};
use crate::square::QuerySquare;

/// Reach of an unobstructed ray, as a multiple of the square's half diagonal.
const REACH_FACTOR: f64 = 1.5;

/// Build the ray targets for every candidate, then cast them.
///
/// All inputs are prepared before any ray is cast, so the casting loop only
/// reads the world and the inputs.
pub(crate) fn cast_rays<W: ColliderQuery + ?Sized>(
    world: &W,
    request: &VisibilityRequest,
    eye: Point,
    square: &QuerySquare,
    settings: &VisibilitySettings,
    ctx: &mut VisibilityContext,
) {
    let reach = REACH_FACTOR * square.half_diagonal();
    let variation = settings.epsilon_ray_distance_variation;

    ctx.ray_inputs.extend(ctx.candidates.iter().map(|c| {
        let d = c.pos - eye;
        let len = d.hypot();
        if c.on_boundary || len == 0.0 {
            return RayInput {
                targets: [c.pos, c.pos],
            };
        }
        let perp_cw = Vec2::new(d.y, -d.x) / len;
        let aims = [c.pos + perp_cw * variation, c.pos - perp_cw * variation];
        RayInput {
            targets: aims.map(|aim| {
                let dir = (aim - eye).normalize();
                square.clamp(eye, eye + dir * reach, dir)
            }),
        }
    }));

    let cast = |target: Point| {
        world
            .ray_cast(eye, target, &request.filter, request.subject)
            .map(|hit| hit.point)
    };
    ctx.ray_outputs.extend(
        ctx.candidates
            .iter()
            .zip(&ctx.ray_inputs)
            .map(|(c, input)| {
                let first = cast(input.targets[0]);
                let second = if c.on_boundary {
                    None
                } else {
                    cast(input.targets[1])
                };
                [first, second]
            }),
    );
}

/// Turn ray outputs into double rays, discontinuities, and vertex hits.
pub(crate) fn classify<S: DebugSink + ?Sized>(
    eye: Point,
    square: &QuerySquare,
    settings: &VisibilitySettings,
    scale: UnitScale,
    ctx: &mut VisibilityContext,
    debug: &mut Emitter<'_, S>,
) {
    let eps_hit = settings.epsilon_distance_vertex_hit;
    let eps_obstacle = settings.epsilon_threshold_obstacle_hit;
    let eps_output = settings.epsilon_output_distance;

    for i in 0..ctx.candidates.len() {
        let candidate = ctx.candidates[i];
        let v = candidate.pos;
        let targets = ctx.ray_inputs[i].targets;
        let hits = ctx.ray_outputs[i];

        if candidate.on_boundary {
            match hits[0] {
                Some(h) if h.distance(v) > eps_hit => debug.ray(h, RayTag::Obstructed),
                _ => {
                    push_double_ray(&mut ctx.double_rays, DoubleRay::at_vertex(v), scale, eps_output);
                    debug.ray(v, RayTag::VertexHit);
                }
            }
            continue;
        }

        match hits {
            [Some(h0), Some(h1)] => {
                let dv = eye.distance(v);
                if eye.distance(h0) + eps_obstacle < dv && eye.distance(h1) + eps_obstacle < dv {
                    debug.ray(h0, RayTag::Obstructed);
                    debug.ray(h1, RayTag::Obstructed);
                } else if h0.distance(h1) < eps_hit {
                    if push_double_ray(&mut ctx.double_rays, DoubleRay::at_vertex(v), scale, eps_output) {
                        ctx.vertex_hits.push((ctx.double_rays.len() - 1, v));
                    }
                    debug.ray(v, RayTag::VertexHit);
                } else if h0.distance(v) < h1.distance(v) {
                    // Clockwise ray stopped at the vertex, the other one went on.
                    let ray = WrappingIndex::from(ctx.double_rays.len()).offset(-1);
                    let dr = DoubleRay {
                        first: v,
                        second: h1,
                        first_reached: true,
                        second_reached: false,
                    };
                    if push_double_ray(&mut ctx.double_rays, dr, scale, eps_output) {
                        ctx.discontinuities.push(PendingDiscontinuity {
                            vertex: v,
                            far: h1,
                            winding: Winding::Right,
                            ray,
                            is_boundary: false,
                        });
                    }
                    debug.ray(h1, RayTag::FreeArea);
                } else {
                    let ray = WrappingIndex::from(ctx.double_rays.len());
                    let dr = DoubleRay {
                        first: h0,
                        second: v,
                        first_reached: false,
                        second_reached: true,
                    };
                    if push_double_ray(&mut ctx.double_rays, dr, scale, eps_output) {
                        ctx.discontinuities.push(PendingDiscontinuity {
                            vertex: v,
                            far: h0,
                            winding: Winding::Left,
                            ray,
                            is_boundary: false,
                        });
                    }
                    debug.ray(h0, RayTag::FreeArea);
                }
            }
            _ => {
                // At least one ray ran out; it ends where it leaves the square.
                let k = usize::from(hits[0].is_some());
                let Some(exit) = square.first_crossing(eye, targets[k]) else {
                    continue;
                };
                let len = ctx.double_rays.len();
                let (dr, winding, ray) = if k == 0 {
                    let dr = DoubleRay {
                        first: exit,
                        second: v,
                        first_reached: false,
                        second_reached: true,
                    };
                    (dr, Winding::Left, WrappingIndex::from(len))
                } else {
                    let dr = DoubleRay {
                        first: v,
                        second: exit,
                        first_reached: true,
                        second_reached: false,
                    };
                    (dr, Winding::Right, WrappingIndex::from(len).offset(-1))
                };
                if push_double_ray(&mut ctx.double_rays, dr, scale, eps_output) {
                    ctx.discontinuities.push(PendingDiscontinuity {
                        vertex: v,
                        far: exit,
                        winding,
                        ray,
                        is_boundary: true,
                    });
                }
                debug.ray(exit, RayTag::ExtendedVisionHit);
            }
        }
    }
}

/// Append `dr` unless it is non-finite or starts where the previous one ends.
///
/// The gap is measured in output units. Returns whether `dr` was kept.
pub(crate) fn push_double_ray(
    double_rays: &mut Vec<DoubleRay>,
    dr: DoubleRay,
    scale: UnitScale,
    epsilon_output_distance: f64,
) -> bool {
    if !(dr.first.is_finite() && dr.second.is_finite()) {
        log::trace!("dropping non-finite double ray {dr:?}");
        return false;
    }
    if let Some(last) = double_rays.last()
        && scale
            .to_output(last.second)
            .distance(scale.to_output(dr.first))
            <= epsilon_output_distance
    {
        return false;
    }
    double_rays.push(dr);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{CandidateVertex, VisionExtends};
    use crate::debug::DebugLines;

    fn candidate(x: f64, y: f64, on_boundary: bool) -> CandidateVertex {
        CandidateVertex {
            pos: Point::new(x, y),
            angle: 0.0,
            on_boundary,
            vision_extends: VisionExtends::Interior,
        }
    }

    #[test]
    fn classify_sorts_each_outcome_into_its_branch() {
        let eye = Point::ORIGIN;
        let square = QuerySquare::new(eye, 10.0, 1e-3);
        let p = Point::new;
        // (candidate, ray targets, ray hits)
        let cases = [
            // Clockwise ray runs on, the other stops: Left.
            (
                candidate(4.0, -1.0, false),
                [p(8.0, -2.0); 2],
                [Some(p(8.0, -2.0)), Some(p(4.0, -1.0))],
            ),
            // Both rays stop well short of the vertex: hidden.
            (candidate(4.0, 0.5, false), [p(8.0, 1.0); 2], [Some(p(2.0, 0.2)), Some(p(2.0, 0.3))]),
            // Both land on the vertex: head-on hit.
            (
                candidate(5.0, 1.0, false),
                [p(8.0, 1.6); 2],
                [Some(p(5.0, 1.0)), Some(p(5.001, 1.0))],
            ),
            // Clockwise ray stops, the other runs on: Right.
            (candidate(4.0, 2.0, false), [p(8.0, 4.0); 2], [Some(p(4.0, 2.0)), Some(p(8.0, 4.0))]),
            // Both rays miss: the clockwise one ends at the square.
            (candidate(-4.0, 3.0, false), [p(-12.0, 9.0); 2], [None, None]),
            // Only the counter-clockwise ray misses.
            (candidate(-4.0, -3.0, false), [p(-12.0, -9.0); 2], [Some(p(-4.0, -3.0)), None]),
            // Boundary vertex reached.
            (candidate(5.0, 5.0, true), [p(5.0, 5.0); 2], [None, None]),
            // Boundary vertex behind an obstacle.
            (candidate(-5.0, 5.0, true), [p(-5.0, 5.0); 2], [Some(p(-2.0, 2.0)), None]),
        ];

        let mut ctx = VisibilityContext::new();
        for (c, targets, hits) in cases {
            ctx.candidates.push(c);
            ctx.ray_inputs.push(RayInput { targets });
            ctx.ray_outputs.push(hits);
        }
        let mut sink = DebugLines::new();
        let mut debug = Emitter::new(&mut sink, UnitScale::IDENTITY, eye);
        let settings = VisibilitySettings::default();
        classify(eye, &square, &settings, UnitScale::IDENTITY, &mut ctx, &mut debug);

        assert_eq!(
            ctx.double_rays.len(),
            6,
            "the hidden and obstructed vertices add nothing"
        );
        assert_eq!(ctx.double_rays[0].second, p(4.0, -1.0));
        assert_eq!(ctx.double_rays[1], DoubleRay::at_vertex(p(5.0, 1.0)));
        assert_eq!(ctx.double_rays[2].first, p(4.0, 2.0));
        assert_eq!(ctx.double_rays[5], DoubleRay::at_vertex(p(5.0, 5.0)));
        assert_eq!(ctx.vertex_hits, [(1, p(5.0, 1.0))]);

        let summary: Vec<_> = ctx
            .discontinuities
            .iter()
            .map(|d| (d.vertex, d.winding, d.ray, d.is_boundary))
            .collect();
        assert_eq!(
            summary,
            [
                (p(4.0, -1.0), Winding::Left, WrappingIndex(0), false),
                (p(4.0, 2.0), Winding::Right, WrappingIndex(1), false),
                (p(-4.0, 3.0), Winding::Left, WrappingIndex(3), true),
                (p(-4.0, -3.0), Winding::Right, WrappingIndex(3), true),
            ]
        );
        // Missed rays end where they leave the square.
        assert!(ctx.discontinuities[2].far.distance(p(-5.0, 3.75)) < 1e-9);
        assert!(ctx.discontinuities[3].far.distance(p(-5.0, -3.75)) < 1e-9);
        assert_eq!(ctx.double_rays[3].first, ctx.discontinuities[2].far);
        assert_eq!(ctx.double_rays[4].second, ctx.discontinuities[3].far);

        assert_eq!(sink.tagged(RayTag::Obstructed).count(), 3);
        assert_eq!(sink.tagged(RayTag::VertexHit).count(), 2);
    }

    #[test]
    fn push_rejects_non_finite_and_repeated_points() {
        let mut rays = Vec::new();
        let scale = UnitScale::new(10.0);
        assert!(push_double_ray(&mut rays, DoubleRay::at_vertex(Point::new(1.0, 0.0)), scale, 1e-3));
        // 5e-5 internal is 5e-4 output, inside the epsilon.
        assert!(!push_double_ray(
            &mut rays,
            DoubleRay::at_vertex(Point::new(1.0, 5e-5)),
            scale,
            1e-3
        ));
        assert!(!push_double_ray(
            &mut rays,
            DoubleRay::at_vertex(Point::new(f64::NAN, 0.0)),
            scale,
            1e-3
        ));
        assert!(push_double_ray(&mut rays, DoubleRay::at_vertex(Point::new(0.0, 1.0)), scale, 1e-3));
        assert_eq!(rays.len(), 2);
    }

    #[test]
    fn only_the_second_point_of_the_last_ray_is_compared() {
        let mut rays = Vec::new();
        let dr = DoubleRay {
            first: Point::new(5.0, 0.0),
            second: Point::new(1.0, 0.0),
            first_reached: false,
            second_reached: true,
        };
        assert!(push_double_ray(&mut rays, dr, UnitScale::IDENTITY, 1e-4));
        // Matches the first point of the previous ray, which does not matter.
        assert!(push_double_ray(
            &mut rays,
            DoubleRay::at_vertex(Point::new(5.0, 0.0)),
            UnitScale::IDENTITY,
            1e-4
        ));
        assert!(!push_double_ray(
            &mut rays,
            DoubleRay::at_vertex(Point::new(5.0, 0.0)),
            UnitScale::IDENTITY,
            1e-4
        ));
    }
}

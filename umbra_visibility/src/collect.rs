// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate vertices: obstacle silhouettes, square crossings, and square corners.

use core::ops::ControlFlow;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Point;
use umbra_colliders::{ColliderQuery, MAX_POLYGON_VERTICES};

use crate::angle::comparable_angle;
use crate::context::{CandidateVertex, VisibilityContext, VisionExtends};
use crate::debug::{DebugSink, Emitter, RayTag};
use crate::request::VisibilityRequest;
use crate::settings::VisibilitySettings;
use crate::square::QuerySquare;

/// Fill `ctx.candidates` with every point to cast rays at, sorted by angle
/// around `eye` and free of duplicates.
pub(crate) fn collect_candidates<W, S>(
    world: &W,
    request: &VisibilityRequest,
    eye: Point,
    square: &QuerySquare,
    settings: &VisibilitySettings,
    ctx: &mut VisibilityContext,
    debug: &mut Emitter<'_, S>,
) where
    W: ColliderQuery + ?Sized,
    S: DebugSink + ?Sized,
{
    collect_silhouettes(world, request, eye, square, ctx);
    for &p in &ctx.surely_invisible {
        debug.ray(p, RayTag::SurelyInvisible);
    }
    collect_square(world, request, eye, square, settings, ctx, debug);
    sort_and_dedup(ctx, eye, settings.epsilon_duplicate_vertex);
}

fn collect_silhouettes<W: ColliderQuery + ?Sized>(
    world: &W,
    request: &VisibilityRequest,
    eye: Point,
    square: &QuerySquare,
    ctx: &mut VisibilityContext,
) {
    world.for_each_in_aabb(square.bounds, &request.filter, |collider| {
        if request.subject == Some(collider.owner) {
            return ControlFlow::Continue(());
        }
        let eye_local = collider.transform.inverse() * eye;
        let shape = collider.local_shape;
        let vertices = shape.vertices();
        let n = vertices.len();

        // Edge i faces the eye when the eye is on its outer (right) side.
        let mut faces = [false; MAX_POLYGON_VERTICES];
        for (i, face) in faces.iter_mut().enumerate().take(n) {
            let edge = shape.edge(i);
            *face = (edge.p1 - edge.p0).cross(eye_local - edge.p0) < 0.0;
        }

        for (i, &v) in vertices.iter().enumerate() {
            let leaving = faces[i];
            let arriving = faces[(i + n - 1) % n];
            let pos = collider.transform * v;
            if !leaving && !arriving {
                ctx.surely_invisible.push(pos);
                continue;
            }
            if !square.contains(pos) {
                continue;
            }
            let vision_extends = match (leaving, arriving) {
                (true, false) => VisionExtends::Begins,
                (false, true) => VisionExtends::Ends,
                _ => VisionExtends::Interior,
            };
            ctx.candidates.push(CandidateVertex {
                pos,
                angle: comparable_angle(pos - eye),
                on_boundary: false,
                vision_extends,
            });
        }
        ControlFlow::Continue(())
    });
}

/// Points where obstacles cross the square, then the square's corners.
fn collect_square<W, S>(
    world: &W,
    request: &VisibilityRequest,
    eye: Point,
    square: &QuerySquare,
    settings: &VisibilitySettings,
    ctx: &mut VisibilityContext,
    debug: &mut Emitter<'_, S>,
) where
    W: ColliderQuery + ?Sized,
    S: DebugSink + ?Sized,
{
    let boundary = |pos: Point| CandidateVertex {
        pos,
        angle: comparable_angle(pos - eye),
        on_boundary: true,
        vision_extends: VisionExtends::Interior,
    };

    for edge in &square.edges {
        debug.segment(edge.p0, edge.p1, RayTag::QueryBounds);

        // Rays only report entries, so walk each edge both ways.
        ctx.crossings.clear();
        ctx.crossings.extend(
            world
                .ray_cast_all_intersections(edge.p0, edge.p1, &request.filter, request.subject)
                .into_iter()
                .map(|hit| hit.point),
        );
        let forward = ctx.crossings.len();
        for hit in
            world.ray_cast_all_intersections(edge.p1, edge.p0, &request.filter, request.subject)
        {
            let seen = ctx.crossings[..forward]
                .iter()
                .any(|c| c.distance(hit.point) <= settings.epsilon_duplicate_vertex);
            if !seen {
                ctx.crossings.push(hit.point);
            }
        }
        ctx.candidates
            .extend(ctx.crossings.iter().map(|&p| boundary(p)));
    }

    ctx.candidates
        .extend(square.corners.iter().map(|&p| boundary(p)));
}

/// Sort by angle (nearer first on ties) and drop vertices that repeat the
/// position or the angle of the one kept before them.
fn sort_and_dedup(ctx: &mut VisibilityContext, eye: Point, epsilon: f64) {
    ctx.candidates.sort_by(|a, b| {
        a.angle.total_cmp(&b.angle).then_with(|| {
            eye.distance_squared(a.pos)
                .total_cmp(&eye.distance_squared(b.pos))
        })
    });
    ctx.candidates.dedup_by(|later, kept| {
        later.pos.distance(kept.pos) <= epsilon || (later.angle - kept.angle).abs() <= f64::EPSILON
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::NoDebug;
    use crate::settings::UnitScale;
    use alloc::vec::Vec;
    use kurbo::{Affine, Rect};
    use umbra_colliders::{Collider, ColliderWorld, ConvexPolygon, EntityId};

    fn run(world: &ColliderWorld, request: &VisibilityRequest) -> VisibilityContext {
        let mut ctx = VisibilityContext::new();
        let settings = VisibilitySettings::default();
        let eye = request.effective_eye();
        let square = QuerySquare::new(eye, request.square_side, settings.boundary_nudge);
        let mut sink = NoDebug;
        let mut debug = Emitter::new(&mut sink, UnitScale::IDENTITY, eye);
        collect_candidates(world, request, eye, &square, &settings, &mut ctx, &mut debug);
        ctx
    }

    fn positions(ctx: &VisibilityContext) -> Vec<Point> {
        ctx.candidates().iter().map(|c| c.pos).collect()
    }

    #[test]
    fn empty_world_yields_the_corners_in_angular_order() {
        let world = ColliderWorld::new();
        let ctx = run(&world, &VisibilityRequest::new(Point::ORIGIN, 20.0));
        assert_eq!(
            positions(&ctx),
            [
                Point::new(-10.0, -10.0),
                Point::new(10.0, -10.0),
                Point::new(10.0, 10.0),
                Point::new(-10.0, 10.0),
            ]
        );
        assert!(ctx.candidates().iter().all(|c| c.on_boundary));
    }

    #[test]
    fn box_contributes_its_two_silhouette_vertices() {
        let mut world = ColliderWorld::new();
        let shape = ConvexPolygon::from_rect(Rect::new(4.0, -1.0, 6.0, 1.0)).unwrap();
        world.insert(Collider::new(EntityId(1), shape)).unwrap();
        let ctx = run(&world, &VisibilityRequest::new(Point::ORIGIN, 20.0));

        let obstacle: Vec<_> = ctx.candidates().iter().filter(|c| !c.on_boundary).collect();
        assert_eq!(obstacle.len(), 2);
        assert_eq!(obstacle[0].pos, Point::new(4.0, -1.0));
        assert_eq!(obstacle[0].vision_extends, VisionExtends::Ends);
        assert_eq!(obstacle[1].pos, Point::new(4.0, 1.0));
        assert_eq!(obstacle[1].vision_extends, VisionExtends::Begins);
        assert_eq!(ctx.surely_invisible().len(), 2);
    }

    #[test]
    fn subject_colliders_are_ignored_even_when_rotated() {
        let mut world = ColliderWorld::new();
        let shape = ConvexPolygon::from_rect(Rect::new(-1.0, -1.0, 1.0, 1.0)).unwrap();
        world
            .insert(
                Collider::new(EntityId(9), shape)
                    .with_transform(Affine::translate((5.0, 5.0)) * Affine::rotate(0.3)),
            )
            .unwrap();
        let request = VisibilityRequest::new(Point::ORIGIN, 20.0).with_subject(EntityId(9));
        let ctx = run(&world, &request);
        assert_eq!(ctx.candidates().len(), 4);
        assert!(ctx.surely_invisible().is_empty());
    }

    #[test]
    fn wall_crossing_the_square_adds_boundary_vertices() {
        let mut world = ColliderWorld::new();
        // Vertical wall poking out of the top and bottom of the square.
        let shape = ConvexPolygon::from_rect(Rect::new(5.0, -30.0, 6.0, 30.0)).unwrap();
        world.insert(Collider::new(EntityId(1), shape)).unwrap();
        let ctx = run(&world, &VisibilityRequest::new(Point::ORIGIN, 20.0));

        let crossings: Vec<Point> = ctx
            .candidates()
            .iter()
            .filter(|c| c.on_boundary && c.pos.x > -10.0 && c.pos.x < 10.0)
            .map(|c| c.pos)
            .collect();
        // Both faces of the wall cross the bottom and the top edge.
        let expected = [
            Point::new(5.0, -10.0),
            Point::new(6.0, -10.0),
            Point::new(6.0, 10.0),
            Point::new(5.0, 10.0),
        ];
        assert_eq!(crossings.len(), expected.len());
        for (got, want) in crossings.iter().zip(expected) {
            assert!(got.distance(want) < 1e-9, "{got:?} != {want:?}");
        }
        // The wall's own corners lie outside the square.
        assert!(ctx.candidates().iter().all(|c| c.on_boundary));
    }
}

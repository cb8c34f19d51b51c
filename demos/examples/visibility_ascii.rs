// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible region around one observer, drawn as ASCII.
//!
//! Builds a small room of boxes, asks for the region visible from the
//! middle, and prints it: `@` is the eye, `#` an obstacle, `.` a visible
//! cell, and a blank a hidden one. Discontinuities and the debug rays are
//! listed below the map.
//!
//! Run:
//! - `cargo run -p umbra_demos --example visibility_ascii`

use kurbo::{Affine, Point, Rect};
use umbra_colliders::{Collider, ColliderWorld, ConvexPolygon, EntityId};
use umbra_visibility::{
    DebugLines, RayTag, VisibilityContext, VisibilityEngine, VisibilityRequest,
    VisibilityResponse,
};

const HALF: i32 = 15;

fn main() {
    let mut world = ColliderWorld::new();
    let boxes = [
        Rect::new(4.0, -1.0, 6.0, 1.0),
        Rect::new(-8.0, 3.0, -2.0, 4.0),
        Rect::new(-3.0, -9.0, -2.0, -4.0),
        Rect::new(9.0, 6.0, 10.0, 12.0),
    ];
    for (i, r) in boxes.into_iter().enumerate() {
        let shape = ConvexPolygon::from_rect(r).expect("boxes are valid shapes");
        world
            .insert(Collider::new(EntityId(i as u64 + 1), shape))
            .expect("boxes are valid shapes");
    }
    let diamond = ConvexPolygon::from_rect(Rect::new(-1.0, -1.0, 1.0, 1.0)).expect("valid shape");
    world
        .insert(
            Collider::new(EntityId(99), diamond)
                .with_transform(Affine::translate((-6.0, -6.0)) * Affine::rotate(0.785)),
        )
        .expect("rotation keeps the shape valid");

    let engine = VisibilityEngine::default();
    let mut ctx = VisibilityContext::new();
    let mut debug = DebugLines::new();
    let request = VisibilityRequest::new(Point::ORIGIN, f64::from(2 * HALF));
    let response = engine.respond_with_sink(&mut ctx, &world, &request, &mut debug);

    for y in (-HALF..=HALF).rev() {
        let row: String = (-HALF..=HALF)
            .map(|x| {
                let p = Point::new(f64::from(x), f64::from(y));
                if x == 0 && y == 0 {
                    '@'
                } else if world_contains(&world, p) {
                    '#'
                } else if visible(&response, request.eye, p) {
                    '.'
                } else {
                    ' '
                }
            })
            .collect();
        println!("{row}");
    }

    println!();
    println!(
        "{} edges, {} discontinuities, {} vertex hits",
        response.edges.len(),
        response.discontinuities.len(),
        response.vertex_hits.len()
    );
    for d in &response.discontinuities {
        println!(
            "  {:?} at ({:.2}, {:.2}) -> ({:.2}, {:.2}){}",
            d.winding,
            d.vertex.x,
            d.vertex.y,
            d.far.x,
            d.far.y,
            if d.is_boundary { " [boundary]" } else { "" }
        );
    }
    for tag in [
        RayTag::VertexHit,
        RayTag::Obstructed,
        RayTag::FreeArea,
        RayTag::ExtendedVisionHit,
        RayTag::SurelyInvisible,
    ] {
        println!("  {tag:?}: {} rays", debug.tagged(tag).count());
    }
}

fn world_contains(world: &ColliderWorld, p: Point) -> bool {
    use core::ops::ControlFlow;
    use umbra_colliders::{ColliderQuery, CollisionFilter};

    let mut hit = false;
    world.for_each_in_aabb(
        Rect::from_center_size(p, (0.0, 0.0)),
        &CollisionFilter::default(),
        |c| {
            if c.world_shape.contains(p) {
                hit = true;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        },
    );
    hit
}

/// Whether `p` lies in one of the fan triangles from the eye.
fn visible(response: &VisibilityResponse, eye: Point, p: Point) -> bool {
    (0..response.num_triangles()).any(|i| {
        let [a, b, c] = response.triangle(i, eye);
        let d1 = (b - a).cross(p - a);
        let d2 = (c - b).cross(p - b);
        let d3 = (a - c).cross(p - c);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    })
}

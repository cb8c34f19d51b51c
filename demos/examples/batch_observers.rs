// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Many observers in one frame, on a grid-indexed world.
//!
//! Scatters pillars over a large map, indexes them with the uniform grid
//! backend, and answers one request per observer twice: sequentially and on
//! the rayon pool. Observers that ask for pathfinding-style filtering also
//! report how many narrow gaps were closed.
//!
//! Run:
//! - `cargo run -p umbra_demos --example batch_observers`

use std::time::Instant;

use kurbo::{Affine, Point, Rect};
use umbra_colliders::{Collider, ColliderWorld, ConvexPolygon, EntityId};
use umbra_index::backends::GridF64;
use umbra_visibility::{UnitScale, VisibilityEngine, VisibilityRequest, VisibilitySettings};

fn main() {
    let mut world = ColliderWorld::with_backend(GridF64::new(8.0));
    let pillar = ConvexPolygon::from_rect(Rect::new(-0.6, -0.6, 0.6, 0.6)).expect("valid shape");
    let mut next = 1;
    for gx in -20..=20 {
        for gy in -20..=20 {
            if (gx + gy) % 3 != 0 {
                continue;
            }
            let at = (f64::from(gx) * 4.0, f64::from(gy) * 4.0);
            let turn = f64::from(gx * 7 + gy * 13) * 0.1;
            world
                .insert(
                    Collider::new(EntityId(next), pillar.clone())
                        .with_transform(Affine::translate(at) * Affine::rotate(turn)),
                )
                .expect("rigid transforms keep the shape valid");
            next += 1;
        }
    }

    // Pixels at 32 per world unit.
    let engine = VisibilityEngine::new(VisibilitySettings::default(), UnitScale::new(32.0));
    let requests: Vec<_> = (0..256)
        .map(|i| {
            let a = f64::from(i) * 0.618;
            let eye = Point::new(a.cos() * 50.0 + 2.0, a.sin() * 50.0 + 2.0);
            let request = VisibilityRequest::new(eye, 30.0).with_subject(EntityId(u64::MAX));
            if i % 4 == 0 {
                request.ignoring_discontinuities_shorter_than(1.5)
            } else {
                request
            }
        })
        .collect();

    let start = Instant::now();
    let sequential = engine.respond_all(&world, &requests);
    let t_seq = start.elapsed();

    let start = Instant::now();
    let parallel = engine.respond_all_par(&world, &requests);
    let t_par = start.elapsed();

    assert_eq!(sequential, parallel);

    let edges: usize = parallel.iter().map(|r| r.edges.len()).sum();
    let discs: usize = parallel.iter().map(|r| r.discontinuities.len()).sum();
    let holes: usize = parallel.iter().map(|r| r.marked_holes.len()).sum();
    println!("{} colliders, {} observers", world.len(), requests.len());
    println!("{edges} edges, {discs} discontinuities, {holes} marked holes");
    println!("sequential {t_seq:?}, parallel {t_par:?}");
}

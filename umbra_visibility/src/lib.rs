// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Umbra Visibility: 2D visibility polygons over a snapshot of convex colliders.
//!
//! Given an eye, an axis-aligned query square around it, and anything that
//! implements [`ColliderQuery`](umbra_colliders::ColliderQuery), the engine
//! computes the region visible from the eye as a closed loop of edges, plus
//! the discontinuities where an obstacle edge casts a shadow. Lighting code
//! fans triangles from the eye over the edges; gameplay code reads the
//! discontinuities and marked holes to reason about what is around a corner.
//!
//! ## How it works
//!
//! 1. Collect candidate vertices: obstacle vertices on a silhouette as seen
//!    from the eye, points where obstacles cross the query square, and the
//!    square's corners.
//! 2. Sort them around the eye with [`comparable_angle`], a cheap stand-in
//!    for `atan2` that orders directions identically.
//! 3. Cast two rays past each obstacle vertex, one grazing each side of it.
//!    Where they land decides whether the vertex is hidden, hit head-on, or
//!    the start of a shadow, which becomes a [`Discontinuity`].
//! 4. Join the results in angular order into the closed boundary.
//! 5. Optionally drop discontinuities whose opening is narrower than
//!    [`VisibilityRequest::ignore_discontinuities_shorter_than`], reporting
//!    the gap as a marked hole.
//!
//! Geometry is computed in internal units and converted to output units by
//! a [`UnitScale`] on the way out.
//!
//! ## Threads
//!
//! A [`VisibilityEngine`] holds configuration only; all scratch buffers live
//! in a [`VisibilityContext`] owned by the caller. Give each worker its own
//! context and share the engine and the world freely. The `parallel` feature
//! adds [`VisibilityEngine::respond_all_par`], which does this on the rayon
//! pool.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use umbra_colliders::{Collider, ColliderWorld, ConvexPolygon, EntityId};
//! use umbra_visibility::{VisibilityContext, VisibilityEngine, VisibilityRequest, Winding};
//!
//! let mut world = ColliderWorld::new();
//! let crate_box = ConvexPolygon::from_rect(Rect::new(4.0, -1.0, 6.0, 1.0)).unwrap();
//! world.insert(Collider::new(EntityId(1), crate_box)).unwrap();
//!
//! let engine = VisibilityEngine::default();
//! let mut ctx = VisibilityContext::new();
//! let response = engine.respond(&mut ctx, &world, &VisibilityRequest::new(Point::ORIGIN, 20.0));
//!
//! // The box casts one shadow, bounded by a discontinuity on each side.
//! assert_eq!(response.discontinuities.len(), 2);
//! assert_eq!(response.discontinuities[0].winding, Winding::Left);
//! assert_eq!(response.discontinuities[1].winding, Winding::Right);
//!
//! // The boundary is a closed loop.
//! let n = response.edges.len();
//! for i in 0..n {
//!     let gap = response.edges[i].p1.distance(response.edges[(i + 1) % n].p0);
//!     assert!(gap < 1e-9);
//! }
//! ```
//!
//! ## Features
//!
//! - `std` *(default)*: use the standard library's float functions.
//! - `libm`: use `libm` instead, for `no_std` targets.
//! - `parallel`: batch requests on the rayon pool.
//! - `serde`: derive `Serialize`/`Deserialize` for [`VisibilitySettings`] and [`UnitScale`].
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod angle;
mod cast;
mod collect;
mod context;
mod debug;
mod engine;
mod filter;
mod request;
mod response;
mod settings;
mod square;
mod stitch;

pub use angle::comparable_angle;
pub use context::{CandidateVertex, DoubleRay, VisibilityContext, VisionExtends};
pub use debug::{DebugLine, DebugLines, DebugSink, NoDebug, RayTag};
pub use engine::VisibilityEngine;
pub use request::VisibilityRequest;
pub use response::{Discontinuity, VertexHit, VisibilityResponse, Winding, WrappingIndex};
pub use settings::{UnitScale, VisibilitySettings};

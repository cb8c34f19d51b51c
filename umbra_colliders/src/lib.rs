// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Umbra Colliders: a Kurbo-native snapshot of convex colliders with ray and region queries.
//!
//! This is the collision-side building block that visibility and gameplay
//! systems query every frame.
//!
//! - Convex polygon shapes with up to [`MAX_POLYGON_VERTICES`] vertices, normalized to
//!   counter-clockwise order with outward edge normals.
//! - Collision categories ([`CollisionGroups`]) and symmetric group/mask filters.
//! - A [`ColliderWorld`] that keeps world-space polygons and bounds in sync with an
//!   [`umbra_index`] broad phase.
//! - The [`ColliderQuery`] trait: AABB iteration with early exit, first-hit ray casts, and
//!   sorted all-hit ray casts, each honoring a filter and an ignored owner.
//!
//! Other collision engines can implement [`ColliderQuery`] directly; consumers only depend on
//! the trait.
//!
//! ## Integration with Umbra Index
//!
//! The world is generic over an [`umbra_index::Backend`]. It defaults to the flat vector
//! backend; enable the `grid` feature and use [`ColliderWorld::with_backend`] with
//! [`umbra_index::backends::GridF64`] for larger scenes. World bounds are tight AABBs of
//! the transformed polygon. Coordinates are assumed to be finite.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use umbra_colliders::{Collider, ColliderQuery, ColliderWorld, CollisionFilter, ConvexPolygon, EntityId};
//!
//! let mut world = ColliderWorld::new();
//! let wall = ConvexPolygon::from_rect(Rect::new(4.0, -1.0, 6.0, 1.0)).unwrap();
//! world.insert(Collider::new(EntityId(1), wall)).unwrap();
//!
//! let hit = world
//!     .ray_cast(Point::ORIGIN, Point::new(10.0, 0.0), &CollisionFilter::default(), None)
//!     .unwrap();
//! assert!((hit.point - Point::new(4.0, 0.0)).hypot() < 1e-9);
//! assert_eq!(hit.entity, EntityId(1));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod geometry;
mod query;
mod shape;
mod types;
mod world;

pub use error::ShapeError;
pub use geometry::{closest_point_on_segment, segment_intersection};
pub use query::{ColliderQuery, ColliderView, RayHit, RayIntersection};
pub use shape::{ConvexPolygon, MAX_POLYGON_VERTICES};
pub use types::{Collider, ColliderId, CollisionFilter, CollisionGroups, EntityId};
pub use world::ColliderWorld;

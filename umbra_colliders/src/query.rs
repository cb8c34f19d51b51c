// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region and ray queries over colliders.

use alloc::vec::Vec;
use core::ops::ControlFlow;

use kurbo::{Affine, Point, Rect, Vec2};
use umbra_index::Backend;

use crate::geometry::rect_to_aabb;
use crate::shape::ConvexPolygon;
use crate::types::{ColliderId, CollisionFilter, EntityId};
use crate::world::{ColliderWorld, Slot};

/// A collider as seen by a region query callback.
#[derive(Clone, Copy, Debug)]
pub struct ColliderView<'a> {
    /// Slot of the collider.
    pub id: ColliderId,
    /// Owning entity.
    pub owner: EntityId,
    /// Shape in local coordinates.
    pub local_shape: &'a ConvexPolygon,
    /// Local-to-world transform.
    pub transform: Affine,
    /// Shape in world coordinates.
    pub world_shape: &'a ConvexPolygon,
}

/// Closest hit of a ray cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Where the ray entered the collider.
    pub point: Point,
    /// Outward normal of the entered edge, in world space.
    pub normal: Vec2,
    /// Position of `point` along the ray, in `[0, 1]`.
    pub fraction: f64,
    /// Owner of the hit collider.
    pub entity: EntityId,
}

/// One entry point of a ray into a collider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayIntersection {
    /// Where the ray entered the collider.
    pub point: Point,
    /// Position of `point` along the ray, in `[0, 1]`.
    pub fraction: f64,
    /// Owner of the collider.
    pub entity: EntityId,
}

/// Read-only queries a visibility or gameplay system needs from a collision world.
///
/// Rays are segments from `origin` to `target`. They only report the point
/// where they enter a shape: a ray that starts inside a collider passes
/// through it. Colliders owned by `ignore` are skipped, and `filter` is
/// matched against each collider's own filter.
pub trait ColliderQuery {
    /// Visit colliders whose world bounds overlap `aabb`.
    ///
    /// Returning [`ControlFlow::Break`] stops the traversal.
    fn for_each_in_aabb<F>(&self, aabb: Rect, filter: &CollisionFilter, f: F)
    where
        F: FnMut(ColliderView<'_>) -> ControlFlow<()>;

    /// First collider the ray enters, if any.
    fn ray_cast(
        &self,
        origin: Point,
        target: Point,
        filter: &CollisionFilter,
        ignore: Option<EntityId>,
    ) -> Option<RayHit>;

    /// Every collider the ray enters, ordered by increasing fraction.
    fn ray_cast_all_intersections(
        &self,
        origin: Point,
        target: Point,
        filter: &CollisionFilter,
        ignore: Option<EntityId>,
    ) -> Vec<RayIntersection>;
}

impl<B: Backend<f64>> ColliderWorld<B> {
    /// Visit the narrow-phase entry of every eligible collider along a ray.
    fn visit_ray_entries<F>(
        &self,
        origin: Point,
        target: Point,
        filter: &CollisionFilter,
        ignore: Option<EntityId>,
        mut f: F,
    ) where
        F: FnMut(&Slot, f64, Vec2),
    {
        if origin == target {
            return;
        }
        let bounds = Rect::from_points(origin, target);
        let _ = self.index.visit_rect(rect_to_aabb(bounds), |_, id| {
            if let Some(slot) = self.slot(id)
                && Some(slot.collider.owner) != ignore
                && filter.interacts_with(&slot.collider.filter)
                && let Some((fraction, normal)) = slot.world_shape.ray_cast(origin, target)
            {
                f(slot, fraction, normal);
            }
            ControlFlow::Continue(())
        });
    }
}

impl<B: Backend<f64>> ColliderQuery for ColliderWorld<B> {
    fn for_each_in_aabb<F>(&self, aabb: Rect, filter: &CollisionFilter, mut f: F)
    where
        F: FnMut(ColliderView<'_>) -> ControlFlow<()>,
    {
        let _ = self.index.visit_rect(rect_to_aabb(aabb), |_, id| {
            let Some(slot) = self.slot(id) else {
                return ControlFlow::Continue(());
            };
            if !filter.interacts_with(&slot.collider.filter) {
                return ControlFlow::Continue(());
            }
            f(ColliderView {
                id,
                owner: slot.collider.owner,
                local_shape: &slot.collider.shape,
                transform: slot.collider.transform,
                world_shape: &slot.world_shape,
            })
        });
    }

    fn ray_cast(
        &self,
        origin: Point,
        target: Point,
        filter: &CollisionFilter,
        ignore: Option<EntityId>,
    ) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;
        self.visit_ray_entries(origin, target, filter, ignore, |slot, fraction, normal| {
            if best.is_none_or(|b| fraction < b.fraction) {
                best = Some(RayHit {
                    point: origin.lerp(target, fraction),
                    normal,
                    fraction,
                    entity: slot.collider.owner,
                });
            }
        });
        best
    }

    fn ray_cast_all_intersections(
        &self,
        origin: Point,
        target: Point,
        filter: &CollisionFilter,
        ignore: Option<EntityId>,
    ) -> Vec<RayIntersection> {
        let mut out = Vec::new();
        self.visit_ray_entries(origin, target, filter, ignore, |slot, fraction, _| {
            out.push(RayIntersection {
                point: origin.lerp(target, fraction),
                fraction,
                entity: slot.collider.owner,
            });
        });
        out.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Collider, CollisionGroups};
    use alloc::vec;

    fn world_with_row() -> ColliderWorld {
        // Three unit boxes along the x axis at x = 2, 5, 8.
        let mut world = ColliderWorld::new();
        for (i, x) in [2.0, 5.0, 8.0].into_iter().enumerate() {
            let shape = ConvexPolygon::from_rect(Rect::new(x - 0.5, -0.5, x + 0.5, 0.5)).unwrap();
            world
                .insert(Collider::new(EntityId(i as u64 + 1), shape))
                .unwrap();
        }
        world
    }

    #[test]
    fn ray_cast_returns_first_entry() {
        let world = world_with_row();
        let filter = CollisionFilter::default();
        let hit = world
            .ray_cast(Point::ORIGIN, Point::new(10.0, 0.0), &filter, None)
            .unwrap();
        assert_eq!(hit.entity, EntityId(1));
        assert!((hit.point.x - 1.5).abs() < 1e-12);
        assert!((hit.fraction - 0.15).abs() < 1e-12);
        assert_eq!(hit.normal, Vec2::new(-1.0, 0.0));

        let skipped = world
            .ray_cast(Point::ORIGIN, Point::new(10.0, 0.0), &filter, Some(EntityId(1)))
            .unwrap();
        assert_eq!(skipped.entity, EntityId(2));
    }

    #[test]
    fn all_intersections_are_sorted() {
        let world = world_with_row();
        // Cast right to left so slot order disagrees with ray order.
        let hits = world.ray_cast_all_intersections(
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            &CollisionFilter::default(),
            None,
        );
        let owners: Vec<u64> = hits.iter().map(|h| h.entity.0).collect();
        assert_eq!(owners, vec![3, 2, 1]);
        assert!((hits[0].point.x - 8.5).abs() < 1e-12);
    }

    #[test]
    fn ray_starting_inside_passes_through() {
        let world = world_with_row();
        let hits = world.ray_cast_all_intersections(
            Point::new(2.0, 0.0),
            Point::new(10.0, 0.0),
            &CollisionFilter::default(),
            None,
        );
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, EntityId(2));
    }

    #[test]
    fn filters_hide_colliders() {
        let mut world = world_with_row();
        let ids: Vec<ColliderId> = {
            let mut ids = Vec::new();
            world.for_each_in_aabb(
                Rect::new(-100.0, -100.0, 100.0, 100.0),
                &CollisionFilter::default(),
                |c| {
                    ids.push(c.id);
                    ControlFlow::Continue(())
                },
            );
            ids
        };
        assert_eq!(ids.len(), 3);
        world.set_filter(
            ids[0],
            CollisionFilter::new(CollisionGroups::GROUP_2, CollisionGroups::ALL),
        );

        let sight = CollisionFilter::new(CollisionGroups::GROUP_1, CollisionGroups::GROUP_1);
        let hit = world
            .ray_cast(Point::ORIGIN, Point::new(10.0, 0.0), &sight, None)
            .unwrap();
        assert_eq!(hit.entity, EntityId(2));
    }

    #[test]
    fn for_each_in_aabb_stops_early_and_culls() {
        let world = world_with_row();
        let mut seen = 0;
        world.for_each_in_aabb(
            Rect::new(0.0, -1.0, 6.0, 1.0),
            &CollisionFilter::default(),
            |_| {
                seen += 1;
                ControlFlow::Break(())
            },
        );
        assert_eq!(seen, 1);

        let mut owners = Vec::new();
        world.for_each_in_aabb(
            Rect::new(0.0, -1.0, 6.0, 1.0),
            &CollisionFilter::default(),
            |c| {
                owners.push(c.owner);
                ControlFlow::Continue(())
            },
        );
        assert_eq!(owners, vec![EntityId(1), EntityId(2)]);
    }

    #[test]
    fn zero_length_rays_never_hit() {
        let world = world_with_row();
        let p = Point::new(1.0, 0.0);
        assert!(
            world
                .ray_cast(p, p, &CollisionFilter::default(), None)
                .is_none()
        );
    }
}

// Copyright 2026 the Umbra Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collider world: slots, world-space shapes, and index synchronization.

use alloc::vec::Vec;
use kurbo::{Affine, Rect};
use umbra_index::{Backend, IndexGeneric, Key as AabbKey, backends::FlatVec};

use crate::error::ShapeError;
use crate::geometry::rect_to_aabb;
use crate::shape::ConvexPolygon;
use crate::types::{Collider, ColliderId, CollisionFilter, EntityId};

/// A snapshot of convex colliders with a broad-phase index.
///
/// The type parameter `B` picks the `umbra_index` backend and defaults to a
/// flat vector. Every mutation recomputes the collider's world-space polygon
/// and bounds and updates the index right away, so queries issued after a
/// mutation always see it.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Affine, Rect};
/// use umbra_colliders::{Collider, ColliderWorld, ConvexPolygon, EntityId};
///
/// let mut world = ColliderWorld::new();
/// let crate_shape = ConvexPolygon::from_rect(Rect::new(-1.0, -1.0, 1.0, 1.0)).unwrap();
/// let id = world
///     .insert(Collider::new(EntityId(7), crate_shape).with_transform(Affine::translate((10.0, 0.0))))
///     .unwrap();
///
/// assert_eq!(world.world_bounds(id), Some(Rect::new(9.0, -1.0, 11.0, 1.0)));
/// ```
pub struct ColliderWorld<B: Backend<f64> = FlatVec<f64>> {
    slots: Vec<Option<Slot>>,
    // Last generation per slot, kept across removals.
    generations: Vec<u32>,
    free_list: Vec<usize>,
    pub(crate) index: IndexGeneric<f64, ColliderId, B>,
}

#[derive(Clone, Debug)]
pub(crate) struct Slot {
    pub(crate) collider: Collider,
    pub(crate) world_shape: ConvexPolygon,
    pub(crate) world_bounds: Rect,
    key: AabbKey,
}

impl<B: Backend<f64> + core::fmt::Debug> core::fmt::Debug for ColliderWorld<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ColliderWorld")
            .field("slots_total", &self.slots.len())
            .field("colliders", &self.len())
            .field("free_list", &self.free_list.len())
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl<B> Default for ColliderWorld<B>
where
    B: Backend<f64> + Default,
{
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl ColliderWorld {
    /// Create an empty world using the flat vector backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: Backend<f64>> ColliderWorld<B> {
    /// Create an empty world with a specific backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            index: IndexGeneric::with_backend(backend),
        }
    }

    /// Add a collider.
    ///
    /// Fails when the transform collapses the shape.
    pub fn insert(&mut self, collider: Collider) -> Result<ColliderId, ShapeError> {
        let world_shape = collider.shape.transformed(collider.transform)?;
        let world_bounds = world_shape.bounding_box();

        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ColliderId indices are 32-bit."
        )]
        let id = ColliderId::new(idx as u32, generation);
        let key = self.index.insert(rect_to_aabb(world_bounds), id);
        self.slots[idx] = Some(Slot {
            collider,
            world_shape,
            world_bounds,
            key,
        });
        Ok(id)
    }

    /// Remove a collider, returning its descriptor if `id` was live.
    pub fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        if !self.is_alive(id) {
            return None;
        }
        let slot = self.slots[id.idx()].take()?;
        self.index.remove(slot.key);
        self.free_list.push(id.idx());
        Some(slot.collider)
    }

    /// Move a collider.
    ///
    /// Stale ids are ignored. On error the collider keeps its old transform.
    pub fn set_transform(&mut self, id: ColliderId, transform: Affine) -> Result<(), ShapeError> {
        let Some(slot) = self.slot_mut(id) else {
            return Ok(());
        };
        let world_shape = slot.collider.shape.transformed(transform)?;
        slot.collider.transform = transform;
        slot.world_bounds = world_shape.bounding_box();
        slot.world_shape = world_shape;
        let (key, bounds) = (slot.key, slot.world_bounds);
        self.index.update(key, rect_to_aabb(bounds));
        Ok(())
    }

    /// Change a collider's filter. Stale ids are ignored.
    pub fn set_filter(&mut self, id: ColliderId, filter: CollisionFilter) {
        if let Some(slot) = self.slot_mut(id) {
            slot.collider.filter = filter;
        }
    }

    /// Collider descriptor of a live id.
    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.slot(id).map(|s| &s.collider)
    }

    /// World-space polygon of a live id.
    pub fn world_shape(&self, id: ColliderId) -> Option<&ConvexPolygon> {
        self.slot(id).map(|s| &s.world_shape)
    }

    /// World-space AABB of a live id.
    pub fn world_bounds(&self, id: ColliderId) -> Option<Rect> {
        self.slot(id).map(|s| s.world_bounds)
    }

    /// Owner of a live id.
    pub fn owner(&self, id: ColliderId) -> Option<EntityId> {
        self.slot(id).map(|s| s.collider.owner)
    }

    /// Returns `true` if `id` refers to a live collider.
    pub fn is_alive(&self, id: ColliderId) -> bool {
        self.slot(id).is_some()
    }

    /// Number of live colliders.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the world has no colliders.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub(crate) fn slot(&self, id: ColliderId) -> Option<&Slot> {
        if self.generations.get(id.idx()).copied() != Some(id.1) {
            return None;
        }
        self.slots.get(id.idx())?.as_ref()
    }

    fn slot_mut(&mut self, id: ColliderId) -> Option<&mut Slot> {
        if self.generations.get(id.idx()).copied() != Some(id.1) {
            return None;
        }
        self.slots.get_mut(id.idx())?.as_mut()
    }
}
